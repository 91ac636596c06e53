//! Name search across a user's files and folders.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_database::repositories::file::FileSearch;
use adrive_database::repositories::{FileRepository, FolderRepository, escape_like};
use adrive_entity::file::File;
use adrive_entity::folder::Folder;

use crate::context::RequestContext;

/// Maximum number of results per list.
pub const SEARCH_LIMIT: i64 = 25;

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

const ARCHIVE_TYPES: &[&str] = &[
    "application/zip",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/x-7z-compressed",
    "application/gzip",
    "application/x-tar",
];

/// Search parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Name query; `*` and `?` are wildcards.
    #[serde(default)]
    pub q: String,
    /// Optional file type filter: image, document, video, audio or archive.
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

/// Search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching files.
    pub files: Vec<File>,
    /// Matching folders.
    pub folders: Vec<Folder>,
    /// Total number of results returned.
    pub total: usize,
}

/// Distinct MIME types of a user's files, grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileTypeSummary {
    /// Category name to MIME types.
    pub categories: BTreeMap<String, Vec<String>>,
}

/// Searches files and folders by name.
#[derive(Debug, Clone)]
pub struct SearchService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(file_repo: Arc<FileRepository>, folder_repo: Arc<FolderRepository>) -> Self {
        Self {
            file_repo,
            folder_repo,
        }
    }

    /// Runs a search.
    ///
    /// `*.ext` only matches files. A type filter restricts files to a MIME
    /// family; folders are still matched by name.
    pub async fn search(&self, ctx: &RequestContext, query: &SearchQuery) -> AppResult<SearchResults> {
        let q = query.q.trim();
        if q.is_empty() {
            return Err(AppError::validation("Search query is required"));
        }

        let mime_prefixes = match query.file_type.as_deref().map(str::trim) {
            None | Some("") => &[][..],
            Some(kind) => mime_family(kind)?,
        };

        let (pattern, files_only) = match extension_query(q) {
            Some(ext) => (format!("%.{}", escape_like(ext)), true),
            None => (like_pattern(q), false),
        };

        let files = self
            .file_repo
            .search(
                ctx.user_id,
                &FileSearch {
                    name_pattern: &pattern,
                    mime_prefixes,
                    limit: SEARCH_LIMIT,
                },
            )
            .await?;
        let folders = if files_only {
            Vec::new()
        } else {
            self.folder_repo
                .search(ctx.user_id, &pattern, SEARCH_LIMIT)
                .await?
        };

        debug!(
            user_id = %ctx.user_id,
            pattern = %pattern,
            files = files.len(),
            folders = folders.len(),
            "Search completed"
        );
        let total = files.len() + folders.len();
        Ok(SearchResults {
            files,
            folders,
            total,
        })
    }

    /// Groups the user's distinct MIME types into categories.
    pub async fn file_types(&self, ctx: &RequestContext) -> AppResult<FileTypeSummary> {
        let mut summary = FileTypeSummary::default();
        for mime in self.file_repo.distinct_mime_types(ctx.user_id).await? {
            summary
                .categories
                .entry(mime_category(&mime).to_string())
                .or_default()
                .push(mime);
        }
        Ok(summary)
    }
}

/// MIME prefixes for a type filter.
fn mime_family(kind: &str) -> AppResult<&'static [&'static str]> {
    match kind.to_ascii_lowercase().as_str() {
        "image" => Ok(&["image/"]),
        "video" => Ok(&["video/"]),
        "audio" => Ok(&["audio/"]),
        "document" => Ok(DOCUMENT_TYPES),
        "archive" => Ok(ARCHIVE_TYPES),
        other => Err(AppError::validation(format!("Unknown file type '{other}'"))),
    }
}

/// `*.pdf` style queries: returns the extension.
fn extension_query(q: &str) -> Option<&str> {
    q.strip_prefix("*.")
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Translate a user query into a `LIKE` pattern.
fn like_pattern(q: &str) -> String {
    let escaped = escape_like(q);
    if q.contains(['*', '?']) {
        escaped.replace('*', "%").replace('?', "_")
    } else {
        format!("%{escaped}%")
    }
}

/// Category of a MIME type.
fn mime_category(mime: &str) -> &str {
    let family = mime.split('/').next().unwrap_or(mime);
    if family != "application" {
        return family;
    }
    if ["pdf", "word", "excel", "powerpoint", "spreadsheet"]
        .iter()
        .any(|k| mime.contains(k))
    {
        "document"
    } else if ["zip", "rar", "tar", "gzip"].iter().any(|k| mime.contains(k)) {
        "archive"
    } else {
        family
    }
}
