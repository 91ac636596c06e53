//! File download service: streams live file content.

use std::sync::Arc;

use tracing::debug;

use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::traits::storage::ByteStream;
use adrive_core::types::FileId;
use adrive_database::repositories::{FileRepository, RecentAccessRepository};
use adrive_entity::favorite::ItemType;
use adrive_entity::file::File;

use crate::context::RequestContext;
use crate::file::service::owned_file;

/// Handles file downloads.
#[derive(Clone)]
pub struct DownloadService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Recent access repository.
    recent_repo: Arc<RecentAccessRepository>,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService").finish()
    }
}

/// File metadata and a content stream for a download.
pub struct DownloadResult {
    /// File metadata.
    pub file: File,
    /// File content.
    pub stream: ByteStream,
    /// MIME type for Content-Type header.
    pub content_type: String,
    /// Suggested filename for Content-Disposition.
    pub filename: String,
    /// Content length in bytes.
    pub size_bytes: u64,
}

impl std::fmt::Debug for DownloadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadResult")
            .field("file_id", &self.file.id)
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        recent_repo: Arc<RecentAccessRepository>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            file_repo,
            recent_repo,
            storage,
        }
    }

    /// Opens a file for download and records the access.
    pub async fn download(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<DownloadResult> {
        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        let meta = self.storage.metadata(&file.storage_path).await?;
        let stream = self.storage.read(&file.storage_path).await?;

        self.recent_repo
            .touch(ctx.user_id, ItemType::File, file.id.get())
            .await?;

        debug!(user_id = %ctx.user_id, file_id = %file.id, "File download started");

        Ok(DownloadResult {
            content_type: file.mime_type.clone(),
            filename: file.name.clone(),
            size_bytes: meta.size_bytes,
            file,
            stream,
        })
    }
}
