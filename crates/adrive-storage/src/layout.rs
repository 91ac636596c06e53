//! Mapping from logical names to paths inside the storage root.
//!
//! Every path produced here is relative to the storage root and uses `/`
//! as separator:
//!
//! - user tree: `root/<uid>`
//! - folder: `root/<uid>/<logical path>`
//! - live file: `root/<uid>/<uid>_<original name>`
//! - version snapshot: `root/<uid>/<uid>_<stem>_v<n><.ext>`
//! - pending removal: `trash/<uid>/<tag>`

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::types::UserId;

/// Maximum length of a single name component in bytes.
pub const MAX_NAME_BYTES: usize = 255;

/// Derives physical locations for a user's folders, files and versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageLayout;

impl StorageLayout {
    /// Directory holding everything a user owns.
    pub fn user_root(user_id: UserId) -> String {
        format!("root/{user_id}")
    }

    /// Directory mirroring a folder's logical path.
    pub fn folder_dir(user_id: UserId, logical_path: &str) -> String {
        format!("root/{user_id}/{logical_path}")
    }

    /// Flat location of a file's live bytes.
    pub fn file_path(user_id: UserId, original_name: &str) -> String {
        format!("root/{user_id}/{user_id}_{original_name}")
    }

    /// Archival location for version `n` of the file stored at `live_path`.
    ///
    /// The stem of the last component is suffixed with `_v<n>`; the extension
    /// (if any) is kept.
    pub fn version_path(live_path: &str, version_number: i64) -> String {
        let (dir, file_name) = match live_path.rsplit_once('/') {
            Some((dir, name)) => (Some(dir), name),
            None => (None, live_path),
        };
        let versioned = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}_v{version_number}.{ext}"),
            _ => format!("{file_name}_v{version_number}"),
        };
        match dir {
            Some(dir) => format!("{dir}/{versioned}"),
            None => versioned,
        }
    }

    /// Holding area for bytes of an item whose removal has not committed yet.
    ///
    /// Lives outside `root/` so it can never collide with a user folder.
    pub fn trash_dir(user_id: UserId, tag: &str) -> String {
        format!("trash/{user_id}/{tag}")
    }

    /// Join a parent logical path and a child name.
    pub fn join_logical(parent_path: Option<&str>, name: &str) -> String {
        match parent_path {
            Some(parent) if !parent.is_empty() => format!("{parent}/{name}"),
            _ => name.to_string(),
        }
    }
}

/// Validate a single folder or file name before it is used in a path.
///
/// Surrounding whitespace is trimmed. Empty names, `.`, `..`, names containing
/// `/`, `\` or NUL, and names longer than [`MAX_NAME_BYTES`] are rejected.
pub fn sanitize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(AppError::validation(format!("Invalid name: '{trimmed}'")));
    }
    if trimmed.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(
            "Name must not contain path separators or NUL characters",
        ));
    }
    if trimmed.len() > MAX_NAME_BYTES {
        return Err(AppError::validation(format!(
            "Name must be at most {MAX_NAME_BYTES} bytes"
        )));
    }
    Ok(trimmed.to_string())
}
