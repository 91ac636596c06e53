//! File entity model.

use adrive_core::types::{FileId, FolderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file owned by a user.
///
/// The physical bytes live at `storage_path` (relative to the storage root),
/// which is independent of the logical folder placement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file owner.
    pub user_id: UserId,
    /// The folder containing this file (None for top-level files).
    pub folder_id: Option<FolderId>,
    /// Display name (including extension).
    pub name: String,
    /// Name the file was uploaded with.
    pub original_name: String,
    /// Live path within the storage root.
    #[serde(skip_serializing)]
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type of the file.
    pub mime_type: String,
    /// Current version number, starting at 1.
    pub current_version: i64,
    /// Whether version history is kept for this file.
    pub versioning_enabled: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
    /// Whether the caller marked this file as a favorite. Not stored.
    #[sqlx(skip)]
    #[serde(default)]
    pub is_favorite: bool,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub user_id: UserId,
    /// The folder to place the file in.
    pub folder_id: Option<FolderId>,
    /// Display name.
    pub name: String,
    /// Name the file was uploaded with.
    pub original_name: String,
    /// Live path within the storage root.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: String,
}
