//! File version entity.

use adrive_core::types::{FileId, FileVersionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A checksummed snapshot of a file's content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: FileVersionId,
    /// The file this version belongs to.
    pub file_id: FileId,
    /// Sequential version number, unique per file.
    pub version_number: i64,
    /// Path to this version's content within the storage root.
    #[serde(skip_serializing)]
    pub storage_path: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Lowercase hex SHA-256 of the content.
    pub checksum: String,
    /// Optional comment describing the change.
    pub comment: Option<String>,
    /// User who created this version.
    pub created_by: UserId,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a version.
#[derive(Debug, Clone)]
pub struct CreateFileVersion {
    /// The file this version belongs to.
    pub file_id: FileId,
    /// Version number.
    pub version_number: i64,
    /// Path within the storage root.
    pub storage_path: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Content checksum.
    pub checksum: String,
    /// Optional comment.
    pub comment: Option<String>,
    /// Creating user.
    pub created_by: UserId,
}
