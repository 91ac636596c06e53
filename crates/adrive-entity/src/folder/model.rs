//! Folder entity model.

use adrive_core::types::{FolderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::file::File;

/// Default icon type for new folders.
pub const DEFAULT_ICON_TYPE: &str = "folder";
/// Default icon color for new folders.
pub const DEFAULT_ICON_COLOR: &str = "text-blue-500";

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub user_id: UserId,
    /// Parent folder ID (null for top-level folders).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Materialized logical path (e.g., `Docs/2024`).
    pub path: String,
    /// Icon shown by clients.
    pub icon_type: String,
    /// Icon color shown by clients.
    pub icon_color: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
    /// Whether the caller marked this folder as a favorite. Not stored.
    #[sqlx(skip)]
    #[serde(default)]
    pub is_favorite: bool,
}

impl Folder {
    /// Check if this is a top-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of path components, `0` for top-level folders.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }

    /// Check whether `other` lives somewhere below this folder.
    pub fn is_ancestor_of(&self, other: &Folder) -> bool {
        other.user_id == self.user_id
            && other
                .path
                .strip_prefix(&self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Data required to create a new folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub user_id: UserId,
    /// Parent folder (None for top level).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Materialized logical path.
    pub path: String,
    /// Icon type.
    pub icon_type: String,
    /// Icon color.
    pub icon_color: String,
}

/// Direct children of a folder (or of the synthetic root).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderContents {
    /// Child folders, ordered by name.
    pub folders: Vec<Folder>,
    /// Child files, ordered by name.
    pub files: Vec<File>,
}
