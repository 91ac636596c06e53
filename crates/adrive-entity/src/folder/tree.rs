//! Nested views of a user's folders: the full tree and breadcrumbs.

use adrive_core::types::FolderId;
use serde::{Deserialize, Serialize};

/// One folder with its subfolders already nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Materialized logical path, e.g. `Docs/2024`.
    pub path: String,
    /// `0` for top-level folders.
    pub depth: usize,
    /// Direct subfolders.
    pub child_count: u64,
    /// Files directly inside this folder.
    pub file_count: u64,
    /// Subfolders, ordered by name.
    pub children: Vec<FolderNode>,
}

/// Every folder a user owns, nested under the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// Top-level folders, ordered by name.
    pub roots: Vec<FolderNode>,
    /// Folder count across all depths.
    pub total_folders: u64,
}

impl FolderTree {
    /// Tree of a user without folders.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }
}

/// One step of the chain from a top-level folder down to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}
