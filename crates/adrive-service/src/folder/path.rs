//! Path resolution: logical folder paths and their physical counterparts.

use std::sync::Arc;

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::types::{FolderId, UserId};
use adrive_database::repositories::FolderRepository;
use adrive_entity::folder::Folder;
use adrive_storage::layout::StorageLayout;

/// A folder location: the (optional) folder row, its logical path and the
/// physical directory mirroring it.
#[derive(Debug, Clone)]
pub struct ResolvedFolder {
    /// The folder, or `None` for the user's synthetic root.
    pub folder: Option<Folder>,
    /// Logical path (empty for the synthetic root).
    pub logical_path: String,
    /// Directory relative to the storage root.
    pub physical_path: String,
}

impl ResolvedFolder {
    /// The folder id, `None` for the synthetic root.
    pub fn id(&self) -> Option<FolderId> {
        self.folder.as_ref().map(|f| f.id)
    }

    /// Logical path of a child with the given (already sanitized) name.
    pub fn child_path(&self, name: &str) -> String {
        let parent = self.folder.as_ref().map(|f| f.path.as_str());
        StorageLayout::join_logical(parent, name)
    }
}

/// Resolves folder references within a user's tree and maps logical paths
/// onto the physical mirror.
#[derive(Debug, Clone)]
pub struct PathResolver {
    folder_repo: Arc<FolderRepository>,
}

impl PathResolver {
    /// Creates a new path resolver.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Load a folder owned by the user, `NotFound` otherwise.
    pub async fn owned_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_owned(user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Resolve a nullable folder reference. `None` and `0` mean the synthetic root.
    pub async fn resolve(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<ResolvedFolder> {
        match FolderId::non_root(folder_id) {
            Some(id) => {
                let folder = self.owned_folder(user_id, id).await?;
                Ok(self.resolved(user_id, folder))
            }
            None => Ok(ResolvedFolder {
                folder: None,
                logical_path: String::new(),
                physical_path: StorageLayout::user_root(user_id),
            }),
        }
    }

    /// Wrap an already loaded folder.
    pub fn resolved(&self, user_id: UserId, folder: Folder) -> ResolvedFolder {
        let physical_path = self.physical_dir(user_id, &folder.path);
        ResolvedFolder {
            logical_path: folder.path.clone(),
            physical_path,
            folder: Some(folder),
        }
    }

    /// Physical directory (relative to the storage root) for a logical path.
    pub fn physical_dir(&self, user_id: UserId, logical_path: &str) -> String {
        StorageLayout::folder_dir(user_id, logical_path)
    }
}
