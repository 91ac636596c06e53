//! Resolution of `(item_type, item_id)` references to live, owned items.

use std::sync::Arc;

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::types::{FileId, FolderId, UserId};
use adrive_database::repositories::{FileRepository, FolderRepository};
use adrive_entity::favorite::ItemType;
use adrive_entity::file::File;
use adrive_entity::folder::Folder;

/// A file or folder that still exists.
#[derive(Debug, Clone)]
pub(crate) enum LiveItem {
    File(File),
    Folder(Folder),
}

impl LiveItem {
    pub(crate) fn into_parts(self) -> (Option<File>, Option<Folder>) {
        match self {
            Self::File(file) => (Some(file), None),
            Self::Folder(folder) => (None, Some(folder)),
        }
    }
}

/// Looks up items referenced by favorites and recent-access rows.
#[derive(Debug, Clone)]
pub(crate) struct ItemLookup {
    folder_repo: Arc<FolderRepository>,
    file_repo: Arc<FileRepository>,
}

impl ItemLookup {
    pub(crate) fn new(folder_repo: Arc<FolderRepository>, file_repo: Arc<FileRepository>) -> Self {
        Self {
            folder_repo,
            file_repo,
        }
    }

    /// The item, if it exists and belongs to the user.
    pub(crate) async fn find(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<Option<LiveItem>> {
        Ok(match item_type {
            ItemType::File => self
                .file_repo
                .find_owned(user_id, FileId(item_id))
                .await?
                .map(LiveItem::File),
            ItemType::Folder => self
                .folder_repo
                .find_owned(user_id, FolderId(item_id))
                .await?
                .map(LiveItem::Folder),
        })
    }

    /// Like [`ItemLookup::find`], but a missing item is `NotFound`.
    pub(crate) async fn require(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<LiveItem> {
        self.find(user_id, item_type, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{item_type} {item_id} not found")))
    }
}
