//! File metadata operations: lookup, rename, move and delete.

use std::sync::Arc;

use tracing::{info, warn};

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::types::{FileId, FolderId, UserId};
use adrive_database::repositories::{
    FavoriteRepository, FileRepository, RecentAccessRepository,
};
use adrive_entity::favorite::ItemType;
use adrive_entity::file::File;
use adrive_storage::layout::sanitize_name;

use crate::context::RequestContext;
use crate::folder::path::PathResolver;
use crate::lock::ItemLocks;
use crate::trash::Tombstone;

/// Manages file metadata.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Favorite repository.
    favorite_repo: Arc<FavoriteRepository>,
    /// Recent access repository.
    recent_repo: Arc<RecentAccessRepository>,
    /// Path resolver.
    resolver: PathResolver,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
    /// Keyed locks.
    locks: Arc<ItemLocks>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        favorite_repo: Arc<FavoriteRepository>,
        recent_repo: Arc<RecentAccessRepository>,
        resolver: PathResolver,
        storage: Arc<dyn StorageProvider>,
        locks: Arc<ItemLocks>,
    ) -> Self {
        Self {
            file_repo,
            favorite_repo,
            recent_repo,
            resolver,
            storage,
            locks,
        }
    }

    /// Gets a file owned by the caller.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let mut file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        file.is_favorite = self
            .favorite_repo
            .find_by_item(ctx.user_id, ItemType::File, file.id.get())
            .await?
            .is_some();
        Ok(file)
    }

    /// Changes a file's display name. The stored bytes stay where they are.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_name: &str,
    ) -> AppResult<File> {
        let name = sanitize_name(new_name)?;
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        let updated = self.file_repo.rename(file.id, &name).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            old_name = %file.name,
            new_name = %updated.name,
            "File renamed"
        );
        Ok(updated)
    }

    /// Puts a file into another folder (`None` or `0` for the top level).
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target: Option<FolderId>,
    ) -> AppResult<File> {
        let _tree = self.locks.tree_read(ctx.user_id).await;
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        let destination = self.resolver.resolve(ctx.user_id, target).await?;
        if destination.id() == file.folder_id {
            return Ok(file);
        }

        let updated = self.file_repo.move_to(file.id, destination.id()).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_id = ?updated.folder_id,
            "File moved"
        );
        Ok(updated)
    }

    /// Removes a file's record together with its live and archived bytes.
    ///
    /// The bytes are moved aside first and put back if the row delete fails.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        let mut trash =
            Tombstone::open(self.storage.as_ref(), ctx.user_id, &format!("file_{}", file.id))
                .await?;
        let committed = async {
            trash.stash_file(&self.file_repo, &file).await?;
            self.file_repo.delete(file.id).await
        }
        .await;

        if let Err(e) = committed {
            warn!(
                user_id = %ctx.user_id,
                file_id = %file.id,
                error = %e,
                "File delete failed, restoring its bytes"
            );
            trash.restore().await;
            return Err(e);
        }
        trash.purge().await;

        self.favorite_repo.purge_orphans(ctx.user_id).await?;
        self.recent_repo.purge_orphans(ctx.user_id).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            name = %file.name,
            "File deleted"
        );
        Ok(())
    }
}

/// Load a file owned by the user, `NotFound` otherwise.
pub(crate) async fn owned_file(
    file_repo: &FileRepository,
    user_id: UserId,
    file_id: FileId,
) -> AppResult<File> {
    file_repo
        .find_owned(user_id, file_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
}
