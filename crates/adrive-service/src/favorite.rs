//! Favorite marks on files and folders.

use std::sync::Arc;

use tracing::info;

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::types::FavoriteId;
use adrive_database::repositories::{FavoriteRepository, FileRepository, FolderRepository};
use adrive_entity::favorite::{Favorite, FavoriteItem, FavoriteStatus, ItemType};

use crate::context::RequestContext;
use crate::item::ItemLookup;

/// Manages a user's favorites.
#[derive(Debug, Clone)]
pub struct FavoriteService {
    /// Favorite repository.
    favorite_repo: Arc<FavoriteRepository>,
    /// Item lookup.
    items: ItemLookup,
}

impl FavoriteService {
    /// Creates a new favorite service.
    pub fn new(
        favorite_repo: Arc<FavoriteRepository>,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
    ) -> Self {
        Self {
            favorite_repo,
            items: ItemLookup::new(folder_repo, file_repo),
        }
    }

    /// Marks an owned item as favorite.
    pub async fn add(
        &self,
        ctx: &RequestContext,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<Favorite> {
        self.items.require(ctx.user_id, item_type, item_id).await?;
        let favorite = self
            .favorite_repo
            .create(ctx.user_id, item_type, item_id)
            .await?;

        info!(
            user_id = %ctx.user_id,
            favorite_id = %favorite.id,
            item_type = %item_type,
            item_id,
            "Favorite added"
        );
        Ok(favorite)
    }

    /// Lists favorites newest first, skipping those whose item is gone.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<FavoriteItem>> {
        let favorites = self.favorite_repo.find_by_user(ctx.user_id).await?;
        let mut items = Vec::with_capacity(favorites.len());
        for favorite in favorites {
            let Some(item) = self
                .items
                .find(ctx.user_id, favorite.item_type, favorite.item_id)
                .await?
            else {
                continue;
            };
            let (mut file, mut folder) = item.into_parts();
            if let Some(file) = file.as_mut() {
                file.is_favorite = true;
            }
            if let Some(folder) = folder.as_mut() {
                folder.is_favorite = true;
            }
            items.push(FavoriteItem {
                favorite,
                file,
                folder,
            });
        }
        Ok(items)
    }

    /// Removes a favorite by id.
    pub async fn remove(&self, ctx: &RequestContext, favorite_id: FavoriteId) -> AppResult<()> {
        if !self.favorite_repo.delete(ctx.user_id, favorite_id).await? {
            return Err(AppError::not_found(format!(
                "Favorite {favorite_id} not found"
            )));
        }
        info!(user_id = %ctx.user_id, favorite_id = %favorite_id, "Favorite removed");
        Ok(())
    }

    /// Removes the favorite pointing at an item.
    pub async fn remove_by_item(
        &self,
        ctx: &RequestContext,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<()> {
        if !self
            .favorite_repo
            .delete_by_item(ctx.user_id, item_type, item_id)
            .await?
        {
            return Err(AppError::not_found(format!(
                "{item_type} {item_id} is not a favorite"
            )));
        }
        info!(
            user_id = %ctx.user_id,
            item_type = %item_type,
            item_id,
            "Favorite removed"
        );
        Ok(())
    }

    /// Whether an item is a favorite.
    pub async fn check(
        &self,
        ctx: &RequestContext,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<FavoriteStatus> {
        let favorite = self
            .favorite_repo
            .find_by_item(ctx.user_id, item_type, item_id)
            .await?;
        Ok(FavoriteStatus {
            is_favorite: favorite.is_some(),
            favorite_id: favorite.map(|f| f.id),
        })
    }
}
