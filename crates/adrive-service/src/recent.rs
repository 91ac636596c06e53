//! Recently accessed files and folders.

use std::sync::Arc;

use tracing::debug;

use adrive_core::result::AppResult;
use adrive_database::repositories::{FileRepository, FolderRepository, RecentAccessRepository};
use adrive_entity::favorite::ItemType;
use adrive_entity::recent::{RecentAccess, RecentItem};

use crate::context::RequestContext;
use crate::item::ItemLookup;

/// Default number of recent items returned.
pub const DEFAULT_RECENT_LIMIT: i64 = 20;
/// Upper bound on the number of recent items returned.
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Tracks and lists recent accesses.
#[derive(Debug, Clone)]
pub struct RecentService {
    /// Recent access repository.
    recent_repo: Arc<RecentAccessRepository>,
    /// Item lookup.
    items: ItemLookup,
}

impl RecentService {
    /// Creates a new recent access service.
    pub fn new(
        recent_repo: Arc<RecentAccessRepository>,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
    ) -> Self {
        Self {
            recent_repo,
            items: ItemLookup::new(folder_repo, file_repo),
        }
    }

    /// Records an access to an owned item.
    pub async fn track(
        &self,
        ctx: &RequestContext,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<RecentAccess> {
        self.items.require(ctx.user_id, item_type, item_id).await?;
        let access = self.recent_repo.touch(ctx.user_id, item_type, item_id).await?;
        debug!(user_id = %ctx.user_id, item_type = %item_type, item_id, "Access tracked");
        Ok(access)
    }

    /// Most recently accessed items that still exist.
    ///
    /// `limit` defaults to 20 and is clamped to `1..=100`.
    pub async fn recent_items(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<RecentItem>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);

        let mut items = Vec::new();
        for access in self.recent_repo.find_recent(ctx.user_id, limit).await? {
            let Some(item) = self
                .items
                .find(ctx.user_id, access.item_type, access.item_id)
                .await?
            else {
                continue;
            };
            let (file, folder) = item.into_parts();
            items.push(RecentItem {
                item_type: access.item_type,
                item_id: access.item_id,
                accessed_at: access.accessed_at,
                file,
                folder,
            });
        }
        Ok(items)
    }
}
