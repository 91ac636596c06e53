//! Favorite entity model.

use adrive_core::types::{FavoriteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::item::ItemType;
use crate::file::File;
use crate::folder::Folder;

/// A user's favorite mark on a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    /// Unique favorite identifier.
    pub id: FavoriteId,
    /// The owning user.
    pub user_id: UserId,
    /// Kind of the favorited item.
    pub item_type: ItemType,
    /// Raw id of the favorited item.
    pub item_id: i64,
    /// When the favorite was added.
    pub created_at: DateTime<Utc>,
}

/// A favorite resolved to its live item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteItem {
    /// The favorite row.
    #[serde(flatten)]
    pub favorite: Favorite,
    /// The favorited file, if `item_type` is `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<File>,
    /// The favorited folder, if `item_type` is `folder`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<Folder>,
}

/// Answer to "is this item a favorite?".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStatus {
    /// Whether a favorite exists.
    pub is_favorite: bool,
    /// The favorite's id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_id: Option<FavoriteId>,
}
