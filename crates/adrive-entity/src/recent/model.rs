//! Recent access entity model.

use adrive_core::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::favorite::ItemType;
use crate::file::File;
use crate::folder::Folder;

/// The last time a user opened a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecentAccess {
    /// Row identifier.
    pub id: i64,
    /// The owning user.
    pub user_id: UserId,
    /// Kind of the accessed item.
    pub item_type: ItemType,
    /// Raw id of the accessed item.
    pub item_id: i64,
    /// Last access time.
    pub accessed_at: DateTime<Utc>,
    /// When the row was first created.
    pub created_at: DateTime<Utc>,
}

/// A recent-access row resolved to its live item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentItem {
    /// Kind of the item.
    pub item_type: ItemType,
    /// Raw id of the item.
    pub item_id: i64,
    /// Last access time.
    pub accessed_at: DateTime<Utc>,
    /// The file, if `item_type` is `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<File>,
    /// The folder, if `item_type` is `folder`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<Folder>,
}
