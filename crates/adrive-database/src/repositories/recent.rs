//! Recent access repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::types::UserId;
use adrive_entity::favorite::ItemType;
use adrive_entity::recent::RecentAccess;

/// Repository for per-user recent access timestamps.
#[derive(Debug, Clone)]
pub struct RecentAccessRepository {
    pool: SqlitePool,
}

impl RecentAccessRepository {
    /// Create a new recent access repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an access: refresh `accessed_at` if the item was seen before, insert otherwise.
    pub async fn touch(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<RecentAccess> {
        let now = Utc::now();
        sqlx::query_as::<_, RecentAccess>(
            "INSERT INTO recent_accesses (user_id, item_type, item_id, accessed_at, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (user_id, item_type, item_id) DO UPDATE SET accessed_at = excluded.accessed_at \
             RETURNING *",
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to track access", e))
    }

    /// Most recently accessed items first.
    pub async fn find_recent(&self, user_id: UserId, limit: i64) -> AppResult<Vec<RecentAccess>> {
        sqlx::query_as::<_, RecentAccess>(
            "SELECT * FROM recent_accesses WHERE user_id = ? \
             ORDER BY accessed_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list recent items", e))
    }

    /// Remove rows whose file or folder no longer exists.
    pub async fn purge_orphans(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM recent_accesses WHERE user_id = ? AND ( \
                (item_type = 'file' AND item_id NOT IN (SELECT id FROM files)) \
                OR (item_type = 'folder' AND item_id NOT IN (SELECT id FROM folders)))",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge recent items", e)
        })?;
        Ok(result.rows_affected())
    }
}
