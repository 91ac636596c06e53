//! Favorite repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::types::{FavoriteId, UserId};
use adrive_entity::favorite::{Favorite, ItemType};

use super::is_unique_violation;

/// Repository for a user's favorite marks.
#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    pool: SqlitePool,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a favorite. A duplicate `(user, item_type, item_id)` is a conflict.
    pub async fn create(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, item_type, item_id, created_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("{item_type} {item_id} is already a favorite"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to add favorite", e)
            }
        })
    }

    /// List a user's favorites, newest first.
    pub async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list favorites", e))
    }

    /// Find the favorite for a specific item.
    pub async fn find_by_item(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites WHERE user_id = ? AND item_type = ? AND item_id = ?",
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find favorite", e))
    }

    /// Ids of all items of one type a user marked as favorite.
    pub async fn find_item_ids(&self, user_id: UserId, item_type: ItemType) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT item_id FROM favorites WHERE user_id = ? AND item_type = ?",
        )
        .bind(user_id)
        .bind(item_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list favorites", e))
    }

    /// Delete a favorite by id.
    pub async fn delete(&self, user_id: UserId, id: FavoriteId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove favorite", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the favorite pointing at a specific item.
    pub async fn delete_by_item(
        &self,
        user_id: UserId,
        item_type: ItemType,
        item_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = ? AND item_type = ? AND item_id = ?",
        )
        .bind(user_id)
        .bind(item_type)
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove favorite", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove favorites whose file or folder no longer exists.
    pub async fn purge_orphans(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = ? AND ( \
                (item_type = 'file' AND item_id NOT IN (SELECT id FROM files)) \
                OR (item_type = 'folder' AND item_id NOT IN (SELECT id FROM folders)))",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to purge favorites", e))?;
        Ok(result.rows_affected())
    }
}
