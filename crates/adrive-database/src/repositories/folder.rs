//! Folder repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::types::{FolderId, UserId};
use adrive_entity::folder::model::{CreateFolder, Folder};

use super::is_unique_violation;

/// Ids of every folder strictly below `?` (bound once).
const DESCENDANT_IDS: &str = "WITH RECURSIVE sub(id) AS ( \
        SELECT id FROM folders WHERE parent_id = ? \
        UNION ALL \
        SELECT f.id FROM folders f INNER JOIN sub s ON f.parent_id = s.id \
     ) SELECT id FROM sub";

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID regardless of owner.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder owned by the given user.
    pub async fn find_owned(&self, user_id: UserId, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by its logical path.
    pub async fn find_by_path(&self, user_id: UserId, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE user_id = ? AND path = ?")
            .bind(user_id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    /// List direct children of a folder, or top-level folders when `parent_id` is `None`.
    pub async fn find_children(
        &self,
        user_id: UserId,
        parent_id: Option<FolderId>,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE user_id = ? AND parent_id IS ? ORDER BY name ASC",
        )
        .bind(user_id)
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// List every folder a user owns, parents before children.
    pub async fn find_all(&self, user_id: UserId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE user_id = ? ORDER BY path ASC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Ids of all folders strictly below the given folder.
    pub async fn find_descendant_ids(&self, folder_id: FolderId) -> AppResult<Vec<FolderId>> {
        sqlx::query_scalar::<_, FolderId>(DESCENDANT_IDS)
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list descendants", e)
            })
    }

    /// Get the ancestor chain from the top-level folder down to (and including) this folder.
    pub async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE ancestors(id, parent_id, lvl) AS ( \
                SELECT id, parent_id, 0 FROM folders WHERE id = ? \
                UNION ALL \
                SELECT f.id, f.parent_id, a.lvl + 1 FROM folders f \
                INNER JOIN ancestors a ON f.id = a.parent_id \
             ) SELECT f.* FROM folders f INNER JOIN ancestors a ON f.id = a.id \
             ORDER BY a.lvl DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (user_id, parent_id, name, path, icon_type, icon_color, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.path)
        .bind(&data.icon_type)
        .bind(&data.icon_color)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Folder '{}' already exists", data.path))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create folder", e)
            }
        })
    }

    /// Give a folder a new parent, name and path, rewriting the stored path of
    /// every descendant in the same transaction.
    pub async fn relocate(
        &self,
        folder: &Folder,
        new_parent_id: Option<FolderId>,
        new_name: &str,
        new_path: &str,
    ) -> AppResult<Folder> {
        let now = Utc::now();
        let map_err = |e: sqlx::Error| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("Folder '{new_path}' already exists"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to update folder path", e)
            }
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = ?, name = ?, path = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(new_parent_id)
        .bind(new_name)
        .bind(new_path)
        .bind(now)
        .bind(folder.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_err)?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", folder.id)))?;

        sqlx::query(&format!(
            "UPDATE folders SET path = ? || substr(path, length(?) + 1), updated_at = ? \
             WHERE id IN ({DESCENDANT_IDS})"
        ))
        .bind(new_path)
        .bind(&folder.path)
        .bind(now)
        .bind(folder.id)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder update", e)
        })?;

        Ok(updated)
    }

    /// Delete a folder (cascades to child folders, files and versions).
    pub async fn delete(&self, folder_id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Search folder names with a `LIKE` pattern (escape character `\`).
    pub async fn search(
        &self,
        user_id: UserId,
        pattern: &str,
        limit: i64,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE user_id = ? AND name LIKE ? ESCAPE '\\' \
             ORDER BY name ASC LIMIT ?",
        )
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search folders", e))
    }
}
