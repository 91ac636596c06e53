//! File and file version repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::types::{FileId, FolderId, UserId};
use adrive_entity::file::model::{CreateFile, File};
use adrive_entity::file::version::{CreateFileVersion, FileVersion};

use super::is_unique_violation;

/// Repository for file CRUD, search and version history.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

/// Filter applied by [`FileRepository::search`].
#[derive(Debug, Clone, Default)]
pub struct FileSearch<'a> {
    /// `LIKE` pattern matched against the display name (escape character `\`).
    pub name_pattern: &'a str,
    /// If non-empty, the MIME type must start with one of these prefixes.
    pub mime_prefixes: &'a [&'a str],
    /// Maximum number of rows.
    pub limit: i64,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file by ID regardless of owner.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file owned by the given user.
    pub async fn find_owned(&self, user_id: UserId, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find the file whose live bytes are stored at the given path.
    pub async fn find_by_storage_path(&self, storage_path: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE storage_path = ?")
            .bind(storage_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by path", e)
            })
    }

    /// List files directly inside a folder, or top-level files when `folder_id` is `None`.
    pub async fn find_by_folder(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = ? AND folder_id IS ? ORDER BY name ASC",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List every file inside a folder or any of its descendants.
    pub async fn find_in_subtree(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "WITH RECURSIVE sub(id) AS ( \
                SELECT ? \
                UNION ALL \
                SELECT f.id FROM folders f INNER JOIN sub s ON f.parent_id = s.id \
             ) SELECT * FROM files WHERE folder_id IN (SELECT id FROM sub) ORDER BY id ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list subtree files", e))
    }

    /// Number of files per folder for a user.
    pub async fn count_by_folder(&self, user_id: UserId) -> AppResult<Vec<(FolderId, i64)>> {
        sqlx::query_as::<_, (FolderId, i64)>(
            "SELECT folder_id, COUNT(*) FROM files \
             WHERE user_id = ? AND folder_id IS NOT NULL GROUP BY folder_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        sqlx::query_as::<_, File>(
            "INSERT INTO files (user_id, folder_id, name, original_name, storage_path, size_bytes, \
             mime_type, current_version, versioning_enabled, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 1, 0, ?, ?) RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.original_name)
        .bind(&data.storage_path)
        .bind(data.size_bytes)
        .bind(&data.mime_type)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!("A file named '{}' already exists", data.original_name))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create file", e)
            }
        })
    }

    /// Change the display name of a file.
    pub async fn rename(&self, file_id: FileId, new_name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(new_name)
        .bind(Utc::now())
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Move a file to another folder (or to the top level).
    pub async fn move_to(&self, file_id: FileId, folder_id: Option<FolderId>) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(folder_id)
        .bind(Utc::now())
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Record a new live size without touching the version counter.
    pub async fn update_size(&self, file_id: FileId, size_bytes: i64) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET size_bytes = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(size_bytes)
        .bind(Utc::now())
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file size", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Delete a file record (cascades to its versions).
    pub async fn delete(&self, file_id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Search a user's files by name and optional MIME family.
    pub async fn search(&self, user_id: UserId, filter: &FileSearch<'_>) -> AppResult<Vec<File>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM files WHERE user_id = ");
        query.push_bind(user_id);
        query.push(" AND name LIKE ");
        query.push_bind(filter.name_pattern);
        query.push(" ESCAPE '\\'");

        if !filter.mime_prefixes.is_empty() {
            query.push(" AND (");
            let mut separated = query.separated(" OR ");
            for prefix in filter.mime_prefixes {
                separated.push("mime_type LIKE ");
                separated.push_bind_unseparated(format!("{}%", super::escape_like(prefix)));
                separated.push_unseparated(" ESCAPE '\\'");
            }
            query.push(")");
        }

        query.push(" ORDER BY name ASC LIMIT ");
        query.push_bind(filter.limit);

        query
            .build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search files", e))
    }

    /// Distinct MIME types among a user's files.
    pub async fn distinct_mime_types(&self, user_id: UserId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT mime_type FROM files WHERE user_id = ? ORDER BY mime_type ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file types", e))
    }

    // ── Versions ─────────────────────────────────────────────────────

    /// List all versions of a file, oldest first.
    pub async fn find_versions(&self, file_id: FileId) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = ? ORDER BY version_number ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    /// Find one version of a file by number.
    pub async fn find_version(
        &self,
        file_id: FileId,
        version_number: i64,
    ) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions WHERE file_id = ? AND version_number = ?",
        )
        .bind(file_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    /// Record the initial version and turn versioning on, atomically.
    pub async fn enable_versioning(&self, initial: &CreateFileVersion) -> AppResult<FileVersion> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let version = insert_version(&mut tx, initial).await?;

        sqlx::query(
            "UPDATE files SET versioning_enabled = 1, current_version = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(initial.version_number)
        .bind(now)
        .bind(initial.file_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to enable versioning", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit versioning", e)
        })?;
        Ok(version)
    }

    /// Re-point the current version at its archival copy, record the new
    /// current version at the live path, and bump the file's counter and size.
    pub async fn record_new_version(
        &self,
        archived: &ArchivedVersion,
        next: &CreateFileVersion,
    ) -> AppResult<(File, FileVersion)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let archived_rows = sqlx::query(
            "UPDATE file_versions SET storage_path = ?, checksum = ?, size_bytes = ? \
             WHERE file_id = ? AND version_number = ?",
        )
        .bind(&archived.storage_path)
        .bind(&archived.checksum)
        .bind(archived.size_bytes)
        .bind(next.file_id)
        .bind(archived.version_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to archive version", e))?
        .rows_affected();

        if archived_rows == 0 {
            return Err(AppError::not_found(format!(
                "Version {} of file {} not found",
                archived.version_number, next.file_id
            )));
        }

        let version = insert_version(&mut tx, next).await?;

        let file = sqlx::query_as::<_, File>(
            "UPDATE files SET current_version = ?, size_bytes = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(next.version_number)
        .bind(next.size_bytes)
        .bind(now)
        .bind(next.file_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to bump version", e))?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", next.file_id)))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit new version", e)
        })?;
        Ok((file, version))
    }

    /// Drop all version rows and reset the file to an unversioned state.
    pub async fn disable_versioning(&self, file_id: FileId) -> AppResult<File> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM file_versions WHERE file_id = ?")
            .bind(file_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete versions", e)
            })?;

        let file = sqlx::query_as::<_, File>(
            "UPDATE files SET versioning_enabled = 0, current_version = 1, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(Utc::now())
        .bind(file_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to disable versioning", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit versioning", e)
        })?;
        Ok(file)
    }
}

/// Where the previous current version ends up once it is archived.
#[derive(Debug, Clone)]
pub struct ArchivedVersion {
    /// The version number being archived.
    pub version_number: i64,
    /// Archival path within the storage root.
    pub storage_path: String,
    /// Size of the archival copy.
    pub size_bytes: i64,
    /// Checksum recomputed from the archival copy.
    pub checksum: String,
}

async fn insert_version(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    data: &CreateFileVersion,
) -> AppResult<FileVersion> {
    sqlx::query_as::<_, FileVersion>(
        "INSERT INTO file_versions (file_id, version_number, storage_path, size_bytes, checksum, \
         comment, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(data.file_id)
    .bind(data.version_number)
    .bind(&data.storage_path)
    .bind(data.size_bytes)
    .bind(&data.checksum)
    .bind(&data.comment)
    .bind(data.created_by)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict(format!(
                "Version {} of file {} already exists",
                data.version_number, data.file_id
            ))
        } else {
            AppError::with_source(ErrorKind::Database, "Failed to record version", e)
        }
    })
}
