//! File versioning: enable, snapshot, restore and disable.
//!
//! A versioned file always has exactly one version row pointing at its
//! live path, the row of its current version. Older versions live at
//! archival paths next to it (`<stem>_v<n>.<ext>`).

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::types::FileId;
use adrive_database::repositories::FileRepository;
use adrive_database::repositories::file::ArchivedVersion;
use adrive_entity::file::{CreateFileVersion, File, FileVersion};
use adrive_storage::StorageLayout;

use crate::context::RequestContext;
use crate::file::download::DownloadResult;
use crate::file::service::owned_file;
use crate::lock::ItemLocks;

/// Comment attached to the snapshot taken when versioning is enabled.
const INITIAL_VERSION_COMMENT: &str = "Initial version";

/// Manages file versioning.
#[derive(Debug, Clone)]
pub struct VersionService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
    /// Keyed locks.
    locks: Arc<ItemLocks>,
    /// Largest accepted version upload.
    max_upload_size_bytes: u64,
}

impl VersionService {
    /// Creates a new version service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        storage: Arc<dyn StorageProvider>,
        locks: Arc<ItemLocks>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            file_repo,
            storage,
            locks,
            max_upload_size_bytes,
        }
    }

    /// Turns versioning on, recording the current content as the first version.
    pub async fn enable_versioning(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> AppResult<FileVersion> {
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        if file.versioning_enabled {
            return Err(AppError::validation(
                "Versioning is already enabled for this file",
            ));
        }

        let checksum = self.storage.checksum(&file.storage_path).await?;
        let version = self
            .file_repo
            .enable_versioning(&CreateFileVersion {
                file_id: file.id,
                version_number: file.current_version,
                storage_path: file.storage_path.clone(),
                size_bytes: file.size_bytes,
                checksum,
                comment: Some(INITIAL_VERSION_COMMENT.to_string()),
                created_by: ctx.user_id,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            version = version.version_number,
            "Versioning enabled"
        );
        Ok(version)
    }

    /// Turns versioning off. Archived copies are deleted, the live file stays.
    pub async fn disable_versioning(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = self.versioned_file(ctx, file_id).await?;
        let versions = self.file_repo.find_versions(file.id).await?;
        for version in &versions {
            if version.storage_path != file.storage_path {
                self.storage.delete(&version.storage_path).await?;
            }
        }

        let updated = self.file_repo.disable_versioning(file.id).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            removed = versions.len(),
            "Versioning disabled"
        );
        Ok(updated)
    }

    /// Lists a file's versions, oldest first.
    pub async fn list_versions(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> AppResult<Vec<FileVersion>> {
        let file = self.versioned_file(ctx, file_id).await?;
        self.file_repo.find_versions(file.id).await
    }

    /// Archives the current content and makes `data` the new current version.
    ///
    /// If anything fails after the archival copy was made, the live bytes
    /// are restored from it and the copy is removed.
    pub async fn create_new_version(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        data: Bytes,
        comment: Option<String>,
    ) -> AppResult<FileVersion> {
        if data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = self.versioned_file(ctx, file_id).await?;
        let archive_path = StorageLayout::version_path(&file.storage_path, file.current_version);
        if self.storage.exists(&archive_path).await?
            || self
                .file_repo
                .find_by_storage_path(&archive_path)
                .await?
                .is_some()
        {
            return Err(AppError::conflict(format!(
                "Archival location for version {} is already in use",
                file.current_version
            )));
        }

        self.storage.copy(&file.storage_path, &archive_path).await?;

        let comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        match self
            .commit_new_version(ctx, &file, &archive_path, data, comment)
            .await
        {
            Ok(version) => {
                info!(
                    user_id = %ctx.user_id,
                    file_id = %file.id,
                    version = version.version_number,
                    size = version.size_bytes,
                    "New version created"
                );
                Ok(version)
            }
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    file_id = %file.id,
                    error = %e,
                    "New version failed, restoring live content"
                );
                self.undo_archive(&file, &archive_path).await;
                Err(e)
            }
        }
    }

    /// Copies an older version's bytes over the live file.
    ///
    /// No version row is added and the current version number is unchanged.
    pub async fn restore_version(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        version_number: i64,
    ) -> AppResult<File> {
        let _guard = self.locks.file(ctx.user_id, file_id).await;

        let file = self.versioned_file(ctx, file_id).await?;
        let version = self.find_version(&file, version_number).await?;
        if version.storage_path == file.storage_path {
            return Err(AppError::validation(format!(
                "Version {version_number} is already the live content"
            )));
        }

        self.storage
            .copy(&version.storage_path, &file.storage_path)
            .await?;
        let meta = self.storage.metadata(&file.storage_path).await?;
        let updated = self
            .file_repo
            .update_size(file.id, meta.size_bytes as i64)
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            version = version_number,
            "Version restored"
        );
        Ok(updated)
    }

    /// Opens a specific version for download.
    pub async fn download_version(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        version_number: i64,
    ) -> AppResult<DownloadResult> {
        let file = self.versioned_file(ctx, file_id).await?;
        let version = self.find_version(&file, version_number).await?;
        let stream = self.storage.read(&version.storage_path).await?;

        let filename = if version.storage_path == file.storage_path {
            file.name.clone()
        } else {
            StorageLayout::version_path(&file.name, version_number)
        };

        Ok(DownloadResult {
            content_type: file.mime_type.clone(),
            filename,
            size_bytes: version.size_bytes as u64,
            file,
            stream,
        })
    }

    async fn versioned_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let file = owned_file(&self.file_repo, ctx.user_id, file_id).await?;
        if !file.versioning_enabled {
            return Err(AppError::validation(
                "Versioning is not enabled for this file",
            ));
        }
        Ok(file)
    }

    async fn find_version(&self, file: &File, version_number: i64) -> AppResult<FileVersion> {
        self.file_repo
            .find_version(file.id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {version_number} of file {} not found",
                    file.id
                ))
            })
    }

    async fn commit_new_version(
        &self,
        ctx: &RequestContext,
        file: &File,
        archive_path: &str,
        data: Bytes,
        comment: Option<String>,
    ) -> AppResult<FileVersion> {
        let archived_checksum = self.storage.checksum(archive_path).await?;
        let archived_size = self.storage.metadata(archive_path).await?.size_bytes as i64;

        let size_bytes = data.len() as i64;
        self.storage.write(&file.storage_path, data).await?;
        let checksum = self.storage.checksum(&file.storage_path).await?;

        let (_, version) = self
            .file_repo
            .record_new_version(
                &ArchivedVersion {
                    version_number: file.current_version,
                    storage_path: archive_path.to_string(),
                    size_bytes: archived_size,
                    checksum: archived_checksum,
                },
                &CreateFileVersion {
                    file_id: file.id,
                    version_number: file.current_version + 1,
                    storage_path: file.storage_path.clone(),
                    size_bytes,
                    checksum,
                    comment,
                    created_by: ctx.user_id,
                },
            )
            .await?;
        Ok(version)
    }

    async fn undo_archive(&self, file: &File, archive_path: &str) {
        if let Err(e) = self.storage.copy(archive_path, &file.storage_path).await {
            error!(
                file_id = %file.id,
                error = %e,
                "Failed to restore live content from archival copy"
            );
            return;
        }
        if let Err(e) = self.storage.delete(archive_path).await {
            error!(file_id = %file.id, error = %e, "Failed to remove archival copy");
        }
    }
}
