//! File upload with size and MIME policy.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};

use adrive_core::config::StorageConfig;
use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::types::FolderId;
use adrive_database::repositories::FileRepository;
use adrive_entity::file::{CreateFile, File};
use adrive_storage::StorageLayout;
use adrive_storage::layout::sanitize_name;
use adrive_storage::mime::resolve_mime_type;

use crate::context::RequestContext;
use crate::folder::path::PathResolver;
use crate::lock::ItemLocks;

/// Handles single-request uploads.
#[derive(Clone)]
pub struct UploadService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Path resolver.
    resolver: PathResolver,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
    /// Storage configuration.
    config: StorageConfig,
    /// Keyed locks.
    locks: Arc<ItemLocks>,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

/// Upload parameters.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target folder (`None` or `0` for the top level).
    pub folder_id: Option<FolderId>,
    /// Client-supplied file name.
    pub file_name: String,
    /// Client-declared MIME type.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        resolver: PathResolver,
        storage: Arc<dyn StorageProvider>,
        config: StorageConfig,
        locks: Arc<ItemLocks>,
    ) -> Self {
        Self {
            file_repo,
            resolver,
            storage,
            config,
            locks,
        }
    }

    /// Stores the bytes at the user's flat location and records the file.
    ///
    /// An existing file with the same original name is a conflict; bytes
    /// are never overwritten. If the record cannot be inserted the bytes
    /// are removed again.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let name = sanitize_name(&req.file_name)?;
        let mime_type = resolve_mime_type(req.mime_type.as_deref(), &name);
        if !self.config.is_mime_allowed(&mime_type) {
            return Err(AppError::validation(format!(
                "File type '{mime_type}' is not allowed"
            )));
        }

        let _tree = self.locks.tree_read(ctx.user_id).await;
        let folder = self.resolver.resolve(ctx.user_id, req.folder_id).await?;

        let storage_path = StorageLayout::file_path(ctx.user_id, &name);
        if self
            .file_repo
            .find_by_storage_path(&storage_path)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A file named '{name}' already exists"
            )));
        }

        let size_bytes = req.data.len() as i64;
        self.storage.create_new(&storage_path, req.data).await?;

        let created = self
            .file_repo
            .create(&CreateFile {
                user_id: ctx.user_id,
                folder_id: folder.id(),
                name: name.clone(),
                original_name: name,
                storage_path: storage_path.clone(),
                size_bytes,
                mime_type,
            })
            .await;

        let file = match created {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    path = %storage_path,
                    error = %e,
                    "File record insert failed, removing stored bytes"
                );
                if let Err(undo_err) = self.storage.delete(&storage_path).await {
                    error!(
                        user_id = %ctx.user_id,
                        path = %storage_path,
                        error = %undo_err,
                        "Failed to remove orphaned upload"
                    );
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_id = ?file.folder_id,
            size = file.size_bytes,
            mime = %file.mime_type,
            "File uploaded"
        );
        Ok(file)
    }
}
