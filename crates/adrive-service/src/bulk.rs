//! Bulk delete, move and download over sets of files and folders.
//!
//! Items are processed one by one. A failing item is recorded and the rest
//! still run; nothing is rolled back. The request's cancellation token is
//! checked between items.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::types::{FileId, FolderId};
use adrive_database::repositories::{FileRepository, FolderRepository};
use adrive_storage::{ArchiveBuilder, ArchiveEntry};

use crate::context::RequestContext;
use crate::file::FileService;
use crate::folder::path::PathResolver;
use crate::folder::{ArchiveDownload, FolderService};
use crate::lock::ItemLocks;

/// What to do with the selected items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    /// Delete every item.
    Delete,
    /// Move every item under a target folder.
    Move,
    /// Zip every item into one archive.
    Download,
}

impl BulkAction {
    /// Return the action as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "move" => Ok(Self::Move),
            "download" => Ok(Self::Download),
            other => Err(AppError::validation(format!("Unknown bulk action '{other}'"))),
        }
    }
}

/// A bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    /// The action.
    pub action: BulkAction,
    /// Selected files.
    #[serde(default)]
    pub file_ids: Vec<FileId>,
    /// Selected folders.
    #[serde(default)]
    pub folder_ids: Vec<FolderId>,
    /// Move target; `0` means the top level. Required for `move`.
    #[serde(default, alias = "target_id")]
    pub target_folder_id: Option<FolderId>,
}

/// Outcome counters of a bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    /// `false` if any item failed or the run was cancelled.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Items handled successfully.
    pub processed: usize,
    /// Items that failed.
    pub failed: usize,
    /// Identifiers of failed items: the item's name, or `file_<id>` /
    /// `folder_<id>` when it could not be found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_items: Vec<String>,
}

impl BulkResult {
    fn record_failure(&mut self, token: String) {
        self.failed += 1;
        self.failed_items.push(token);
    }

    fn finish(mut self, verb: &str, cancelled: bool) -> Self {
        self.success = self.failed == 0 && !cancelled;
        self.message = if cancelled {
            format!(
                "Cancelled after {} items, {} failed",
                self.processed, self.failed
            )
        } else {
            format!("{verb} {} items, {} failed", self.processed, self.failed)
        };
        self
    }
}

/// A bulk download: the archive and what went into it.
#[derive(Debug)]
pub struct BulkDownload {
    /// The zip archive.
    pub archive: ArchiveDownload,
    /// Per-item outcome.
    pub result: BulkResult,
}

/// Result of [`BulkService::execute`].
#[derive(Debug)]
pub enum BulkOutcome {
    /// Delete or move finished.
    Completed(BulkResult),
    /// Download produced an archive.
    Archive(BulkDownload),
}

/// Runs bulk actions.
#[derive(Debug, Clone)]
pub struct BulkService {
    /// Folder service.
    folders: FolderService,
    /// File service.
    files: FileService,
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Path resolver.
    resolver: PathResolver,
    /// Zip writer.
    archiver: ArchiveBuilder,
    /// Keyed locks.
    locks: Arc<ItemLocks>,
}

impl BulkService {
    /// Creates a new bulk service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        folders: FolderService,
        files: FileService,
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        resolver: PathResolver,
        archiver: ArchiveBuilder,
        locks: Arc<ItemLocks>,
    ) -> Self {
        Self {
            folders,
            files,
            folder_repo,
            file_repo,
            resolver,
            archiver,
            locks,
        }
    }

    /// Dispatches a request to the matching action.
    pub async fn execute(&self, ctx: &RequestContext, req: BulkRequest) -> AppResult<BulkOutcome> {
        match req.action {
            BulkAction::Delete => self
                .delete(ctx, &req.file_ids, &req.folder_ids)
                .await
                .map(BulkOutcome::Completed),
            BulkAction::Move => {
                let target = req.target_folder_id.ok_or_else(|| {
                    AppError::validation("target_folder_id is required for move")
                })?;
                self.move_items(ctx, &req.file_ids, &req.folder_ids, target)
                    .await
                    .map(BulkOutcome::Completed)
            }
            BulkAction::Download => self
                .download(ctx, &req.file_ids, &req.folder_ids)
                .await
                .map(BulkOutcome::Archive),
        }
    }

    /// Deletes files first, then folders.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        file_ids: &[FileId],
        folder_ids: &[FolderId],
    ) -> AppResult<BulkResult> {
        let mut result = BulkResult::default();

        for &file_id in file_ids {
            if ctx.is_cancelled() {
                return Ok(cancelled(ctx, BulkAction::Delete, result));
            }
            let lookup = self.file_repo.find_owned(ctx.user_id, file_id).await;
            let missing = format!("file_{file_id}");
            let Some(file) = located(ctx, BulkAction::Delete, &missing, lookup) else {
                result.record_failure(missing);
                continue;
            };
            match self.files.delete_file(ctx, file_id).await {
                Ok(()) => result.processed += 1,
                Err(e) => {
                    log_item_failure(ctx, BulkAction::Delete, &file.name, &e);
                    result.record_failure(failure_token(&e, format!("file_{file_id}"), file.name));
                }
            }
        }

        for &folder_id in folder_ids {
            if ctx.is_cancelled() {
                return Ok(cancelled(ctx, BulkAction::Delete, result));
            }
            let lookup = self.folder_repo.find_owned(ctx.user_id, folder_id).await;
            let missing = format!("folder_{folder_id}");
            let Some(folder) = located(ctx, BulkAction::Delete, &missing, lookup) else {
                result.record_failure(missing);
                continue;
            };
            match self.folders.delete_folder(ctx, folder_id).await {
                Ok(()) => result.processed += 1,
                Err(e) => {
                    log_item_failure(ctx, BulkAction::Delete, &folder.name, &e);
                    result.record_failure(failure_token(
                        &e,
                        format!("folder_{folder_id}"),
                        folder.name,
                    ));
                }
            }
        }

        let result = result.finish("Processed", false);
        info!(
            user_id = %ctx.user_id,
            processed = result.processed,
            failed = result.failed,
            "Bulk delete finished"
        );
        Ok(result)
    }

    /// Moves files and folders under `target` (`0` for the top level).
    ///
    /// A missing target fails the whole request.
    pub async fn move_items(
        &self,
        ctx: &RequestContext,
        file_ids: &[FileId],
        folder_ids: &[FolderId],
        target: FolderId,
    ) -> AppResult<BulkResult> {
        let destination = self.resolver.resolve(ctx.user_id, Some(target)).await?;
        let target = destination.id();
        let mut result = BulkResult::default();

        for &file_id in file_ids {
            if ctx.is_cancelled() {
                return Ok(cancelled(ctx, BulkAction::Move, result));
            }
            let lookup = self.file_repo.find_owned(ctx.user_id, file_id).await;
            let missing = format!("file_{file_id}");
            let Some(file) = located(ctx, BulkAction::Move, &missing, lookup) else {
                result.record_failure(missing);
                continue;
            };
            match self.files.move_file(ctx, file_id, target).await {
                Ok(_) => result.processed += 1,
                Err(e) => {
                    log_item_failure(ctx, BulkAction::Move, &file.name, &e);
                    result.record_failure(failure_token(&e, format!("file_{file_id}"), file.name));
                }
            }
        }

        for &folder_id in folder_ids {
            if ctx.is_cancelled() {
                return Ok(cancelled(ctx, BulkAction::Move, result));
            }
            let lookup = self.folder_repo.find_owned(ctx.user_id, folder_id).await;
            let missing = format!("folder_{folder_id}");
            let Some(folder) = located(ctx, BulkAction::Move, &missing, lookup) else {
                result.record_failure(missing);
                continue;
            };
            match self.folders.move_folder(ctx, folder_id, target).await {
                Ok(_) => result.processed += 1,
                Err(e) => {
                    log_item_failure(ctx, BulkAction::Move, &folder.name, &e);
                    result.record_failure(failure_token(
                        &e,
                        format!("folder_{folder_id}"),
                        folder.name,
                    ));
                }
            }
        }

        let result = result.finish("Moved", false);
        info!(
            user_id = %ctx.user_id,
            target = ?target,
            processed = result.processed,
            failed = result.failed,
            "Bulk move finished"
        );
        Ok(result)
    }

    /// Zips the selected files (by display name) and folder subtrees.
    ///
    /// An item counts as processed only if all of its bytes made it into the
    /// archive; a folder whose subtree holds an unreadable file is a failure.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        file_ids: &[FileId],
        folder_ids: &[FolderId],
    ) -> AppResult<BulkDownload> {
        let _tree = self.locks.tree_read(ctx.user_id).await;
        let mut result = BulkResult::default();
        let mut entries = Vec::new();
        // Failure token and entry range per item, in request order.
        let mut items: Vec<(String, Option<Range<usize>>)> = Vec::new();

        for &file_id in file_ids {
            let missing = format!("file_{file_id}");
            let lookup = self.file_repo.find_owned(ctx.user_id, file_id).await;
            match located(ctx, BulkAction::Download, &missing, lookup) {
                Some(file) => {
                    let start = entries.len();
                    entries.push(ArchiveEntry::new(file.storage_path, file.name.clone()));
                    items.push((file.name, Some(start..entries.len())));
                }
                None => items.push((missing, None)),
            }
        }

        for &folder_id in folder_ids {
            let missing = format!("folder_{folder_id}");
            let lookup = self.folder_repo.find_owned(ctx.user_id, folder_id).await;
            let Some(folder) = located(ctx, BulkAction::Download, &missing, lookup) else {
                items.push((missing, None));
                continue;
            };
            match self.folders.archive_entries(&folder).await {
                Ok(folder_entries) => {
                    let start = entries.len();
                    entries.extend(folder_entries);
                    items.push((folder.name, Some(start..entries.len())));
                }
                Err(e) => {
                    log_item_failure(ctx, BulkAction::Download, &folder.name, &e);
                    items.push((folder.name, None));
                }
            }
        }

        let archive = self.archiver.build(entries, ctx.cancel.clone()).await?;
        for (token, range) in items {
            match range {
                Some(range) if range.clone().all(|i| archive.contains(i)) => {
                    result.processed += 1;
                }
                Some(_) => {
                    warn!(
                        user_id = %ctx.user_id,
                        item = %token,
                        "Bulk download left out unreadable content"
                    );
                    result.record_failure(token);
                }
                None => result.record_failure(token),
            }
        }
        let mut result = result.finish("Archived", false);
        result.message = format!("Created ZIP with {} items", result.processed);

        info!(
            user_id = %ctx.user_id,
            processed = result.processed,
            failed = result.failed,
            bytes = archive.size_bytes(),
            "Bulk download built"
        );
        Ok(BulkDownload {
            archive: ArchiveDownload::new(format!("bulk_download_{}.zip", ctx.user_id), archive),
            result,
        })
    }
}

/// Unwraps a per-item lookup. A failed lookup is logged and treated like a
/// missing item so the run can go on.
fn located<T>(
    ctx: &RequestContext,
    action: BulkAction,
    missing: &str,
    lookup: AppResult<Option<T>>,
) -> Option<T> {
    match lookup {
        Ok(found) => found,
        Err(e) => {
            log_item_failure(ctx, action, missing, &e);
            None
        }
    }
}

fn cancelled(ctx: &RequestContext, action: BulkAction, result: BulkResult) -> BulkResult {
    let result = result.finish("", true);
    warn!(
        user_id = %ctx.user_id,
        action = %action,
        processed = result.processed,
        "Bulk operation cancelled"
    );
    result
}

/// Missing items are reported by id, everything else by name.
fn failure_token(err: &AppError, missing: String, name: String) -> String {
    if err.is(ErrorKind::NotFound) {
        missing
    } else {
        name
    }
}

fn log_item_failure(ctx: &RequestContext, action: BulkAction, name: &str, err: &AppError) {
    warn!(
        user_id = %ctx.user_id,
        action = %action,
        item = %name,
        error = %err,
        "Bulk item failed"
    );
}
