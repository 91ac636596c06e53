//! Folder hierarchy operations that keep rows and directories in step.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use adrive_core::error::AppError;
use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::traits::storage::ByteStream;
use adrive_core::types::{FileId, FolderId};
use adrive_database::repositories::{
    FavoriteRepository, FileRepository, FolderRepository, RecentAccessRepository,
};
use adrive_entity::favorite::ItemType;
use adrive_entity::folder::{
    CreateFolder, DEFAULT_ICON_COLOR, DEFAULT_ICON_TYPE, Folder, FolderContents,
};
use adrive_storage::layout::sanitize_name;
use adrive_storage::{ArchiveBuilder, ArchiveEntry, BuiltArchive};

use crate::context::RequestContext;
use crate::folder::path::PathResolver;
use crate::lock::ItemLocks;
use crate::trash::Tombstone;

/// Request to create a new folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder (`None` or `0` for the top level).
    pub parent_id: Option<FolderId>,
    /// Icon type, defaults to `folder`.
    pub icon_type: Option<String>,
    /// Icon color, defaults to `text-blue-500`.
    pub icon_color: Option<String>,
}

/// A zip archive ready to be streamed to the client.
///
/// The backing temporary file is removed once `stream` is dropped.
pub struct ArchiveDownload {
    /// Suggested download filename.
    pub filename: String,
    /// Archive size in bytes.
    pub size_bytes: u64,
    /// Archive content.
    pub stream: ByteStream,
}

impl ArchiveDownload {
    pub(crate) fn new(filename: String, archive: BuiltArchive) -> Self {
        Self {
            filename,
            size_bytes: archive.size_bytes(),
            stream: archive.into_stream(),
        }
    }
}

impl std::fmt::Debug for ArchiveDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveDownload")
            .field("filename", &self.filename)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

/// Manages the folder hierarchy.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Favorite repository.
    favorite_repo: Arc<FavoriteRepository>,
    /// Recent access repository.
    recent_repo: Arc<RecentAccessRepository>,
    /// Path resolver.
    resolver: PathResolver,
    /// Physical storage.
    storage: Arc<dyn StorageProvider>,
    /// Zip writer for folder exports.
    archiver: ArchiveBuilder,
    /// Keyed locks.
    locks: Arc<ItemLocks>,
}

impl FolderService {
    /// Creates a new folder service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        favorite_repo: Arc<FavoriteRepository>,
        recent_repo: Arc<RecentAccessRepository>,
        resolver: PathResolver,
        storage: Arc<dyn StorageProvider>,
        archiver: ArchiveBuilder,
        locks: Arc<ItemLocks>,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            favorite_repo,
            recent_repo,
            resolver,
            storage,
            archiver,
            locks,
        }
    }

    /// Gets a folder owned by the caller.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        let mut folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        folder.is_favorite = self
            .favorite_repo
            .find_by_item(ctx.user_id, ItemType::Folder, folder.id.get())
            .await?
            .is_some();
        Ok(folder)
    }

    /// Lists the direct children of a folder, or of the root when `parent` is `None` or `0`.
    pub async fn list_contents(
        &self,
        ctx: &RequestContext,
        parent: Option<FolderId>,
    ) -> AppResult<FolderContents> {
        let location = self.resolver.resolve(ctx.user_id, parent).await?;
        let parent_id = location.id();

        let mut folders = self.folder_repo.find_children(ctx.user_id, parent_id).await?;
        let mut files = self.file_repo.find_by_folder(ctx.user_id, parent_id).await?;

        let favorite_folders: HashSet<i64> = self
            .favorite_repo
            .find_item_ids(ctx.user_id, ItemType::Folder)
            .await?
            .into_iter()
            .collect();
        let favorite_files: HashSet<i64> = self
            .favorite_repo
            .find_item_ids(ctx.user_id, ItemType::File)
            .await?
            .into_iter()
            .collect();
        for folder in &mut folders {
            folder.is_favorite = favorite_folders.contains(&folder.id.get());
        }
        for file in &mut files {
            file.is_favorite = favorite_files.contains(&file.id.get());
        }

        if let Some(id) = parent_id {
            self.recent_repo
                .touch(ctx.user_id, ItemType::Folder, id.get())
                .await?;
        }

        Ok(FolderContents { folders, files })
    }

    /// Creates a folder row and its physical directory.
    ///
    /// If the directory cannot be created the row is deleted again.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = sanitize_name(&req.name)?;
        let _tree = self.locks.tree_write(ctx.user_id).await;

        let parent = self.resolver.resolve(ctx.user_id, req.parent_id).await?;
        let path = parent.child_path(&name);
        let physical = self.resolver.physical_dir(ctx.user_id, &path);

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                user_id: ctx.user_id,
                parent_id: parent.id(),
                name,
                path,
                icon_type: non_empty_or(req.icon_type, DEFAULT_ICON_TYPE),
                icon_color: non_empty_or(req.icon_color, DEFAULT_ICON_COLOR),
            })
            .await?;

        if let Err(mkdir_err) = self.storage.create_dir(&physical).await {
            warn!(
                user_id = %ctx.user_id,
                folder_id = %folder.id,
                error = %mkdir_err,
                "Directory creation failed, removing folder row"
            );
            if let Err(undo_err) = self.folder_repo.delete(folder.id).await {
                error!(
                    user_id = %ctx.user_id,
                    folder_id = %folder.id,
                    error = %undo_err,
                    "Compensating folder delete failed"
                );
                return Err(AppError::storage(format!(
                    "Failed to create directory for '{}' and failed to remove its record: {undo_err}",
                    folder.path
                )));
            }
            return Err(mkdir_err);
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder. The directory is renamed first, then the stored
    /// paths of the folder and all its descendants are rewritten.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        let name = sanitize_name(new_name)?;
        let _tree = self.locks.tree_write(ctx.user_id).await;

        let folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        if folder.name == name {
            return Ok(folder);
        }

        let parent = self.resolver.resolve(ctx.user_id, folder.parent_id).await?;
        let new_path = parent.child_path(&name);
        let updated = self
            .relocate(ctx, &folder, parent.id(), &name, &new_path)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            old_path = %folder.path,
            new_path = %updated.path,
            "Folder renamed"
        );
        Ok(updated)
    }

    /// Moves a folder under a new parent (`None` or `0` for the top level).
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        target: Option<FolderId>,
    ) -> AppResult<Folder> {
        let _tree = self.locks.tree_write(ctx.user_id).await;

        let folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        let destination = self.resolver.resolve(ctx.user_id, target).await?;

        if let Some(dest) = &destination.folder {
            if dest.id == folder.id || folder.is_ancestor_of(dest) {
                return Err(AppError::validation(
                    "Cannot move a folder into itself or one of its subfolders",
                ));
            }
        }
        if destination.id() == folder.parent_id {
            return Ok(folder);
        }

        let new_path = destination.child_path(&folder.name);
        let updated = self
            .relocate(ctx, &folder, destination.id(), &folder.name, &new_path)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            old_path = %folder.path,
            new_path = %updated.path,
            "Folder moved"
        );
        Ok(updated)
    }

    /// Deletes a folder, its subtree, and the bytes of every file below it.
    ///
    /// The directory and the file bytes are moved aside before the rows are
    /// deleted, and put back if the delete does not commit.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let _tree = self.locks.tree_write(ctx.user_id).await;

        let folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        let files = self.file_repo.find_in_subtree(folder.id).await?;
        let file_ids: Vec<FileId> = files.iter().map(|f| f.id).collect();
        let _file_guards = self.locks.files(ctx.user_id, &file_ids).await;

        let physical = self.resolver.physical_dir(ctx.user_id, &folder.path);
        let mut trash = Tombstone::open(
            self.storage.as_ref(),
            ctx.user_id,
            &format!("folder_{}", folder.id),
        )
        .await?;
        let committed = async {
            trash.stash(&physical).await?;
            for file in &files {
                trash.stash_file(&self.file_repo, file).await?;
            }
            self.folder_repo.delete(folder.id).await
        }
        .await;

        if let Err(e) = committed {
            warn!(
                user_id = %ctx.user_id,
                folder_id = %folder.id,
                error = %e,
                "Folder delete failed, restoring directory and file bytes"
            );
            trash.restore().await;
            return Err(e);
        }
        trash.purge().await;

        self.favorite_repo.purge_orphans(ctx.user_id).await?;
        self.recent_repo.purge_orphans(ctx.user_id).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            path = %folder.path,
            files = files.len(),
            "Folder deleted"
        );
        Ok(())
    }

    /// Zips a folder's subtree.
    pub async fn archive_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<ArchiveDownload> {
        let _tree = self.locks.tree_read(ctx.user_id).await;

        let folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        let entries = self.archive_entries(&folder).await?;
        let archive = self.archiver.build(entries, ctx.cancel.clone()).await?;
        if !archive.skipped().is_empty() {
            warn!(
                user_id = %ctx.user_id,
                folder_id = %folder.id,
                skipped = archive.skipped().len(),
                "Folder archive left out unreadable files"
            );
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            bytes = archive.size_bytes(),
            "Folder archived"
        );
        Ok(ArchiveDownload::new(
            format!("{}_{}.zip", folder.name.replace(' ', "_"), ctx.user_id),
            archive,
        ))
    }

    /// Archive entries for every file below `folder`, named by their path
    /// relative to the folder's parent (`Docs/2024/report.pdf`).
    ///
    /// The caller must hold the tree lock.
    pub(crate) async fn archive_entries(&self, folder: &Folder) -> AppResult<Vec<ArchiveEntry>> {
        let prefix_len = folder.path.len() - folder.name.len();
        let paths: HashMap<FolderId, String> = self
            .folder_repo
            .find_all(folder.user_id)
            .await?
            .into_iter()
            .filter(|f| f.id == folder.id || folder.is_ancestor_of(f))
            .map(|f| (f.id, f.path))
            .collect();

        let mut entries = Vec::new();
        for file in self.file_repo.find_in_subtree(folder.id).await? {
            let Some(dir) = file.folder_id.and_then(|id| paths.get(&id)) else {
                continue;
            };
            entries.push(ArchiveEntry::new(
                file.storage_path,
                format!("{}/{}", &dir[prefix_len..], file.name),
            ));
        }
        entries.sort_by(|a, b| a.entry_name.cmp(&b.entry_name));
        Ok(entries)
    }

    /// Rename the physical directory, then commit the new paths. If the
    /// commit fails the directory is renamed back.
    async fn relocate(
        &self,
        ctx: &RequestContext,
        folder: &Folder,
        new_parent: Option<FolderId>,
        new_name: &str,
        new_path: &str,
    ) -> AppResult<Folder> {
        if self
            .folder_repo
            .find_by_path(ctx.user_id, new_path)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Folder '{new_path}' already exists"
            )));
        }

        let old_dir = self.resolver.physical_dir(ctx.user_id, &folder.path);
        let new_dir = self.resolver.physical_dir(ctx.user_id, new_path);
        if self.storage.exists(&new_dir).await? {
            return Err(AppError::conflict(format!(
                "A directory already exists at '{new_path}'"
            )));
        }

        self.storage.rename(&old_dir, &new_dir).await?;

        match self
            .folder_repo
            .relocate(folder, new_parent, new_name, new_path)
            .await
        {
            Ok(updated) => Ok(updated),
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    folder_id = %folder.id,
                    error = %e,
                    "Folder update failed, restoring directory"
                );
                if let Err(undo_err) = self.storage.rename(&new_dir, &old_dir).await {
                    error!(
                        user_id = %ctx.user_id,
                        folder_id = %folder.id,
                        error = %undo_err,
                        "Failed to restore directory"
                    );
                }
                Err(e)
            }
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestEnv, collect, zip_names};
    use adrive_core::error::ErrorKind;
    use adrive_core::types::UserId;

    #[tokio::test]
    async fn test_nested_folder_path_and_directory() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;

        assert_eq!(year.path, "Docs/2024");
        assert_eq!(year.parent_id, Some(docs.id));
        assert_eq!(year.icon_type, DEFAULT_ICON_TYPE);
        assert!(env.exists("root/1/Docs/2024"));
    }

    #[tokio::test]
    async fn test_create_rejects_unsafe_names_and_duplicates() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        for bad in ["", "  ", "..", "a/b", "a\\b"] {
            let err = env
                .folders
                .create_folder(
                    &ctx,
                    CreateFolderRequest {
                        name: bad.into(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::Validation), "{bad:?}");
        }

        env.create_folder(&ctx, "Docs", None).await;
        let err = env
            .folders
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    name: "Docs".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_create_under_foreign_parent_is_not_found() {
        let env = TestEnv::new().await;
        let docs = env.create_folder(&env.ctx(1), "Docs", None).await;
        let err = env
            .folders
            .create_folder(
                &env.ctx(2),
                CreateFolderRequest {
                    name: "Sneaky".into(),
                    parent_id: Some(docs.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_rename_rewrites_descendants() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;
        let month = env.create_folder(&ctx, "Jan", Some(year.id)).await;

        let renamed = env
            .folders
            .rename_folder(&ctx, docs.id, "Papers")
            .await
            .unwrap();
        assert_eq!(renamed.path, "Papers");

        let month = env.folders.get_folder(&ctx, month.id).await.unwrap();
        assert_eq!(month.path, "Papers/2024/Jan");
        assert!(env.exists("root/1/Papers/2024/Jan"));
        assert!(!env.exists("root/1/Docs"));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_sibling_conflicts() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let a = env.create_folder(&ctx, "A", None).await;
        env.create_folder(&ctx, "B", None).await;

        let err = env.folders.rename_folder(&ctx, a.id, "B").await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert!(env.exists("root/1/A"));
    }

    #[tokio::test]
    async fn test_move_folder_and_back_to_root() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let archive = env.create_folder(&ctx, "Archive", None).await;
        env.create_folder(&ctx, "2024", Some(docs.id)).await;

        let moved = env
            .folders
            .move_folder(&ctx, docs.id, Some(archive.id))
            .await
            .unwrap();
        assert_eq!(moved.path, "Archive/Docs");
        assert!(env.exists("root/1/Archive/Docs/2024"));

        let back = env
            .folders
            .move_folder(&ctx, docs.id, Some(FolderId::ROOT))
            .await
            .unwrap();
        assert_eq!(back.path, "Docs");
        assert!(back.parent_id.is_none());
        assert!(env.exists("root/1/Docs/2024"));
        assert!(!env.exists("root/1/Archive/Docs"));
    }

    #[tokio::test]
    async fn test_move_into_descendant_is_rejected() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;

        for target in [docs.id, year.id] {
            let err = env
                .folders
                .move_folder(&ctx, docs.id, Some(target))
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::Validation));
        }
    }

    #[tokio::test]
    async fn test_delete_folder_removes_directory_rows_and_file_bytes() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;
        let file = env.upload(&ctx, Some(year.id), "a.txt", b"hello").await;
        env.favorites
            .add(&ctx, ItemType::Folder, year.id.get())
            .await
            .unwrap();

        env.folders.delete_folder(&ctx, docs.id).await.unwrap();

        assert!(!env.exists("root/1/Docs"));
        assert!(!env.exists(&file.storage_path));
        assert!(!env.exists(&format!("trash/1/folder_{}", docs.id)));
        let err = env.folders.get_folder(&ctx, year.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert!(env.favorites.list(&ctx).await.unwrap().is_empty());
        assert!(env.locks.tracked_files() == 0);
    }

    #[tokio::test]
    async fn test_list_contents_marks_favorites_and_tracks_recent() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let sub = env.create_folder(&ctx, "Sub", Some(docs.id)).await;
        let file = env.upload(&ctx, Some(docs.id), "b.txt", b"b").await;
        env.favorites
            .add(&ctx, ItemType::File, file.id.get())
            .await
            .unwrap();

        let root = env.folders.list_contents(&ctx, None).await.unwrap();
        assert_eq!(root.folders.len(), 1);
        assert!(root.files.is_empty());

        let contents = env.folders.list_contents(&ctx, Some(docs.id)).await.unwrap();
        assert_eq!(contents.folders[0].id, sub.id);
        assert!(!contents.folders[0].is_favorite);
        assert!(contents.files[0].is_favorite);

        let recent = env.recent.recent_items(&ctx, None).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].item_id, docs.id.get());
    }

    #[tokio::test]
    async fn test_archive_folder_contains_relative_paths() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "My Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;
        env.upload(&ctx, Some(docs.id), "top.txt", b"top").await;
        env.upload(&ctx, Some(year.id), "inner.txt", b"inner").await;

        let archive = env.folders.archive_folder(&ctx, docs.id).await.unwrap();
        assert_eq!(archive.filename, "My_Docs_1.zip");
        let size = archive.size_bytes;

        let data = collect(archive.stream).await;
        assert_eq!(data.len() as u64, size);
        assert_eq!(
            zip_names(&data),
            vec!["My Docs/2024/inner.txt", "My Docs/top.txt"]
        );
    }

    #[tokio::test]
    async fn test_failed_mkdir_leaves_no_folder_row() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        env.storage
            .write("root/1/Docs", bytes::Bytes::from("not a directory"))
            .await
            .unwrap();

        let err = env
            .folders
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    name: "Docs".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Storage));

        let root = env.folders.list_contents(&ctx, None).await.unwrap();
        assert!(root.folders.is_empty());
    }

    #[tokio::test]
    async fn test_failed_directory_rename_keeps_stored_path() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let a = env.create_folder(&ctx, "A", None).await;
        let child = env.create_folder(&ctx, "Child", Some(a.id)).await;
        env.storage.delete_dir("root/1/A").await.unwrap();

        let err = env.folders.rename_folder(&ctx, a.id, "B").await.unwrap_err();
        assert!(err.is(ErrorKind::Storage));

        let a = env.folders.get_folder(&ctx, a.id).await.unwrap();
        assert_eq!(a.path, "A");
        let child = env.folders.get_folder(&ctx, child.id).await.unwrap();
        assert_eq!(child.path, "A/Child");
    }

    #[tokio::test]
    async fn test_failed_row_delete_restores_directory_and_bytes() {
        let env = TestEnv::new().await;
        let ctx = env.ctx(1);
        let docs = env.create_folder(&ctx, "Docs", None).await;
        let year = env.create_folder(&ctx, "2024", Some(docs.id)).await;
        let file = env.upload(&ctx, Some(year.id), "a.txt", b"hello").await;
        env.versions.enable_versioning(&ctx, file.id).await.unwrap();
        env.versions
            .create_new_version(&ctx, file.id, bytes::Bytes::from("hello v2"), None)
            .await
            .unwrap();
        env.execute(
            "CREATE TRIGGER keep_folders BEFORE DELETE ON folders \
             BEGIN SELECT RAISE(ABORT, 'folders are locked'); END",
        )
        .await;

        let err = env.folders.delete_folder(&ctx, docs.id).await.unwrap_err();
        assert!(err.is(ErrorKind::Database));

        assert!(env.exists("root/1/Docs/2024"));
        assert_eq!(env.read(&file.storage_path).await, b"hello v2");
        assert!(env.exists("root/1/1_a_v1.txt"));
        assert!(env.files.get_file(&ctx, file.id).await.is_ok());
        assert!(!env.exists(&format!("trash/1/folder_{}", docs.id)));
    }

    #[tokio::test]
    async fn test_other_user_cannot_touch_folder() {
        let env = TestEnv::new().await;
        let docs = env.create_folder(&env.ctx(1), "Docs", None).await;
        let intruder = env.ctx(2);
        assert_eq!(intruder.user_id, UserId(2));

        let err = env
            .folders
            .rename_folder(&intruder, docs.id, "Mine")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = env.folders.delete_folder(&intruder, docs.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert!(env.exists("root/1/Docs"));
    }
}
