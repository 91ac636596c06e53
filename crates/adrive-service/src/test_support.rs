//! Shared fixtures for service tests: an in-memory database, a temporary
//! storage root and every service wired together.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;

use adrive_core::config::{DatabaseConfig, StorageConfig};
use adrive_core::traits::StorageProvider;
use adrive_core::traits::storage::ByteStream;
use adrive_core::types::{FolderId, UserId};
use adrive_database::DatabasePool;
use adrive_database::migration::run_migrations;
use adrive_database::repositories::{
    FavoriteRepository, FileRepository, FolderRepository, RecentAccessRepository,
};
use adrive_entity::file::File;
use adrive_entity::folder::Folder;
use adrive_entity::user::UserRole;
use adrive_storage::{ArchiveBuilder, LocalStorageProvider};

use crate::bulk::BulkService;
use crate::context::RequestContext;
use crate::favorite::FavoriteService;
use crate::file::{
    DownloadService, FileService, SearchService, UploadRequest, UploadService, VersionService,
};
use crate::folder::{CreateFolderRequest, FolderService, PathResolver, TreeService};
use crate::lock::ItemLocks;
use crate::recent::RecentService;

pub(crate) struct TestEnv {
    _dir: TempDir,
    pub db: DatabasePool,
    pub storage: LocalStorageProvider,
    pub locks: Arc<ItemLocks>,
    pub resolver: PathResolver,
    pub folders: FolderService,
    pub tree: TreeService,
    pub files: FileService,
    pub uploads: UploadService,
    pub downloads: DownloadService,
    pub versions: VersionService,
    pub search: SearchService,
    pub favorites: FavoriteService,
    pub recent: RecentService,
    pub bulk: BulkService,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_storage_config(|_| {}).await
    }

    pub async fn with_storage_config(adjust: impl FnOnce(&mut StorageConfig)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = StorageConfig::with_root(dir.path().join("files").display().to_string());
        adjust(&mut config);

        let db = DatabasePool::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 5,
        })
        .await
        .expect("connect");
        run_migrations(db.pool()).await.expect("migrate");

        let folder_repo = Arc::new(FolderRepository::new(db.pool().clone()));
        let file_repo = Arc::new(FileRepository::new(db.pool().clone()));
        let favorite_repo = Arc::new(FavoriteRepository::new(db.pool().clone()));
        let recent_repo = Arc::new(RecentAccessRepository::new(db.pool().clone()));

        let local = LocalStorageProvider::new(&config.root_directory)
            .await
            .expect("storage");
        let storage: Arc<dyn StorageProvider> = Arc::new(local.clone());
        let archiver = ArchiveBuilder::new(local.clone(), Some(dir.path().join("tmp")));
        let locks = Arc::new(ItemLocks::new());
        let resolver = PathResolver::new(Arc::clone(&folder_repo));

        let folders = FolderService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            Arc::clone(&favorite_repo),
            Arc::clone(&recent_repo),
            resolver.clone(),
            Arc::clone(&storage),
            archiver.clone(),
            Arc::clone(&locks),
        );
        let files = FileService::new(
            Arc::clone(&file_repo),
            Arc::clone(&favorite_repo),
            Arc::clone(&recent_repo),
            resolver.clone(),
            Arc::clone(&storage),
            Arc::clone(&locks),
        );
        let bulk = BulkService::new(
            folders.clone(),
            files.clone(),
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            resolver.clone(),
            archiver,
            Arc::clone(&locks),
        );

        Self {
            tree: TreeService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&file_repo),
                resolver.clone(),
            ),
            uploads: UploadService::new(
                Arc::clone(&file_repo),
                resolver.clone(),
                Arc::clone(&storage),
                config.clone(),
                Arc::clone(&locks),
            ),
            downloads: DownloadService::new(
                Arc::clone(&file_repo),
                Arc::clone(&recent_repo),
                Arc::clone(&storage),
            ),
            versions: VersionService::new(
                Arc::clone(&file_repo),
                Arc::clone(&storage),
                Arc::clone(&locks),
                config.max_upload_size_bytes,
            ),
            search: SearchService::new(Arc::clone(&file_repo), Arc::clone(&folder_repo)),
            favorites: FavoriteService::new(
                Arc::clone(&favorite_repo),
                Arc::clone(&folder_repo),
                Arc::clone(&file_repo),
            ),
            recent: RecentService::new(recent_repo, folder_repo, file_repo),
            _dir: dir,
            db,
            storage: local,
            locks,
            resolver,
            folders,
            files,
            bulk,
        }
    }

    pub fn ctx(&self, user_id: i64) -> RequestContext {
        RequestContext::new(UserId(user_id), UserRole::User, format!("user{user_id}"))
    }

    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Folder {
        self.folders
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id,
                    ..Default::default()
                },
            )
            .await
            .expect("create folder")
    }

    pub async fn upload(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
        name: &str,
        data: &[u8],
    ) -> File {
        self.uploads
            .upload(
                ctx,
                UploadRequest {
                    folder_id,
                    file_name: name.to_string(),
                    mime_type: None,
                    data: Bytes::copy_from_slice(data),
                },
            )
            .await
            .expect("upload")
    }

    /// Whether anything exists at a path relative to the storage root.
    pub fn exists(&self, path: &str) -> bool {
        self.storage.root().join(path).exists()
    }

    pub async fn read(&self, path: &str) -> Vec<u8> {
        self.storage.read_bytes(path).await.expect("read").to_vec()
    }

    /// Run raw SQL against the test database, e.g. to install a failing trigger.
    pub async fn execute(&self, sql: &str) {
        sqlx::raw_sql(sql).execute(self.db.pool()).await.expect("execute");
    }
}

pub(crate) async fn collect(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.expect("chunk"));
    }
    out
}

/// Sorted entry names of a zip archive.
pub(crate) fn zip_names(data: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(data.to_vec())).expect("zip");
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}
