//! Application state shared across all handlers and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use adrive_core::config::AppConfig;
use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_database::DatabasePool;
use adrive_database::repositories::{
    FavoriteRepository, FileRepository, FolderRepository, RecentAccessRepository,
};
use adrive_service::{
    BulkService, DownloadService, FavoriteService, FileService, FolderService, ItemLocks,
    PathResolver, RecentService, SearchService, TreeService, UploadService, VersionService,
};
use adrive_storage::{ArchiveBuilder, LocalStorageProvider};

use crate::auth::TokenVerifier;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// SQLite connection pool
    pub db: DatabasePool,
    /// Physical mirror
    pub storage: Arc<dyn StorageProvider>,
    /// Bearer token verifier
    pub token_verifier: Arc<TokenVerifier>,

    // ── Services ─────────────────────────────────────────────
    /// Folder hierarchy service
    pub folder_service: Arc<FolderService>,
    /// Folder tree and breadcrumbs
    pub tree_service: Arc<TreeService>,
    /// File metadata service
    pub file_service: Arc<FileService>,
    /// Upload service
    pub upload_service: Arc<UploadService>,
    /// Download service
    pub download_service: Arc<DownloadService>,
    /// Version engine
    pub version_service: Arc<VersionService>,
    /// Search service
    pub search_service: Arc<SearchService>,
    /// Favorites
    pub favorite_service: Arc<FavoriteService>,
    /// Recent access
    pub recent_service: Arc<RecentService>,
    /// Bulk and archive operator
    pub bulk_service: Arc<BulkService>,
}

impl AppState {
    /// Wires repositories, the physical mirror and every service.
    ///
    /// The database must already be migrated. The storage root is created
    /// if it does not exist.
    pub async fn build(config: AppConfig, db: DatabasePool) -> AppResult<Self> {
        let folder_repo = Arc::new(FolderRepository::new(db.pool().clone()));
        let file_repo = Arc::new(FileRepository::new(db.pool().clone()));
        let favorite_repo = Arc::new(FavoriteRepository::new(db.pool().clone()));
        let recent_repo = Arc::new(RecentAccessRepository::new(db.pool().clone()));

        let local = LocalStorageProvider::new(&config.storage.root_directory).await?;
        let storage: Arc<dyn StorageProvider> = Arc::new(local.clone());
        let archiver = ArchiveBuilder::new(
            local,
            config.storage.temp_directory.as_ref().map(PathBuf::from),
        );
        let locks = Arc::new(ItemLocks::new());
        let resolver = PathResolver::new(Arc::clone(&folder_repo));

        let folder_service = FolderService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            Arc::clone(&favorite_repo),
            Arc::clone(&recent_repo),
            resolver.clone(),
            Arc::clone(&storage),
            archiver.clone(),
            Arc::clone(&locks),
        );
        let file_service = FileService::new(
            Arc::clone(&file_repo),
            Arc::clone(&favorite_repo),
            Arc::clone(&recent_repo),
            resolver.clone(),
            Arc::clone(&storage),
            Arc::clone(&locks),
        );
        let bulk_service = BulkService::new(
            folder_service.clone(),
            file_service.clone(),
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            resolver.clone(),
            archiver,
            Arc::clone(&locks),
        );
        let tree_service = TreeService::new(
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
            resolver.clone(),
        );
        let upload_service = UploadService::new(
            Arc::clone(&file_repo),
            resolver,
            Arc::clone(&storage),
            config.storage.clone(),
            Arc::clone(&locks),
        );
        let download_service = DownloadService::new(
            Arc::clone(&file_repo),
            Arc::clone(&recent_repo),
            Arc::clone(&storage),
        );
        let version_service = VersionService::new(
            Arc::clone(&file_repo),
            Arc::clone(&storage),
            locks,
            config.storage.max_upload_size_bytes,
        );
        let search_service = SearchService::new(Arc::clone(&file_repo), Arc::clone(&folder_repo));
        let favorite_service = FavoriteService::new(
            favorite_repo,
            Arc::clone(&folder_repo),
            Arc::clone(&file_repo),
        );
        let recent_service = RecentService::new(recent_repo, folder_repo, file_repo);

        Ok(Self {
            token_verifier: Arc::new(TokenVerifier::new(&config.auth)),
            config: Arc::new(config),
            db,
            storage,
            folder_service: Arc::new(folder_service),
            tree_service: Arc::new(tree_service),
            file_service: Arc::new(file_service),
            upload_service: Arc::new(upload_service),
            download_service: Arc::new(download_service),
            version_service: Arc::new(version_service),
            search_service: Arc::new(search_service),
            favorite_service: Arc::new(favorite_service),
            recent_service: Arc::new(recent_service),
            bulk_service: Arc::new(bulk_service),
        })
    }
}
