//! # adrive-service
//!
//! Business logic service layer for A-Drive. Services keep the relational
//! hierarchy and the physical mirror in step: every mutation orders its
//! physical and logical steps explicitly and compensates when a later step
//! fails.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod bulk;
pub mod context;
pub mod favorite;
pub mod file;
pub mod folder;
mod item;
pub mod lock;
pub mod recent;
mod trash;

pub use bulk::{BulkAction, BulkDownload, BulkOutcome, BulkRequest, BulkResult, BulkService};
pub use context::RequestContext;
pub use favorite::FavoriteService;
pub use file::{
    DownloadResult, DownloadService, FileService, SearchQuery, SearchService, UploadRequest,
    UploadService, VersionService,
};
pub use folder::{ArchiveDownload, CreateFolderRequest, FolderService, PathResolver, TreeService};
pub use lock::ItemLocks;
pub use recent::RecentService;

#[cfg(test)]
pub(crate) mod test_support;
