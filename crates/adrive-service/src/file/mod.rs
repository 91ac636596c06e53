//! File services: metadata, upload, download, search and versioning.

pub mod download;
pub mod search;
pub mod service;
pub mod upload;
pub mod version;

pub use download::{DownloadResult, DownloadService};
pub use search::{FileTypeSummary, SearchQuery, SearchResults, SearchService};
pub use service::FileService;
pub use upload::{UploadRequest, UploadService};
pub use version::VersionService;
