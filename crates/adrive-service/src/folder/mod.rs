//! Folder hierarchy services.

pub mod path;
pub mod service;
pub mod tree;

pub use path::{PathResolver, ResolvedFolder};
pub use service::{ArchiveDownload, CreateFolderRequest, FolderService};
pub use tree::TreeService;
