//! # adrive-storage
//!
//! The physical mirror of A-Drive. Folders map to real directories under
//! `<root>/root/<user-id>/`, files are stored flat next to them, and version
//! snapshots sit beside the live file.

pub mod archive;
pub mod checksum;
pub mod layout;
pub mod local;
pub mod mime;

pub use archive::{ArchiveBuilder, ArchiveEntry, BuiltArchive};
pub use layout::StorageLayout;
pub use local::LocalStorageProvider;
