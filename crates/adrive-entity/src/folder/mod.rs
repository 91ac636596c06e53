//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, DEFAULT_ICON_COLOR, DEFAULT_ICON_TYPE, Folder, FolderContents};
pub use tree::{Breadcrumb, FolderNode, FolderTree};
