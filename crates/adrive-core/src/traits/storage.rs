//! Storage provider trait for the physical mirror.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// What the mirror knows about one path.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Path relative to the provider root.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this is a directory.
    pub is_directory: bool,
}

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Byte-level access to the physical mirror.
///
/// Paths are relative to the provider root, `/`-separated, and never
/// resolve outside it.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the root is present and usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a file for streaming.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read a whole file into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Replace a file's content, creating it if needed.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Write bytes to a new file. Fails with `Conflict` when the path is taken.
    async fn create_new(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file at the given path. Missing files are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Delete a directory and all its contents recursively.
    async fn delete_dir(&self, path: &str) -> AppResult<()>;

    /// Copy a file, overwriting the destination.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Rename a file or directory, creating missing parents of `to`.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Whether anything exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Size and type of the object at `path`.
    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;

    /// Compute the lowercase hex SHA-256 digest of a file's content.
    async fn checksum(&self, path: &str) -> AppResult<String>;
}
