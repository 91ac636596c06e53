//! Streaming SHA-256 content digests.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;

const CHUNK_SIZE: usize = 64 * 1024;

/// Hash a file on disk without loading it into memory.
pub async fn sha256_file(path: &Path) -> AppResult<String> {
    let mut file = File::open(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Checksum,
            format!("Unable to open file for checksum: {}", display_name(path)),
            e,
        )
    })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buf).await.map_err(|e| {
            AppError::with_source(ErrorKind::Checksum, "Unable to read file for checksum", e)
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash an in-memory buffer.
pub fn sha256_bytes(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
