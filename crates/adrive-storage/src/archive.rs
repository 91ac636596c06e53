//! Zip export of stored files into a scoped temporary file.

use std::collections::HashSet;
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use futures::StreamExt;
use tempfile::{NamedTempFile, TempPath};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use adrive_core::error::{AppError, ErrorKind};
use adrive_core::result::AppResult;
use adrive_core::traits::storage::ByteStream;

use crate::local::LocalStorageProvider;

/// One file to put into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Location of the bytes within the storage root.
    pub storage_path: String,
    /// Path of the entry inside the archive (`/`-separated).
    pub entry_name: String,
}

impl ArchiveEntry {
    /// Create an entry.
    pub fn new(storage_path: impl Into<String>, entry_name: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
            entry_name: entry_name.into(),
        }
    }
}

/// A finished archive on disk.
///
/// The temporary file lives as long as this value, or as long as the stream
/// returned by [`BuiltArchive::into_stream`].
#[derive(Debug)]
pub struct BuiltArchive {
    file: std::fs::File,
    path: TempPath,
    size_bytes: u64,
    skipped: Vec<usize>,
}

impl BuiltArchive {
    /// Size of the zip in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Indices of the input entries that could not be read and were left out.
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// Whether the entry at `index` made it into the archive.
    pub fn contains(&self, index: usize) -> bool {
        !self.skipped.contains(&index)
    }

    /// Stream the archive. The temporary file is removed when the stream is dropped.
    pub fn into_stream(self) -> ByteStream {
        let path = self.path;
        let reader = ReaderStream::new(tokio::fs::File::from_std(self.file));
        Box::pin(reader.map(move |chunk| {
            let _keep = &path;
            chunk
        }))
    }
}

/// Builds zip archives from files in a [`LocalStorageProvider`].
///
/// The archive is written to a temporary file which is removed on every
/// exit path, including errors and cancellation.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    storage: LocalStorageProvider,
    temp_dir: Option<PathBuf>,
}

impl ArchiveBuilder {
    /// Create a builder. `temp_dir` falls back to the system temp directory.
    pub fn new(storage: LocalStorageProvider, temp_dir: Option<PathBuf>) -> Self {
        Self { storage, temp_dir }
    }

    /// Write all entries into a deflated zip.
    ///
    /// An entry whose source cannot be opened or copied is left out and
    /// reported through [`BuiltArchive::skipped`]. The token is checked before
    /// each file; a cancelled build fails with [`ErrorKind::Cancelled`].
    pub async fn build(
        &self,
        entries: Vec<ArchiveEntry>,
        cancel: CancellationToken,
    ) -> AppResult<BuiltArchive> {
        let sources = entries
            .into_iter()
            .map(|entry| {
                let path = self.storage.resolve(&entry.storage_path)?;
                Ok((path, entry.entry_name))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let temp_dir = self.temp_dir.clone();

        tokio::task::spawn_blocking(move || write_archive(temp_dir, sources, &cancel))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Archive task failed", e))?
    }
}

fn write_archive(
    temp_dir: Option<PathBuf>,
    sources: Vec<(PathBuf, String)>,
    cancel: &CancellationToken,
) -> AppResult<BuiltArchive> {
    let mut temp = match temp_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            NamedTempFile::new_in(dir)
        }
        None => NamedTempFile::new(),
    }
    .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to create temp archive", e))?;

    let mut writer = ZipWriter::new(temp.as_file_mut());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut used = HashSet::new();
    let mut skipped = Vec::new();

    for (index, (path, entry_name)) in sources.into_iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(AppError::cancelled("Archive cancelled"));
        }

        let mut source = match std::fs::File::open(&path) {
            Ok(source) => source,
            Err(e) => {
                warn!(entry = %entry_name, error = %e, "Skipping unreadable archive entry");
                skipped.push(index);
                continue;
            }
        };
        let name = unique_entry_name(&mut used, &entry_name);
        writer.start_file(name.as_str(), options).map_err(zip_error)?;
        if let Err(e) = std::io::copy(&mut source, &mut writer) {
            warn!(entry = %name, error = %e, "Dropping partially written archive entry");
            writer.abort_file().map_err(zip_error)?;
            used.remove(&name);
            skipped.push(index);
            continue;
        }
        debug!(entry = %name, "Added archive entry");
    }

    let file = writer.finish().map_err(zip_error)?;
    file.flush()?;
    let size_bytes = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(0))?;

    let (file, path) = temp.into_parts();
    Ok(BuiltArchive {
        file,
        path,
        size_bytes,
        skipped,
    })
}

/// Make an entry name unique by inserting ` (n)` before the extension.
fn unique_entry_name(used: &mut HashSet<String>, name: &str) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let (dir, file) = match name.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file),
        None => (String::new(), name),
    };
    let (stem, ext) = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (file, String::new()),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{dir}{stem} ({n}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn zip_error(e: zip::result::ZipError) -> AppError {
    AppError::with_source(ErrorKind::Storage, "Failed to write zip archive", e)
}
