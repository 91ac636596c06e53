//! Reversible removal of physical bytes.
//!
//! Deletes move their bytes into a per-user holding directory first, commit
//! the row change, and only then purge the holding directory. If the commit
//! fails everything is moved back.

use tracing::{error, warn};

use adrive_core::result::AppResult;
use adrive_core::traits::StorageProvider;
use adrive_core::types::UserId;
use adrive_database::repositories::FileRepository;
use adrive_entity::file::File;
use adrive_storage::StorageLayout;

/// Bytes set aside for a pending delete.
pub(crate) struct Tombstone<'a> {
    storage: &'a dyn StorageProvider,
    dir: String,
    moved: Vec<(String, String)>,
}

impl<'a> Tombstone<'a> {
    /// Prepare an empty holding directory for `tag`, clearing leftovers of an
    /// earlier interrupted delete.
    pub async fn open(
        storage: &'a dyn StorageProvider,
        user_id: UserId,
        tag: &str,
    ) -> AppResult<Self> {
        let dir = StorageLayout::trash_dir(user_id, tag);
        storage.delete_dir(&dir).await?;
        Ok(Self {
            storage,
            dir,
            moved: Vec::new(),
        })
    }

    /// Move a file or directory into the holding directory. Missing paths are skipped.
    pub async fn stash(&mut self, path: &str) -> AppResult<()> {
        if !self.storage.exists(path).await? {
            return Ok(());
        }
        let base = path.rsplit('/').next().unwrap_or(path);
        let target = format!("{}/{}_{base}", self.dir, self.moved.len());
        self.storage.rename(path, &target).await?;
        self.moved.push((path.to_string(), target));
        Ok(())
    }

    /// Move every archived version of a file and then its live bytes aside.
    pub async fn stash_file(&mut self, file_repo: &FileRepository, file: &File) -> AppResult<()> {
        for version in file_repo.find_versions(file.id).await? {
            if version.storage_path != file.storage_path {
                self.stash(&version.storage_path).await?;
            }
        }
        self.stash(&file.storage_path).await
    }

    /// Put everything back where it came from, newest first.
    pub async fn restore(self) {
        let mut intact = true;
        for (original, held) in self.moved.iter().rev() {
            if let Err(e) = self.storage.rename(held, original).await {
                intact = false;
                error!(path = %original, error = %e, "Failed to restore stashed bytes");
            }
        }
        if intact {
            self.discard().await;
        }
    }

    /// Drop the stashed bytes for good.
    pub async fn purge(self) {
        self.discard().await;
    }

    async fn discard(&self) {
        if let Err(e) = self.storage.delete_dir(&self.dir).await {
            warn!(dir = %self.dir, error = %e, "Failed to clear trash directory");
        }
    }
}
