//! Keyed locks serializing mutations of the same user's tree and files.
//!
//! Two families exist and are always acquired in the order *tree, then file*:
//!
//! - a per-user tree lock (read/write), taken exclusively by folder
//!   create/rename/move/delete and shared by operations that need folders to
//!   stay put (upload, file move, archive walks);
//! - a per-file mutex keyed by `(user, file)`, taken by every file mutation.
//!
//! When several file locks are needed they are taken in ascending id order.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use adrive_core::types::{FileId, UserId};

type FileKey = (UserId, FileId);

/// Registry of per-user tree locks and per-file locks.
#[derive(Debug, Default)]
pub struct ItemLocks {
    trees: DashMap<UserId, Arc<RwLock<()>>>,
    files: DashMap<FileKey, Arc<Mutex<()>>>,
}

impl ItemLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self, user_id: UserId) -> Arc<RwLock<()>> {
        self.trees
            .entry(user_id)
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Share the user's tree with other readers.
    pub async fn tree_read(&self, user_id: UserId) -> OwnedRwLockReadGuard<()> {
        self.tree(user_id).read_owned().await
    }

    /// Take the user's tree exclusively.
    pub async fn tree_write(&self, user_id: UserId) -> OwnedRwLockWriteGuard<()> {
        self.tree(user_id).write_owned().await
    }

    /// Lock one file.
    pub async fn file(&self, user_id: UserId, file_id: FileId) -> FileGuard<'_> {
        let key = (user_id, file_id);
        let lock = self
            .files
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        FileGuard {
            guard: Some(guard),
            files: &self.files,
            key,
        }
    }

    /// Lock several files in ascending id order.
    pub async fn files(&self, user_id: UserId, file_ids: &[FileId]) -> Vec<FileGuard<'_>> {
        let mut ids = file_ids.to_vec();
        ids.sort();
        ids.dedup();
        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.file(user_id, id).await);
        }
        guards
    }

    /// Number of file lock entries currently tracked.
    pub fn tracked_files(&self) -> usize {
        self.files.len()
    }
}

/// Holds a file lock; the registry entry is pruned once nobody else uses it.
#[derive(Debug)]
pub struct FileGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    files: &'a DashMap<FileKey, Arc<Mutex<()>>>,
    key: FileKey,
}

impl Drop for FileGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.files
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
