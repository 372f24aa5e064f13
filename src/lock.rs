//! File-based locking for single-writer safety.
//!
//! Cross-platform (fs2) advisory lock on <root>/LOCK:
//! - один процесс-писатель на каталог хранилища;
//! - второй open() на том же root получает ошибку сразу (try-lock, без ожидания).
//!
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::LOCK_FILE;

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored.
        let _ = self.file.unlock();
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("path", &self.path).finish()
    }
}

pub fn lock_file_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

/// Try to take the exclusive writer lock. Err if another writer holds it.
pub fn try_acquire_exclusive_lock(root: &Path) -> Result<LockGuard> {
    let path = lock_file_path(root);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    file.try_lock_exclusive()
        .with_context(|| format!("vault is locked by another writer: {}", path.display()))?;
    Ok(LockGuard { file, path })
}
