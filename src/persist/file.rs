//! persist/file — снапшот в файлах <root>/<snapshot_file> и <root>/<backup_file>.
//!
//! save():
//! 1) если primary существует — fs::copy(primary -> backup) (перезапись);
//!    ошибка ротации прерывает save (primary не трогаем, он и есть last good);
//! 2) запись через tmp + sync_all + rename, так что primary никогда не
//!    остаётся наполовину записанным;
//! 3) при ошибке записи — tmp удаляется, primary восстанавливается из backup
//!    (best-effort, ошибка восстановления только логируется).
//!
//! Файловые хэндлы живут внутри одного вызова.

use anyhow::{Context, Result};
use log::{debug, error, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::VaultConfig;
use crate::consts::TMP_SUFFIX;
use crate::metrics::{record_backup_restore, record_backup_rotated, record_save_ok};
use crate::snippet::Snippet;

use super::{decode_snapshot, encode_snapshot, SnapshotBackend};

#[derive(Debug, Clone)]
pub struct FileSnapshot {
    primary: PathBuf,
    backup: PathBuf,
}

impl FileSnapshot {
    pub fn new(primary: PathBuf, backup: PathBuf) -> Self {
        Self { primary, backup }
    }

    /// Paths resolved against the vault root from the config file names.
    pub fn in_root(root: &Path, cfg: &VaultConfig) -> Self {
        Self::new(root.join(&cfg.snapshot_file), root.join(&cfg.backup_file))
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .primary
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(TMP_SUFFIX);
        self.primary.with_file_name(name)
    }

    fn rotate_backup(&self) -> Result<()> {
        if !self.primary.exists() {
            return Ok(());
        }
        fs::copy(&self.primary, &self.backup).with_context(|| {
            format!(
                "backup {} -> {}",
                self.primary.display(),
                self.backup.display()
            )
        })?;
        record_backup_rotated();
        debug!("persist: backup rotated to {}", self.backup.display());
        Ok(())
    }

    fn write_primary(&self, data: &[u8]) -> Result<()> {
        let tmp = self.tmp_path();
        let mut f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp)
            .with_context(|| format!("open {}", tmp.display()))?;
        f.write_all(data)
            .with_context(|| format!("write {}", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("sync {}", tmp.display()))?;
        drop(f);

        fs::rename(&tmp, &self.primary).with_context(|| {
            format!("rename {} -> {}", tmp.display(), self.primary.display())
        })?;
        Ok(())
    }
}

impl SnapshotBackend for FileSnapshot {
    fn save(&mut self, snippets: &[Snippet]) -> Result<()> {
        let data = encode_snapshot(snippets)?;
        self.rotate_backup()?;

        if let Err(e) = self.write_primary(&data) {
            let _ = fs::remove_file(self.tmp_path());
            warn!(
                "persist: write {} failed: {:#}; restoring from backup",
                self.primary.display(),
                e
            );
            if let Err(re) = self.restore_from_backup() {
                error!("persist: restore after failed save: {:#}", re);
            }
            return Err(e);
        }
        record_save_ok(data.len());
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Vec<Snippet>>> {
        if !self.primary.exists() {
            return Ok(None);
        }
        let bytes =
            fs::read(&self.primary).with_context(|| format!("read {}", self.primary.display()))?;
        let snippets = decode_snapshot(&bytes)
            .with_context(|| format!("decode {}", self.primary.display()))?;
        Ok(Some(snippets))
    }

    fn restore_from_backup(&mut self) -> Result<bool> {
        if !self.backup.exists() {
            return Ok(false);
        }
        fs::copy(&self.backup, &self.primary).with_context(|| {
            format!(
                "restore {} -> {}",
                self.backup.display(),
                self.primary.display()
            )
        })?;
        record_backup_restore();
        Ok(true)
    }

    fn describe(&self) -> String {
        self.primary.display().to_string()
    }
}
