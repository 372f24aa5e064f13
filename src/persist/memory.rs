//! persist/memory — in-memory snapshot backend.
//!
//! Тот же контракт, что и у FileSnapshot (ротация backup перед записью),
//! но байты лежат в памяти. Клоны разделяют состояние, так что тест может
//! держать копию и смотреть, что записал Vault.

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::metrics::{record_backup_restore, record_backup_rotated, record_save_ok};
use crate::snippet::Snippet;

use super::{decode_snapshot, encode_snapshot, SnapshotBackend};

#[derive(Debug, Default)]
struct MemState {
    primary: Option<Vec<u8>>,
    backup: Option<Vec<u8>>,
    saves: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw primary/backup bytes (may be garbage, for recovery tests).
    pub fn with_snapshots(primary: Option<Vec<u8>>, backup: Option<Vec<u8>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemState {
                primary,
                backup,
                saves: 0,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemState>> {
        self.state
            .lock()
            .map_err(|e| anyhow!("memory backend lock poisoned: {e}"))
    }

    pub fn primary_bytes(&self) -> Option<Vec<u8>> {
        self.lock().ok().and_then(|s| s.primary.clone())
    }

    pub fn backup_bytes(&self) -> Option<Vec<u8>> {
        self.lock().ok().and_then(|s| s.backup.clone())
    }

    /// Decoded backup contents, if any.
    pub fn backup_snippets(&self) -> Result<Option<Vec<Snippet>>> {
        match self.backup_bytes() {
            Some(b) => Ok(Some(decode_snapshot(&b)?)),
            None => Ok(None),
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> u64 {
        self.lock().map(|s| s.saves).unwrap_or(0)
    }
}

impl SnapshotBackend for MemoryBackend {
    fn save(&mut self, snippets: &[Snippet]) -> Result<()> {
        let data = encode_snapshot(snippets)?;
        let mut st = self.lock()?;
        if let Some(prev) = st.primary.take() {
            st.backup = Some(prev);
            record_backup_rotated();
        }
        let n = data.len();
        st.primary = Some(data);
        st.saves += 1;
        record_save_ok(n);
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Vec<Snippet>>> {
        let st = self.lock()?;
        match st.primary.as_deref() {
            Some(bytes) => Ok(Some(decode_snapshot(bytes)?)),
            None => Ok(None),
        }
    }

    fn restore_from_backup(&mut self) -> Result<bool> {
        let mut st = self.lock()?;
        match st.backup.clone() {
            Some(b) => {
                st.primary = Some(b);
                record_backup_restore();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
