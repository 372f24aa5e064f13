//! persist — снапшот коллекции сниппетов + ротируемый бэкап.
//!
//! Раскладка:
//! - mod.rs    — формат конверта (JSON), трейт SnapshotBackend, load_with_recovery()
//! - file.rs   — FileSnapshot: <root>/snippets.json + <root>/snippets_backup.json
//! - memory.rs — MemoryBackend: то же в памяти (тесты, эфемерные хранилища)
//!
//! Формат снапшота (serde_json, pretty):
//! {
//!   "format": "snipvault.snapshot",
//!   "version": 1,
//!   "saved_unix_ms": 1760000000000,
//!   "count": 2,
//!   "snippets": [ {id,title,language,code,tags,created_at,last_modified,version}, ... ]
//! }
//!
//! Контракт save(): сначала текущий primary копируется в backup (перезапись),
//! потом пишется новый primary. Если запись не удалась — primary
//! восстанавливается из backup (best-effort), ошибка возвращается вызывающему,
//! который её логирует.

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::{SNAPSHOT_FORMAT, SNAPSHOT_VERSION};
use crate::metrics::record_load_recovered;
use crate::snippet::{validate_code, validate_title, Snippet};

pub mod file;
pub mod memory;

pub use file::FileSnapshot;
pub use memory::MemoryBackend;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format: &'a str,
    version: u32,
    saved_unix_ms: u64,
    count: usize,
    snippets: &'a [Snippet],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    format: String,
    version: u32,
    count: usize,
    snippets: Vec<Snippet>,
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Encode a full collection into the versioned snapshot envelope.
pub fn encode_snapshot(snippets: &[Snippet]) -> Result<Vec<u8>> {
    let env = EnvelopeOut {
        format: SNAPSHOT_FORMAT,
        version: SNAPSHOT_VERSION,
        saved_unix_ms: now_unix_ms(),
        count: snippets.len(),
        snippets,
    };
    serde_json::to_vec_pretty(&env).context("serialize snapshot")
}

/// Decode and sanity-check a snapshot envelope.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Snippet>> {
    let env: EnvelopeIn = serde_json::from_slice(bytes).context("parse snapshot json")?;
    if env.format != SNAPSHOT_FORMAT {
        return Err(anyhow!("unexpected snapshot format '{}'", env.format));
    }
    if env.version == 0 || env.version > SNAPSHOT_VERSION {
        return Err(anyhow!(
            "unsupported snapshot version {} (max {})",
            env.version,
            SNAPSHOT_VERSION
        ));
    }
    if env.count != env.snippets.len() {
        return Err(anyhow!(
            "snapshot count mismatch: header={}, actual={}",
            env.count,
            env.snippets.len()
        ));
    }
    check_snippets(&env.snippets)?;
    Ok(env.snippets)
}

/// Content invariants every loaded collection must hold: valid fields,
/// unique titles, unique code. A violation means a corrupt snapshot.
///
/// The language allow-list and the capacity come from the config and are not
/// checked here.
fn check_snippets(snippets: &[Snippet]) -> Result<()> {
    let mut titles = BTreeSet::new();
    let mut codes = BTreeSet::new();
    for s in snippets {
        let t = s.title();
        validate_title(t).with_context(|| format!("bad title '{}' in snapshot", t))?;
        if t != t.trim() {
            return Err(anyhow!("untrimmed title '{}' in snapshot", t));
        }
        if s.language().trim().is_empty() {
            return Err(anyhow!("empty language for '{}' in snapshot", t));
        }
        validate_code(s.code()).with_context(|| format!("bad code for '{}' in snapshot", t))?;
        if s.tags().iter().any(|tag| tag.trim().is_empty() || tag.trim() != tag.as_str()) {
            return Err(anyhow!("bad tag for '{}' in snapshot", t));
        }
        if !titles.insert(t) {
            return Err(anyhow!("duplicate title '{}' in snapshot", t));
        }
        if !codes.insert(s.code()) {
            return Err(anyhow!("duplicate code in snapshot (title '{}')", t));
        }
    }
    Ok(())
}

/// Durable storage for the snippet collection.
pub trait SnapshotBackend {
    /// Rotate the backup, write the full collection, roll back on failure.
    fn save(&mut self, snippets: &[Snippet]) -> Result<()>;

    /// Ok(None) — no snapshot yet (first run).
    fn load(&mut self) -> Result<Option<Vec<Snippet>>>;

    /// Copy backup over primary. Ok(false) if there is no backup.
    fn restore_from_backup(&mut self) -> Result<bool>;

    /// Short human-readable location, for logs.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No snapshot existed.
    Fresh,
    /// Primary snapshot loaded.
    Primary,
    /// Primary was unreadable; backup restored and reloaded.
    Backup,
    /// Primary unreadable and recovery did not yield data; session starts empty.
    Empty,
}

#[derive(Debug)]
pub struct Loaded {
    pub snippets: Vec<Snippet>,
    pub source: LoadSource,
}

impl Loaded {
    fn empty(source: LoadSource) -> Self {
        Self {
            snippets: Vec::new(),
            source,
        }
    }
}

/// Load the collection, recovering from the backup when the primary is bad.
///
/// Never fails: errors are logged and the caller starts with whatever could be
/// recovered. With `reload_backup` the restored backup is loaded right away,
/// otherwise the session starts empty and the restored file is used next open.
pub fn load_with_recovery(backend: &mut dyn SnapshotBackend, reload_backup: bool) -> Loaded {
    let where_ = backend.describe();
    let err = match backend.load() {
        Ok(None) => {
            info!("persist: no snapshot at {}, starting fresh", where_);
            return Loaded::empty(LoadSource::Fresh);
        }
        Ok(Some(snippets)) => {
            info!("persist: loaded {} snippet(s) from {}", snippets.len(), where_);
            return Loaded {
                snippets,
                source: LoadSource::Primary,
            };
        }
        Err(e) => e,
    };

    warn!("persist: load failed at {}: {:#}; trying backup", where_, err);
    match backend.restore_from_backup() {
        Ok(true) => {}
        Ok(false) => {
            warn!("persist: no backup available, starting empty");
            return Loaded::empty(LoadSource::Empty);
        }
        Err(e) => {
            error!("persist: restore from backup failed: {:#}", e);
            return Loaded::empty(LoadSource::Empty);
        }
    }

    if !reload_backup {
        info!("persist: backup restored; it will be loaded on next open");
        return Loaded::empty(LoadSource::Empty);
    }

    match backend.load() {
        Ok(Some(snippets)) => {
            record_load_recovered();
            info!(
                "persist: recovered {} snippet(s) from backup at {}",
                snippets.len(),
                where_
            );
            Loaded {
                snippets,
                source: LoadSource::Backup,
            }
        }
        Ok(None) => Loaded::empty(LoadSource::Empty),
        Err(e) => {
            error!("persist: backup is unreadable too: {:#}", e);
            Loaded::empty(LoadSource::Empty)
        }
    }
}
