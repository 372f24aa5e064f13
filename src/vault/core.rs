//! vault/core — структура Vault, открытие и сохранение.
//!
//! Vault владеет коллекцией title -> Snippet, tag index, keyword trie,
//! историей команд и бэкендом снапшота. Конфиг и бэкенд инжектируются при
//! создании; глобального состояния нет (кроме счётчиков metrics).

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::VaultConfig;
use crate::history::{Collection, CommandHistory};
use crate::lock::{try_acquire_exclusive_lock, LockGuard};
use crate::metrics::record_save_failed;
use crate::persist::{load_with_recovery, FileSnapshot, LoadSource, MemoryBackend, SnapshotBackend};
use crate::snippet::Snippet;
use crate::tags::TagIndex;
use crate::trie::KeywordTrie;

pub struct Vault {
    pub(crate) cfg: VaultConfig,
    pub(crate) root: Option<PathBuf>,
    pub(crate) snippets: Collection,
    pub(crate) tags: TagIndex,
    pub(crate) keywords: KeywordTrie,
    pub(crate) history: CommandHistory,
    pub(crate) backend: Box<dyn SnapshotBackend>,
    pub(crate) load_source: LoadSource,
    pub(crate) last_save_ok: bool,
    // держим lock до drop/close
    pub(crate) _lock: Option<LockGuard>,
}

impl Vault {
    /// Open (or create) a file-backed vault in `root`, config from env.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_config(root, VaultConfig::from_env())
    }

    /// Open (or create) a file-backed vault in `root`.
    ///
    /// Takes the exclusive writer lock, loads the snapshot (recovering from the
    /// backup if the primary is unreadable) and rebuilds the indexes.
    pub fn open_with_config(root: &Path, cfg: VaultConfig) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(root)
                .with_context(|| format!("create vault root {}", root.display()))?;
        }
        let lock = try_acquire_exclusive_lock(root)?;
        let backend = FileSnapshot::in_root(root, &cfg);
        let mut v = Self::with_backend(cfg, Box::new(backend));
        v.root = Some(root.to_path_buf());
        v._lock = Some(lock);
        info!(
            "vault: opened {} ({} snippet(s), source={:?})",
            root.display(),
            v.snippets.len(),
            v.load_source
        );
        Ok(v)
    }

    /// Vault over an arbitrary snapshot backend (no directory lock).
    pub fn with_backend(cfg: VaultConfig, mut backend: Box<dyn SnapshotBackend>) -> Self {
        let loaded = load_with_recovery(backend.as_mut(), cfg.reload_backup_on_failure);
        let mut v = Self {
            cfg,
            root: None,
            snippets: Collection::new(),
            tags: TagIndex::new(),
            keywords: KeywordTrie::new(),
            history: CommandHistory::new(),
            backend,
            load_source: loaded.source,
            last_save_ok: true,
            _lock: None,
        };
        for s in loaded.snippets {
            if !v.cfg.is_supported_language(s.language()) {
                warn!(
                    "vault: '{}' uses language '{}' outside the configured list",
                    s.title(),
                    s.language()
                );
            }
            v.snippets.insert(s.title().to_string(), s);
        }
        if v.snippets.len() > v.cfg.max_snippets {
            warn!(
                "vault: loaded {} snippet(s), above max_snippets={}; add() is refused until deletes",
                v.snippets.len(),
                v.cfg.max_snippets
            );
        }
        v.rebuild_indexes();
        v
    }

    /// Ephemeral vault backed by a fresh `MemoryBackend`.
    pub fn in_memory(cfg: VaultConfig) -> Self {
        Self::with_backend(cfg, Box::new(MemoryBackend::new()))
    }

    pub(crate) fn rebuild_indexes(&mut self) {
        self.tags.clear();
        self.keywords = KeywordTrie::new();
        for s in self.snippets.values() {
            self.tags.insert_snippet(s);
            self.keywords.insert_code(s.code());
        }
    }

    fn snapshot_values(&self) -> Vec<Snippet> {
        self.snippets.values().cloned().collect()
    }

    /// Save after a mutation. Failures are logged and counted, never returned:
    /// the in-memory state the caller just changed stays as is.
    pub(crate) fn persist(&mut self) {
        let all = self.snapshot_values();
        match self.backend.save(&all) {
            Ok(()) => self.last_save_ok = true,
            Err(e) => {
                record_save_failed();
                self.last_save_ok = false;
                warn!(
                    "vault: save to {} failed (in-memory state kept): {:#}",
                    self.backend.describe(),
                    e
                );
            }
        }
    }

    /// Explicit save; unlike mutations this returns the error.
    pub fn flush(&mut self) -> Result<()> {
        let all = self.snapshot_values();
        let res = self
            .backend
            .save(&all)
            .with_context(|| format!("flush to {}", self.backend.describe()));
        if res.is_err() {
            record_save_failed();
        }
        self.last_save_ok = res.is_ok();
        res
    }

    /// Flush and release the writer lock.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        info!("vault: closed ({} snippet(s))", self.snippets.len());
        Ok(())
    }

    pub fn config(&self) -> &VaultConfig {
        &self.cfg
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Where the initial collection came from.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Whether the most recent save attempt succeeded.
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// (undo depth, redo depth)
    pub fn history_len(&self) -> (usize, usize) {
        self.history.depth()
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("root", &self.root)
            .field("snippets", &self.snippets.len())
            .field("tags", &self.tags.len())
            .field("keywords", &self.keywords.len())
            .field("history", &self.history.depth())
            .field("load_source", &self.load_source)
            .finish()
    }
}
