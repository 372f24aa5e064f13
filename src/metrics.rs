//! Lightweight global metrics for the vault.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Mutations (add/edit/delete)
//! - History (undo/redo)
//! - Persistence (save ok/failed, backup rotation/restore, recovered loads)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Mutations -----
static SNIPPETS_ADDED: AtomicU64 = AtomicU64::new(0);
static SNIPPETS_EDITED: AtomicU64 = AtomicU64::new(0);
static SNIPPETS_DELETED: AtomicU64 = AtomicU64::new(0);

// ----- History -----
static UNDO_APPLIED: AtomicU64 = AtomicU64::new(0);
static REDO_APPLIED: AtomicU64 = AtomicU64::new(0);

// ----- Persistence -----
static SAVES_OK: AtomicU64 = AtomicU64::new(0);
static SAVES_FAILED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static BACKUPS_ROTATED: AtomicU64 = AtomicU64::new(0);
static BACKUP_RESTORES: AtomicU64 = AtomicU64::new(0);
static LOADS_RECOVERED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    // Mutations
    pub snippets_added: u64,
    pub snippets_edited: u64,
    pub snippets_deleted: u64,

    // History
    pub undo_applied: u64,
    pub redo_applied: u64,

    // Persistence
    pub saves_ok: u64,
    pub saves_failed: u64,
    pub snapshot_bytes_written: u64,
    pub backups_rotated: u64,
    pub backup_restores: u64,
    pub loads_recovered: u64,
}

impl MetricsSnapshot {
    pub fn save_failure_ratio(&self) -> f64 {
        let total = self.saves_ok + self.saves_failed;
        if total == 0 {
            0.0
        } else {
            self.saves_failed as f64 / total as f64
        }
    }
}

// ----- Recorders (Mutations) -----
pub fn record_add() {
    SNIPPETS_ADDED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_edit() {
    SNIPPETS_EDITED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_delete() {
    SNIPPETS_DELETED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (History) -----
pub fn record_undo() {
    UNDO_APPLIED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_redo() {
    REDO_APPLIED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Persistence) -----
pub fn record_save_ok(bytes: usize) {
    SAVES_OK.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}

pub fn record_save_failed() {
    SAVES_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_backup_rotated() {
    BACKUPS_ROTATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_backup_restore() {
    BACKUP_RESTORES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_load_recovered() {
    LOADS_RECOVERED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        snippets_added: SNIPPETS_ADDED.load(Ordering::Relaxed),
        snippets_edited: SNIPPETS_EDITED.load(Ordering::Relaxed),
        snippets_deleted: SNIPPETS_DELETED.load(Ordering::Relaxed),

        undo_applied: UNDO_APPLIED.load(Ordering::Relaxed),
        redo_applied: REDO_APPLIED.load(Ordering::Relaxed),

        saves_ok: SAVES_OK.load(Ordering::Relaxed),
        saves_failed: SAVES_FAILED.load(Ordering::Relaxed),
        snapshot_bytes_written: SNAPSHOT_BYTES_WRITTEN.load(Ordering::Relaxed),
        backups_rotated: BACKUPS_ROTATED.load(Ordering::Relaxed),
        backup_restores: BACKUP_RESTORES.load(Ordering::Relaxed),
        loads_recovered: LOADS_RECOVERED.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_ratio() {
        let mut m = MetricsSnapshot::default();
        assert_eq!(m.save_failure_ratio(), 0.0);
        m.saves_ok = 3;
        m.saves_failed = 1;
        assert!((m.save_failure_ratio() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn counters_only_grow() {
        let before = snapshot();
        record_undo();
        record_save_ok(10);
        let after = snapshot();
        assert!(after.undo_applied >= before.undo_applied + 1);
        assert!(after.saves_ok >= before.saves_ok + 1);
        assert!(after.snapshot_bytes_written >= before.snapshot_bytes_written + 10);
    }
}
