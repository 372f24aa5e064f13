//! batch — выполнение списка операций на одном открытом Vault.
//!
//! В отличие от одиночных команд, здесь живёт одна history, поэтому
//! undo/redo работают. Ошибка операции не прерывает пакет: она попадает в
//! отчёт, следующие операции выполняются.

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};
use crate::vault::Vault;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum BatchOp {
    Add {
        title: String,
        language: String,
        code: String,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// Omitted fields keep the current value.
    Edit {
        title: String,
        language: Option<String>,
        code: Option<String>,
        tags: Option<Vec<String>>,
    },
    Del {
        title: String,
    },
    Undo,
    Redo,
}

impl BatchOp {
    pub fn name(&self) -> &'static str {
        match self {
            BatchOp::Add { .. } => "add",
            BatchOp::Edit { .. } => "edit",
            BatchOp::Del { .. } => "del",
            BatchOp::Undo => "undo",
            BatchOp::Redo => "redo",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchOutcome {
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    /// Affected title / undone command on success, error text otherwise.
    pub detail: String,
}

fn apply_op(v: &mut Vault, op: BatchOp) -> VaultResult<String> {
    match op {
        BatchOp::Add { title, language, code, tags } => {
            let s = v.add(&title, &language, &code, &tags)?;
            Ok(s.title().to_string())
        }
        BatchOp::Edit { title, language, code, tags } => {
            let cur = v
                .get(&title)
                .ok_or_else(|| VaultError::not_found(title.trim()))?;
            let language = language.unwrap_or_else(|| cur.language().to_string());
            let code = code.unwrap_or_else(|| cur.code().to_string());
            let tags = tags.unwrap_or_else(|| cur.tags().iter().cloned().collect());
            let s = v.edit(&title, &language, &code, &tags)?;
            Ok(format!("{} v{}", s.title(), s.version()))
        }
        BatchOp::Del { title } => {
            let s = v.delete(&title)?;
            Ok(s.title().to_string())
        }
        BatchOp::Undo => v.undo().map(|k| format!("{:?}", k)),
        BatchOp::Redo => v.redo().map(|k| format!("{:?}", k)),
    }
}

/// Apply `ops` in order; one outcome per op.
pub fn run_batch(v: &mut Vault, ops: Vec<BatchOp>) -> Vec<BatchOutcome> {
    let mut out = Vec::with_capacity(ops.len());
    for (index, op) in ops.into_iter().enumerate() {
        let name = op.name();
        let outcome = match apply_op(v, op) {
            Ok(detail) => BatchOutcome { index, op: name, ok: true, detail },
            Err(e) => {
                warn!("batch: op #{} ({}) failed: {}", index, name, e);
                BatchOutcome { index, op: name, ok: false, detail: e.to_string() }
            }
        };
        out.push(outcome);
    }
    out
}

pub fn parse_ops(raw: &str) -> Result<Vec<BatchOp>> {
    serde_json::from_str(raw).context("parse ops json (array of objects)")
}

pub fn cmd_batch(path: &Path, ops_file: Option<PathBuf>, ops_json: Option<String>) -> Result<()> {
    let raw = if let Some(p) = ops_file {
        std::fs::read_to_string(&p).with_context(|| format!("read ops file {}", p.display()))?
    } else if let Some(s) = ops_json {
        s
    } else {
        return Err(anyhow!("provide --ops-file or --ops-json"));
    };

    let ops = parse_ops(&raw)?;
    if ops.is_empty() {
        println!("No ops to execute.");
        return Ok(());
    }

    let mut v = Vault::open(path)?;
    let outcomes = run_batch(&mut v, ops);
    let failed = outcomes.iter().filter(|o| !o.ok).count();
    for o in &outcomes {
        let mark = if o.ok { "ok" } else { "ERR" };
        println!("#{:<3} {:<5} {:<3} {}", o.index, o.op, mark, o.detail);
    }
    println!("Batch: {} op(s), {} failed", outcomes.len(), failed);
    v.close()
}
