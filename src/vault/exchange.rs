//! vault/exchange — export/import в plain-text формате (crate::exchange).
//!
//! Импорт вызывает add() на каждую запись: каждая успешно импортированная
//! запись — отдельная команда в history (undo откатывает по одной).
//! Ошибка одной записи не прерывает остальные.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;

use crate::error::VaultError;
use crate::exchange::{export_snippets, parse_export, ExportRecord};

use super::core::Vault;

#[derive(Debug, Default)]
pub struct ImportReport {
    /// Titles added, in file order.
    pub imported: Vec<String>,
    /// (title or "<record N>", reason) for rejected records.
    pub failed: Vec<(String, VaultError)>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Vault {
    /// All snippets (sorted by title) in the exchange format.
    pub fn export_text(&self) -> String {
        export_snippets(self.snippets.values())
    }

    pub fn export_to_file(&self, path: &Path) -> Result<usize> {
        let text = self.export_text();
        fs::write(path, text).with_context(|| format!("write export {}", path.display()))?;
        info!("vault: exported {} snippet(s) to {}", self.len(), path.display());
        Ok(self.len())
    }

    fn import_record(&mut self, rec: ExportRecord) -> Result<String, VaultError> {
        let (Some(title), Some(language), Some(code)) = (rec.title, rec.language, rec.code) else {
            return Err(VaultError::validation(
                "record is missing title, language or code",
            ));
        };
        let s = self.add(&title, &language, &code, &rec.tags)?;
        Ok(s.title().to_string())
    }

    /// Parse exchange text and `add` every record.
    pub fn import_text(&mut self, text: &str) -> ImportReport {
        let mut report = ImportReport::default();
        for (i, rec) in parse_export(text).into_iter().enumerate() {
            let label = rec
                .title
                .clone()
                .unwrap_or_else(|| format!("<record {}>", i + 1));
            match self.import_record(rec) {
                Ok(title) => report.imported.push(title),
                Err(e) => {
                    warn!("vault: import skipped '{}': {}", label, e);
                    report.failed.push((label, e));
                }
            }
        }
        report
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<ImportReport> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read import {}", path.display()))?;
        let report = self.import_text(&text);
        info!(
            "vault: imported {} snippet(s) from {} ({} rejected)",
            report.imported.len(),
            path.display(),
            report.failed.len()
        );
        Ok(report)
    }
}
