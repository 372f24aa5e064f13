//! exchange — plain-text export/import формат.
//!
//! Одна запись на сниппет:
//!
//! ```text
//! === Snippet ===
//! Title: Quick Sort
//! Language: python
//! Tags: algo, sorting
//! Code:
//! def quicksort(arr):
//!     ...
//! ==============
//! ```
//!
//! Парсер пропускает маркеры и прочие метки (Created:, Version: ...), собирает
//! четыре поля. Всё после `Code:` до конечного маркера — код (строка, равная
//! маркеру, внутри кода не поддерживается). Завершающий перевод строки кода
//! при импорте не сохраняется.

use crate::consts::{EXPORT_BEGIN, EXPORT_END};
use crate::snippet::Snippet;

/// One parsed record, fields as they appeared in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRecord {
    pub title: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub code: Option<String>,
}

impl ExportRecord {
    fn is_blank(&self) -> bool {
        self.title.is_none() && self.language.is_none() && self.code.is_none() && self.tags.is_empty()
    }
}

/// Render snippets into the exchange format.
pub fn export_snippets<'a, I>(snippets: I) -> String
where
    I: IntoIterator<Item = &'a Snippet>,
{
    let mut out = String::new();
    for s in snippets {
        let tags: Vec<&str> = s.tags().iter().map(|t| t.as_str()).collect();
        out.push_str(EXPORT_BEGIN);
        out.push('\n');
        out.push_str(&format!("Title: {}\n", s.title()));
        out.push_str(&format!("Language: {}\n", s.language()));
        out.push_str(&format!("Tags: {}\n", tags.join(", ")));
        out.push_str("Code:\n");
        out.push_str(s.code());
        if !s.code().ends_with('\n') {
            out.push('\n');
        }
        out.push_str(EXPORT_END);
        out.push('\n');
    }
    out
}

fn flush_record(records: &mut Vec<ExportRecord>, cur: &mut ExportRecord, code: &mut Option<Vec<&str>>) {
    if let Some(lines) = code.take() {
        cur.code = Some(lines.join("\n"));
    }
    let rec = std::mem::take(cur);
    if !rec.is_blank() {
        records.push(rec);
    }
}

/// Parse exchange text into records. Never fails; incomplete records are
/// returned as-is for the caller to reject.
pub fn parse_export(text: &str) -> Vec<ExportRecord> {
    let mut records = Vec::new();
    let mut cur = ExportRecord::default();
    let mut code: Option<Vec<&str>> = None;

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line == EXPORT_END {
            flush_record(&mut records, &mut cur, &mut code);
            continue;
        }
        if line == EXPORT_BEGIN {
            // начало новой записи закрывает незакрытую предыдущую
            flush_record(&mut records, &mut cur, &mut code);
            continue;
        }
        if let Some(lines) = code.as_mut() {
            lines.push(line);
            continue;
        }
        if let Some(v) = line.strip_prefix("Title: ") {
            cur.title = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("Language: ") {
            cur.language = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("Tags:") {
            cur.tags = v
                .split(',')
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect();
        } else if line.starts_with("Code:") {
            code = Some(Vec::new());
        }
    }
    flush_record(&mut records, &mut cur, &mut code);
    records
}
