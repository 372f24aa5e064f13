use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::metrics;
use crate::snippet::Snippet;
use crate::vault::Vault;

use super::SearchBy;

/// Code from `--code-file` wins over `--code`.
pub(crate) fn read_code(code: Option<String>, code_file: Option<PathBuf>) -> Result<Option<String>> {
    if let Some(p) = code_file {
        let s = std::fs::read_to_string(&p)
            .with_context(|| format!("read code file {}", p.display()))?;
        return Ok(Some(s));
    }
    Ok(code)
}

fn print_line(s: &Snippet) {
    let tags: Vec<&str> = s.tags().iter().map(|t| t.as_str()).collect();
    println!(
        "{} [{}] v{} tags=[{}] created={}",
        s.title(),
        s.language(),
        s.version(),
        tags.join(","),
        s.created_at().format("%Y-%m-%d %H:%M:%S")
    );
}

fn print_full(s: &Snippet) {
    print_line(s);
    println!("  id            = {}", s.id());
    println!("  last_modified = {}", s.last_modified().to_rfc3339());
    println!("---");
    println!("{}", s.code());
}

fn print_json<T: Serialize>(v: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json output")?;
    println!("{}", s);
    Ok(())
}

fn print_list(list: &[Snippet], json: bool) -> Result<()> {
    if json {
        return print_json(&list);
    }
    if list.is_empty() {
        println!("(no snippets)");
    }
    for s in list {
        print_line(s);
    }
    Ok(())
}

pub fn cmd_add(
    path: &Path,
    title: &str,
    language: &str,
    code: Option<String>,
    code_file: Option<PathBuf>,
    tags: Vec<String>,
) -> Result<()> {
    let code = read_code(code, code_file)?
        .ok_or_else(|| anyhow!("provide --code or --code-file"))?;
    let mut v = Vault::open(path)?;
    let s = v.add(title, language, &code, &tags)?;
    println!("Added '{}' (id={})", s.title(), s.id());
    v.close()
}

pub fn cmd_get(path: &Path, title: &str, json: bool) -> Result<()> {
    let v = Vault::open(path)?;
    let s = v
        .get(title)
        .ok_or_else(|| anyhow!("snippet not found: {}", title))?;
    if json {
        print_json(&s)?;
    } else {
        print_full(&s);
    }
    Ok(())
}

pub fn cmd_edit(
    path: &Path,
    title: &str,
    language: Option<String>,
    code: Option<String>,
    code_file: Option<PathBuf>,
    tags: Option<Vec<String>>,
    clear_tags: bool,
) -> Result<()> {
    let code = read_code(code, code_file)?;
    let mut v = Vault::open(path)?;
    let cur = v
        .get(title)
        .ok_or_else(|| anyhow!("snippet not found: {}", title))?;

    let language = language.unwrap_or_else(|| cur.language().to_string());
    let code = code.unwrap_or_else(|| cur.code().to_string());
    let tags: Vec<String> = if clear_tags {
        Vec::new()
    } else {
        tags.unwrap_or_else(|| cur.tags().iter().cloned().collect())
    };

    let s = v.edit(title, &language, &code, &tags)?;
    println!("Edited '{}' -> v{}", s.title(), s.version());
    v.close()
}

pub fn cmd_del(path: &Path, title: &str) -> Result<()> {
    let mut v = Vault::open(path)?;
    let s = v.delete(title)?;
    println!("Deleted '{}'", s.title());
    v.close()
}

pub fn cmd_list(path: &Path, by_date: bool, json: bool) -> Result<()> {
    let v = Vault::open(path)?;
    let list = if by_date { v.list_by_date() } else { v.list_all() };
    print_list(&list, json)
}

pub fn cmd_search(path: &Path, by: SearchBy, query: &str, json: bool) -> Result<()> {
    let v = Vault::open(path)?;
    let list = match by {
        SearchBy::Title => v.search_by_title(query),
        SearchBy::Content => v.search_by_content(query),
        SearchBy::Tag => v.search_by_tag(query),
        SearchBy::Language => v.search_by_language(query),
        SearchBy::Keyword => v.search_by_keyword(query),
        SearchBy::All => v.advanced_search(query),
    };
    print_list(&list, json)
}

pub fn cmd_keywords(path: &Path, prefix: &str) -> Result<()> {
    let v = Vault::open(path)?;
    for w in v.search_keywords(prefix) {
        println!("{}", w);
    }
    Ok(())
}

#[derive(Serialize)]
struct StatsOut {
    total: usize,
    languages: BTreeMap<String, usize>,
    tags: BTreeMap<String, usize>,
    keywords: usize,
}

pub fn cmd_stats(path: &Path, json: bool) -> Result<()> {
    let v = Vault::open(path)?;
    let out = StatsOut {
        total: v.len(),
        languages: v.language_stats(),
        tags: v.tag_stats(),
        keywords: v.keyword_count(),
    };
    if json {
        return print_json(&out);
    }
    println!("Snippets: {}", out.total);
    println!("Languages:");
    for (k, n) in &out.languages {
        println!("  {:<12} = {}", k, n);
    }
    println!("Tags:");
    for (k, n) in &out.tags {
        println!("  {:<12} = {}", k, n);
    }
    println!("Keywords: {}", out.keywords);
    Ok(())
}

pub fn cmd_export(path: &Path, out: &Path) -> Result<()> {
    let v = Vault::open(path)?;
    let n = v.export_to_file(out)?;
    println!("Exported {} snippet(s) to {}", n, out.display());
    Ok(())
}

pub fn cmd_import(path: &Path, from: &Path) -> Result<()> {
    let mut v = Vault::open(path)?;
    let report = v.import_from_file(from)?;
    println!("Imported {} snippet(s)", report.imported.len());
    for (label, e) in &report.failed {
        println!("  skipped {}: {}", label, e);
    }
    v.close()
}

#[derive(Serialize)]
struct StatusOut {
    root: String,
    snippets: usize,
    load_source: String,
    snapshot_file: String,
    backup_file: String,
    max_snippets: usize,
    metrics: metrics::MetricsSnapshot,
}

pub fn cmd_status(path: &Path, json: bool) -> Result<()> {
    let v = Vault::open(path)?;
    let cfg = v.config();
    let out = StatusOut {
        root: v.root().unwrap_or(path).display().to_string(),
        snippets: v.len(),
        load_source: format!("{:?}", v.load_source()),
        snapshot_file: cfg.snapshot_file.clone(),
        backup_file: cfg.backup_file.clone(),
        max_snippets: cfg.max_snippets,
        metrics: metrics::snapshot(),
    };
    if json {
        return print_json(&out);
    }
    println!("Vault at {}", out.root);
    println!("  snippets      = {}/{}", out.snippets, out.max_snippets);
    println!("  load_source   = {}", out.load_source);
    println!("  snapshot_file = {}", out.snapshot_file);
    println!("  backup_file   = {}", out.backup_file);
    println!("Metrics snapshot:");
    println!("  backups_rotated  = {}", out.metrics.backups_rotated);
    println!("  backup_restores  = {}", out.metrics.backup_restores);
    println!("  loads_recovered  = {}", out.metrics.loads_recovered);
    println!("  save_fail_ratio  = {:.3}", out.metrics.save_failure_ratio());
    Ok(())
}
