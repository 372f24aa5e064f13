use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use snipvault::persist::decode_snapshot;
use snipvault::{LoadSource, Snippet, SnapshotBackend, Vault, VaultConfig};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("snipvault-test-{prefix}-{pid}-{t}-{id}"))
}

fn titles_in(path: &std::path::Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(decode_snapshot(&bytes)?
        .iter()
        .map(|s| s.title().to_string())
        .collect())
}

fn open(root: &std::path::Path) -> Result<Vault> {
    Vault::open_with_config(root, VaultConfig::default())
}

const NO_TAGS: [&str; 0] = [];

#[test]
fn state_survives_reopen() -> Result<()> {
    let root = unique_root("reopen");
    let added = {
        let mut v = open(&root)?;
        let s = v.add("hello", "python", "print('hello')", ["greet"])?;
        v.add("bye", "c", "puts(\"bye\");", NO_TAGS)?;
        v.close()?;
        s
    };

    let v = open(&root)?;
    assert_eq!(v.load_source(), LoadSource::Primary);
    assert_eq!(v.len(), 2);
    assert_eq!(v.get("hello"), Some(added));
    assert_eq!(v.search_by_tag("GREET").len(), 1);
    assert!(v.keyword_contains("print"));
    // history не переживает сессию
    assert!(!v.can_undo());
    Ok(())
}

#[test]
fn backup_holds_state_of_previous_save() -> Result<()> {
    let root = unique_root("rotation");
    let mut v = open(&root)?;
    let cfg = v.config().clone();
    let primary = root.join(&cfg.snapshot_file);
    let backup = root.join(&cfg.backup_file);

    v.add("first", "c", "int first;", NO_TAGS)?;
    assert!(!backup.exists());

    v.add("second", "c", "int second;", NO_TAGS)?;
    assert_eq!(titles_in(&backup)?, vec!["first".to_string()]);
    assert_eq!(
        titles_in(&primary)?,
        vec!["first".to_string(), "second".to_string()]
    );
    Ok(())
}

#[test]
fn snapshot_envelope_is_versioned_json() -> Result<()> {
    let root = unique_root("envelope");
    let mut v = open(&root)?;
    v.add("a", "java", "class A {}", ["x"])?;
    let raw = fs::read_to_string(root.join(&v.config().snapshot_file))?;
    let doc: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(doc["format"], "snipvault.snapshot");
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["count"], 1);
    assert_eq!(doc["snippets"][0]["title"], "a");
    Ok(())
}

#[test]
fn custom_snapshot_names_are_used() -> Result<()> {
    let root = unique_root("names");
    let cfg = VaultConfig::default()
        .with_snapshot_file("vault.json")
        .with_backup_file("vault.bak.json")
        .build();
    {
        let mut v = Vault::open_with_config(&root, cfg.clone())?;
        assert_eq!(v.root(), Some(root.as_path()));
        v.add("a", "c", "int a;", NO_TAGS)?;
        v.add("b", "c", "int b;", NO_TAGS)?;
    }
    assert!(!root.join("snippets.json").exists());
    assert!(!root.join("snippets_backup.json").exists());
    assert_eq!(titles_in(&root.join("vault.json"))?.len(), 2);
    assert_eq!(titles_in(&root.join("vault.bak.json"))?, vec!["a".to_string()]);

    let v = Vault::open_with_config(&root, cfg)?;
    assert_eq!(v.load_source(), LoadSource::Primary);
    assert_eq!(v.len(), 2);
    // дефолтные имена ничего не видят
    drop(v);
    assert_eq!(open(&root)?.load_source(), LoadSource::Fresh);
    Ok(())
}

#[test]
fn narrower_language_list_still_loads_existing_snippets() -> Result<()> {
    let root = unique_root("langs");
    {
        let mut v = open(&root)?;
        v.add("j", "java", "class J {}", NO_TAGS)?;
        v.close()?;
    }
    let cfg = VaultConfig::default().with_languages(["c"]).build();
    let mut v = Vault::open_with_config(&root, cfg)?;
    assert_eq!(v.load_source(), LoadSource::Primary);
    assert!(v.get("j").is_some());
    assert!(v.add("k", "java", "class K {}", NO_TAGS).is_err());
    Ok(())
}

#[test]
fn duplicate_code_in_snapshot_is_treated_as_corrupt() -> Result<()> {
    let root = unique_root("dup-code");
    let cfg = VaultConfig::default();
    {
        let mut v = open(&root)?;
        v.add("a", "c", "int a;", NO_TAGS)?;
        v.add("b", "c", "int b;", NO_TAGS)?;
    }
    // ручная правка: у b тот же code, что у a
    let primary = root.join(&cfg.snapshot_file);
    let raw = fs::read_to_string(&primary)?;
    fs::write(&primary, raw.replace("int b;", "int a;"))?;

    let v = open(&root)?;
    assert_eq!(v.load_source(), LoadSource::Backup);
    assert_eq!(v.len(), 1);
    assert_eq!(v.get("a").map(|s| s.code().to_string()), Some("int a;".to_string()));
    Ok(())
}

#[test]
fn corrupted_primary_recovers_from_backup() -> Result<()> {
    let root = unique_root("recover");
    {
        let mut v = open(&root)?;
        v.add("kept", "c", "int kept;", NO_TAGS)?;
        v.add("lost", "c", "int lost;", NO_TAGS)?;
    }
    let cfg = VaultConfig::default();
    fs::write(root.join(&cfg.snapshot_file), b"{ not json")?;

    let v = open(&root)?;
    assert_eq!(v.load_source(), LoadSource::Backup);
    assert!(v.get("kept").is_some());
    assert!(v.get("lost").is_none());
    Ok(())
}

#[test]
fn recovery_without_reload_starts_empty_then_uses_backup() -> Result<()> {
    let root = unique_root("no-reload");
    {
        let mut v = open(&root)?;
        v.add("a", "c", "int a;", NO_TAGS)?;
        v.add("b", "c", "int b;", NO_TAGS)?;
    }
    let cfg = VaultConfig::default().with_reload_backup_on_failure(false).build();
    fs::write(root.join(&cfg.snapshot_file), b"garbage")?;

    {
        let v = Vault::open_with_config(&root, cfg.clone())?;
        assert_eq!(v.load_source(), LoadSource::Empty);
        assert!(v.is_empty());
        // без close(): пустую коллекцию не сохраняем
    }

    let v = Vault::open_with_config(&root, cfg)?;
    assert_eq!(v.load_source(), LoadSource::Primary);
    assert!(v.get("a").is_some());
    Ok(())
}

#[test]
fn second_writer_is_rejected() -> Result<()> {
    let root = unique_root("lock");
    let v = open(&root)?;
    assert!(open(&root).is_err());
    drop(v);
    assert!(open(&root).is_ok());
    Ok(())
}

#[test]
fn failed_file_write_keeps_memory_and_last_good_file() -> Result<()> {
    let root = unique_root("write-fail");
    let mut v = open(&root)?;
    let cfg = v.config().clone();
    v.add("a", "c", "int a;", NO_TAGS)?;
    v.add("b", "c", "int b;", NO_TAGS)?;
    assert!(v.last_save_ok());

    // tmp-путь занят каталогом: запись снапшота упадёт
    let tmp = root.join(format!("{}.tmp", cfg.snapshot_file));
    fs::create_dir_all(&tmp)?;

    let c = v.add("c", "c", "int c;", ["new"])?;
    assert!(!v.last_save_ok());
    assert_eq!(v.get("c"), Some(c));
    assert_eq!(v.search_by_tag("new").len(), 1);
    assert_eq!(
        titles_in(&root.join(&cfg.snapshot_file))?,
        vec!["a".to_string(), "b".to_string()]
    );
    assert!(v.flush().is_err());

    fs::remove_dir_all(&tmp)?;
    v.flush()?;
    assert!(v.last_save_ok());
    assert_eq!(titles_in(&root.join(&cfg.snapshot_file))?.len(), 3);
    Ok(())
}

struct FailingBackend;

impl SnapshotBackend for FailingBackend {
    fn save(&mut self, _snippets: &[Snippet]) -> Result<()> {
        Err(anyhow!("simulated write error"))
    }

    fn load(&mut self) -> Result<Option<Vec<Snippet>>> {
        Ok(None)
    }

    fn restore_from_backup(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[test]
fn save_failure_does_not_roll_back_caller_view() -> Result<()> {
    let mut v = Vault::with_backend(VaultConfig::default(), Box::new(FailingBackend));
    assert_eq!(v.load_source(), LoadSource::Fresh);

    v.add("x", "ruby", "puts :x", ["sym"])?;
    assert!(!v.last_save_ok());
    assert!(v.get("x").is_some());
    assert_eq!(v.search_by_title("x").len(), 1);
    assert_eq!(v.search_by_tag("sym").len(), 1);

    v.edit("x", "ruby", "puts :y", ["sym"])?;
    assert_eq!(v.get("x").map(|s| s.version()), Some(2));
    v.undo()?;
    assert_eq!(v.get("x").map(|s| s.version()), Some(1));
    assert!(v.flush().is_err());
    Ok(())
}

#[test]
fn export_file_imports_into_fresh_vault() -> Result<()> {
    let root = unique_root("exchange");
    let out = root.join("export.txt");
    {
        let mut v = open(&root)?;
        v.add("one", "java", "class One {\n}\n", ["a", "b"])?;
        v.add("two", "cpp", "int main() {}", NO_TAGS)?;
        assert_eq!(v.export_to_file(&out)?, 2);
    }

    let other = unique_root("exchange-dst");
    let mut v = open(&other)?;
    let report = v.import_from_file(&out)?;
    assert!(report.is_clean());
    assert_eq!(v.len(), 2);
    // завершающий перевод строки кода не переносится
    assert_eq!(v.get("one").map(|s| s.code().to_string()), Some("class One {\n}".to_string()));
    assert_eq!(v.search_by_tag("b").len(), 1);
    Ok(())
}
