use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use snipvault::cli::{run_cmd, Cli, Cmd, SearchBy};
use snipvault::{Vault, VaultConfig};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("snipvault-cli-{prefix}-{pid}-{t}-{id}"))
}

fn path_str(p: &std::path::Path) -> String {
    p.display().to_string()
}

#[test]
fn parses_tags_as_list_or_repeated() -> Result<()> {
    let cli = Cli::try_parse_from([
        "snipvault", "add", "--path", "/tmp/v", "--title", "t", "--language", "c",
        "--code", "int t;", "--tag", "a,b", "--tag", "c",
    ])?;
    match cli.cmd {
        Cmd::Add { tags, .. } => assert_eq!(tags, vec!["a", "b", "c"]),
        other => panic!("unexpected {:?}", other),
    }

    let cli = Cli::try_parse_from(["snipvault", "search", "--path", "/tmp/v", "--by", "tag", "algo"])?;
    assert!(matches!(cli.cmd, Cmd::Search { by: SearchBy::Tag, .. }));
    Ok(())
}

#[test]
fn add_edit_del_through_commands() -> Result<()> {
    let root = unique_root("cmds");
    let p_owned = path_str(&root);
    let p = p_owned.as_str();

    run_cmd(Cli::try_parse_from([
        "snipvault", "add", "--path", p, "--title", "hello", "--language", "python",
        "--code", "print('hi')", "--tag", "greet",
    ])?.cmd)?;
    run_cmd(Cli::try_parse_from([
        "snipvault", "edit", "--path", p, "--title", "hello", "--code", "print('hello')",
    ])?.cmd)?;

    {
        let v = Vault::open_with_config(&root, VaultConfig::default())?;
        let s = v.get("hello").expect("present");
        assert_eq!(s.code(), "print('hello')");
        assert_eq!(s.version(), 2);
        assert!(s.has_tag("greet"));
    }

    // дубликат по title — ошибка команды
    assert!(run_cmd(Cli::try_parse_from([
        "snipvault", "add", "--path", p, "--title", "hello", "--language", "c", "--code", "x",
    ])?.cmd).is_err());

    run_cmd(Cli::try_parse_from(["snipvault", "del", "--path", p, "--title", "hello"])?.cmd)?;
    let v = Vault::open_with_config(&root, VaultConfig::default())?;
    assert!(v.is_empty());
    Ok(())
}

#[test]
fn batch_runs_undo_redo_in_one_session() -> Result<()> {
    let root = unique_root("batch");
    let ops = r#"[
        {"op":"add","title":"a","language":"c","code":"int a;","tags":["x"]},
        {"op":"add","title":"b","language":"c","code":"int b;"},
        {"op":"del","title":"a"},
        {"op":"undo"},
        {"op":"edit","title":"b","tags":["y"]},
        {"op":"undo"},
        {"op":"redo"},
        {"op":"del","title":"nope"}
    ]"#;
    run_cmd(Cmd::Batch {
        path: root.clone(),
        ops_file: None,
        ops_json: Some(ops.to_string()),
    })?;

    let v = Vault::open_with_config(&root, VaultConfig::default())?;
    assert_eq!(v.len(), 2);
    assert_eq!(v.search_by_tag("x").len(), 1);
    assert_eq!(v.get("b").map(|s| s.version()), Some(2));
    assert!(v.get("b").map(|s| s.has_tag("y")).unwrap_or(false));
    Ok(())
}

#[test]
fn batch_requires_ops() {
    let root = unique_root("batch-empty");
    let res = run_cmd(Cmd::Batch { path: root, ops_file: None, ops_json: None });
    assert!(res.is_err());
}

#[test]
fn read_only_commands_run_ok() -> Result<()> {
    let root = unique_root("ro");
    let p_owned = path_str(&root);
    let p = p_owned.as_str();
    run_cmd(Cli::try_parse_from([
        "snipvault", "add", "--path", p, "--title", "t", "--language", "java",
        "--code", "class T {}", "--tag", "oop",
    ])?.cmd)?;

    for args in [
        vec!["snipvault", "list", "--path", p, "--json"],
        vec!["snipvault", "list", "--path", p, "--by-date"],
        vec!["snipvault", "get", "--path", p, "--title", "t", "--json"],
        vec!["snipvault", "search", "--path", p, "class"],
        vec!["snipvault", "search", "--path", p, "--by", "keyword", "cla", "--json"],
        vec!["snipvault", "keywords", "--path", p, "cl"],
        vec!["snipvault", "stats", "--path", p, "--json"],
        vec!["snipvault", "status", "--path", p, "--json"],
    ] {
        run_cmd(Cli::try_parse_from(args)?.cmd)?;
    }
    assert!(run_cmd(Cli::try_parse_from(["snipvault", "get", "--path", p, "--title", "none"])?.cmd).is_err());
    Ok(())
}
