//! cli — неинтерактивный CLI поверх Vault.
//!
//! Одна подкоманда на операцию движка. Каждая команда открывает хранилище
//! (writer-lock), выполняет операцию и закрывает его. Undo/redo имеют смысл
//! только внутри одного сеанса, поэтому для них есть `batch` (JSON-список
//! операций, выполняемых на одном открытом Vault).

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod batch;
pub mod commands;

/// Минимальный CLI для snipvault
#[derive(Parser, Debug)]
#[command(name = "snipvault", version, about = "Personal code-snippet vault")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchBy {
    Title,
    Content,
    Tag,
    Language,
    Keyword,
    All,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Add a snippet (code as a literal or from a file)
    Add {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        language: String,
        /// Code as a literal string. Ignored if --code-file is set.
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        code_file: Option<PathBuf>,
        /// Tags, repeatable or comma-separated
        #[arg(long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Print one snippet by exact title
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Edit a snippet; omitted fields keep their current value
    Edit {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        code_file: Option<PathBuf>,
        /// Replace the tag set (repeatable or comma-separated)
        #[arg(long = "tag", value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Drop all tags
        #[arg(long, default_value_t = false)]
        clear_tags: bool,
    },
    /// Delete a snippet
    Del {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        title: String,
    },
    /// List all snippets (by title, or by creation date)
    List {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        by_date: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search snippets
    ///
    /// Пример:
    ///   snipvault search --path ./vault --by tag sorting
    Search {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = SearchBy::All)]
        by: SearchBy,
        query: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Keyword suggestions by prefix
    Keywords {
        #[arg(long)]
        path: PathBuf,
        prefix: String,
    },
    /// Language/tag statistics
    Stats {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export all snippets to a plain-text file
    Export {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Import snippets from a plain-text export
    Import {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        from: PathBuf,
    },
    /// Run operations from JSON in one session (undo/redo included)
    ///
    /// JSON формат (массив объектов):
    /// [
    ///   {"op":"add","title":"a","language":"c","code":"int a;","tags":["x"]},
    ///   {"op":"edit","title":"a","code":"int a = 1;"},
    ///   {"op":"del","title":"a"},
    ///   {"op":"undo"},
    ///   {"op":"redo"}
    /// ]
    Batch {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        ops_file: Option<PathBuf>,
        /// JSON-строка с операциями (если ops_file не задан)
        #[arg(long)]
        ops_json: Option<String>,
    },
    /// Print vault/metrics summary
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_cmd(cli.cmd)
}

pub fn run_cmd(cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Add { path, title, language, code, code_file, tags } =>
            commands::cmd_add(&path, &title, &language, code, code_file, tags),

        Cmd::Get { path, title, json } =>
            commands::cmd_get(&path, &title, json),

        Cmd::Edit { path, title, language, code, code_file, tags, clear_tags } =>
            commands::cmd_edit(&path, &title, language, code, code_file, tags, clear_tags),

        Cmd::Del { path, title } =>
            commands::cmd_del(&path, &title),

        Cmd::List { path, by_date, json } =>
            commands::cmd_list(&path, by_date, json),

        Cmd::Search { path, by, query, json } =>
            commands::cmd_search(&path, by, &query, json),

        Cmd::Keywords { path, prefix } =>
            commands::cmd_keywords(&path, &prefix),

        Cmd::Stats { path, json } =>
            commands::cmd_stats(&path, json),

        Cmd::Export { path, out } =>
            commands::cmd_export(&path, &out),

        Cmd::Import { path, from } =>
            commands::cmd_import(&path, &from),

        Cmd::Batch { path, ops_file, ops_json } =>
            batch::cmd_batch(&path, ops_file, ops_json),

        Cmd::Status { path, json } =>
            commands::cmd_status(&path, json),
    }
}
