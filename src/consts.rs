//! Общие константы (файлы снапшота, формат, лимиты, языки).

// -------- Snapshot files --------
pub const SNAPSHOT_FILE: &str = "snippets.json";
pub const BACKUP_FILE: &str = "snippets_backup.json";
pub const TMP_SUFFIX: &str = ".tmp";
pub const LOCK_FILE: &str = "LOCK";

// -------- Snapshot envelope --------
pub const SNAPSHOT_FORMAT: &str = "snipvault.snapshot";
pub const SNAPSHOT_VERSION: u32 = 1;

// -------- Limits --------
pub const MAX_SNIPPETS: usize = 10_000;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_CODE_CHARS: usize = 10_000;

// -------- Languages --------
// Allow-list, сравнение без учёта регистра.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "java",
    "python",
    "javascript",
    "cpp",
    "c",
    "csharp",
    "ruby",
    "php",
    "swift",
    "kotlin",
];

// -------- Plain-text exchange --------
pub const EXPORT_BEGIN: &str = "=== Snippet ===";
pub const EXPORT_END: &str = "==============";
