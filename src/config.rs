//! Centralized configuration for the snippet vault.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - VaultConfig::from_env() reads SNIPVAULT_* env vars on top of defaults.
//! - with_* setters + build() for tests/embedding.
//!
//! Env:
//! - SNIPVAULT_MAX_SNIPPETS   (default 10000)
//! - SNIPVAULT_SNAPSHOT_FILE  (default "snippets.json", relative to the vault root)
//! - SNIPVAULT_BACKUP_FILE    (default "snippets_backup.json")
//! - SNIPVAULT_RELOAD_BACKUP  (default true; "0|false|off|no" disables)
//! - SNIPVAULT_LANGUAGES      (comma list; default java,python,javascript,cpp,c,csharp,ruby,php,swift,kotlin)

use std::collections::BTreeSet;
use std::fmt;

use crate::consts::{BACKUP_FILE, DEFAULT_LANGUAGES, MAX_SNIPPETS, SNAPSHOT_FILE};

/// Top-level configuration for a vault instance.
#[derive(Clone, Debug)]
pub struct VaultConfig {
    /// Hard cap on the number of live snippets.
    /// Env: SNIPVAULT_MAX_SNIPPETS
    pub max_snippets: usize,

    /// Primary snapshot file name (inside the vault root).
    /// Env: SNIPVAULT_SNAPSHOT_FILE
    pub snapshot_file: String,

    /// Backup file name (inside the vault root); rotated before every save.
    /// Env: SNIPVAULT_BACKUP_FILE
    pub backup_file: String,

    /// After a failed load, restore the backup and reload it in the same open.
    /// Env: SNIPVAULT_RELOAD_BACKUP
    pub reload_backup_on_failure: bool,

    /// Supported languages, stored lowercase.
    /// Env: SNIPVAULT_LANGUAGES
    pub languages: BTreeSet<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            max_snippets: MAX_SNIPPETS,
            snapshot_file: SNAPSHOT_FILE.to_string(),
            backup_file: BACKUP_FILE.to_string(),
            reload_backup_on_failure: true,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_languages(v: &str) -> BTreeSet<String> {
    v.split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl VaultConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SNIPVAULT_MAX_SNIPPETS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.max_snippets = n;
            }
        }

        if let Ok(v) = std::env::var("SNIPVAULT_SNAPSHOT_FILE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.snapshot_file = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("SNIPVAULT_BACKUP_FILE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.backup_file = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("SNIPVAULT_RELOAD_BACKUP") {
            if let Some(on) = parse_flag(&v) {
                cfg.reload_backup_on_failure = on;
            }
        }

        if let Ok(v) = std::env::var("SNIPVAULT_LANGUAGES") {
            let langs = parse_languages(&v);
            // пустой список = оставить дефолт, иначе add() отклонит всё
            if !langs.is_empty() {
                cfg.languages = langs;
            }
        }

        cfg
    }

    pub fn with_max_snippets(mut self, n: usize) -> Self {
        self.max_snippets = n;
        self
    }

    pub fn with_snapshot_file<S: Into<String>>(mut self, name: S) -> Self {
        self.snapshot_file = name.into();
        self
    }

    pub fn with_backup_file<S: Into<String>>(mut self, name: S) -> Self {
        self.backup_file = name.into();
        self
    }

    pub fn with_reload_backup_on_failure(mut self, on: bool) -> Self {
        self.reload_backup_on_failure = on;
        self
    }

    /// Replace the supported-language allow-list (case-insensitive).
    pub fn with_languages<I, S>(mut self, langs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages = langs
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }

    #[inline]
    pub fn is_supported_language(&self, lang: &str) -> bool {
        self.languages.contains(&lang.trim().to_ascii_lowercase())
    }
}

impl fmt::Display for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let langs: Vec<&str> = self.languages.iter().map(|s| s.as_str()).collect();
        write!(
            f,
            "VaultConfig {{ \
             max_snippets: {}, \
             snapshot_file: {}, \
             backup_file: {}, \
             reload_backup_on_failure: {}, \
             languages: [{}] \
             }}",
            self.max_snippets,
            self.snapshot_file,
            self.backup_file,
            self.reload_backup_on_failure,
            langs.join(","),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = VaultConfig::default();
        assert_eq!(cfg.max_snippets, MAX_SNIPPETS);
        assert_eq!(cfg.snapshot_file, SNAPSHOT_FILE);
        assert_eq!(cfg.languages.len(), DEFAULT_LANGUAGES.len());
        assert!(cfg.reload_backup_on_failure);
    }

    #[test]
    fn language_check_is_case_insensitive() {
        let cfg = VaultConfig::default();
        assert!(cfg.is_supported_language("Java"));
        assert!(cfg.is_supported_language(" PYTHON "));
        assert!(!cfg.is_supported_language("cobol"));
    }

    #[test]
    fn builder_overrides() {
        let cfg = VaultConfig::default()
            .with_max_snippets(3)
            .with_languages(["Rust", "", "go"])
            .with_reload_backup_on_failure(false)
            .build();
        assert_eq!(cfg.max_snippets, 3);
        assert!(cfg.is_supported_language("rust"));
        assert!(cfg.is_supported_language("GO"));
        assert!(!cfg.is_supported_language("java"));
        assert!(!cfg.reload_backup_on_failure);
        assert!(cfg.to_string().contains("languages: [go,rust]"));
    }

    #[test]
    fn flag_and_list_parsing() {
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        let l = parse_languages("C, cpp ,,Kotlin");
        assert_eq!(l.into_iter().collect::<Vec<_>>(), vec!["c", "cpp", "kotlin"]);
    }
}
