//! snippet — сущность Snippet и валидация её полей.
//!
//! Snippet неизменяем снаружи: все поля приватные, правка = новая версия
//! через `Snippet::revise` (новый id и таймстемпы, version + 1).

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::VaultConfig;
use crate::consts::{MAX_CODE_CHARS, MAX_TITLE_CHARS};
use crate::error::{VaultError, VaultResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    id: String,
    title: String,
    language: String,
    code: String,
    #[serde(default)]
    tags: BTreeSet<String>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    version: u32,
}

/// Opaque snippet id: 16 hex chars from OsRng.
pub fn generate_id() -> String {
    let mut buf = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    format!("{:016x}", u64::from_le_bytes(buf))
}

/// Length is checked on the trimmed title (the form that gets stored).
pub fn validate_title(title: &str) -> VaultResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(VaultError::validation("title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(VaultError::validation(format!(
            "title exceeds maximum length of {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_language(cfg: &VaultConfig, language: &str) -> VaultResult<()> {
    if language.trim().is_empty() {
        return Err(VaultError::validation("language cannot be empty"));
    }
    if !cfg.is_supported_language(language) {
        return Err(VaultError::validation(format!(
            "unsupported programming language: {language}"
        )));
    }
    Ok(())
}

pub fn validate_code(code: &str) -> VaultResult<()> {
    if code.trim().is_empty() {
        return Err(VaultError::validation("code cannot be empty"));
    }
    if code.chars().count() > MAX_CODE_CHARS {
        return Err(VaultError::validation(format!(
            "code exceeds maximum length of {MAX_CODE_CHARS} characters"
        )));
    }
    Ok(())
}

/// Trim tags, reject empty ones, collapse duplicates.
pub fn normalize_tags<I, S>(tags: I) -> VaultResult<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BTreeSet::new();
    for t in tags {
        let t = t.as_ref().trim();
        if t.is_empty() {
            return Err(VaultError::validation("tag cannot be empty"));
        }
        out.insert(t.to_string());
    }
    Ok(out)
}

impl Snippet {
    /// Fresh snippet (version 1). Fields must be validated by the caller.
    pub(crate) fn new(
        title: String,
        language: String,
        code: String,
        tags: BTreeSet<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title,
            language,
            code,
            tags,
            created_at: now,
            last_modified: now,
            version: 1,
        }
    }

    /// Replacement value under the same title: new id, new timestamps, version + 1.
    pub(crate) fn revise(&self, language: String, code: String, tags: BTreeSet<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title: self.title.clone(),
            language,
            code,
            tags,
            created_at: now,
            last_modified: now,
            version: self.version.saturating_add(1),
        }
    }

    /// True if language, code and the tag set all equal the given values.
    pub fn same_content(&self, language: &str, code: &str, tags: &BTreeSet<String>) -> bool {
        self.language == language && self.code == code && &self.tags == tags
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}
