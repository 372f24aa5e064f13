//! Vault error taxonomy.
//!
//! Validation and lookup failures are returned to the caller as typed errors.
//! Persistence failures inside mutations are logged instead (see `vault::core`),
//! `Io`/`Format` only surface from explicit open/load/export calls.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    /// Empty/oversized title, language or code; unsupported language; bad tag.
    #[error("validation error: {0}")]
    Validation(String),

    /// Title or code collision.
    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("capacity reached: at most {0} snippets")]
    Capacity(usize),

    #[error("snippet not found: {0}")]
    NotFound(String),

    #[error("no changes detected for '{0}'")]
    NoChange(String),

    /// Undo/redo with an empty stack. Payload: "undo" | "redo".
    #[error("no operations to {0}")]
    NoHistory(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl VaultError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn not_found(title: impl Into<String>) -> Self {
        Self::NotFound(title.into())
    }

    /// Ошибки валидации/дубликатов — "ожидаемые", их не логируем как warn.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Format(_))
    }
}
