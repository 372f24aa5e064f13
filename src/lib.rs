//! snipvault — персональное хранилище сниппетов кода.
//!
//! Раскладка:
//! - snippet  — сущность Snippet + валидация полей
//! - trie     — keyword trie (автодополнение по префиксу)
//! - tags     — tag index (tag -> titles)
//! - history  — команды add/edit/delete, undo/redo стеки
//! - persist  — снапшот (JSON), backup-before-write, восстановление
//! - vault    — оркестратор: мутации, поиск, статистика, export/import
//! - cli      — неинтерактивный CLI и batch-раннер

// Базовые модули
pub mod consts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod lock;

// Модель и индексы
pub mod snippet;
pub mod trie;
pub mod tags;
pub mod history;

// Хранение и обмен
pub mod persist;
pub mod exchange;

// Оркестратор
pub mod vault;

pub mod cli;

// Удобные реэкспорты
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use history::{Command, CommandHistory, CommandKind};
pub use persist::{FileSnapshot, LoadSource, MemoryBackend, SnapshotBackend};
pub use snippet::Snippet;
pub use tags::TagIndex;
pub use trie::KeywordTrie;
pub use vault::{ImportReport, Vault};
