//! vault — оркестратор хранилища сниппетов.
//!
//! Разделение по подмодулям:
//! - core.rs   — структура Vault, открытие (файлы/память), persist(), flush/close
//! - mutate.rs — add/edit/delete (валидация -> коллекция -> индексы -> history -> persist)
//! - undo.rs   — undo/redo + сверка tag index и trie по Effect
//! - search.rs — read-only запросы (title/content/tag/language/keyword/date/advanced)
//! - stats.rs  — листинги и статистика (языки, теги, recent)
//! - exchange.rs — plain-text export/import поверх crate::exchange
//!
//! Все чтения возвращают клоны: через результат нельзя изменить внутреннюю коллекцию.

pub mod core;
pub mod exchange;
pub mod mutate;
pub mod search;
pub mod stats;
pub mod undo;

pub use self::core::Vault;
pub use self::exchange::ImportReport;
