//! vault/undo — undo/redo.
//!
//! Команда откатывается/применяется к коллекции (history.rs), затем индексы
//! сверяются по Effect: tag index снимает ассоциации убранного значения и
//! добавляет для вставленного; trie получает токены вставленного значения
//! (удалений из trie нет вообще).

use log::debug;

use crate::error::{VaultError, VaultResult};
use crate::history::{CommandKind, Effect};
use crate::metrics::{record_redo, record_undo};

use super::core::Vault;

impl Vault {
    fn reconcile(&mut self, eff: &Effect) {
        if let Some(old) = &eff.removed {
            self.tags.remove_snippet(old);
        }
        if let Some(new) = &eff.inserted {
            self.tags.insert_snippet(new);
            self.keywords.insert_code(new.code());
        }
    }

    /// Revert the most recent mutation. Returns the kind of command undone.
    pub fn undo(&mut self) -> VaultResult<CommandKind> {
        let (kind, eff) = self
            .history
            .undo(&mut self.snippets)
            .ok_or(VaultError::NoHistory("undo"))?;
        self.reconcile(&eff);
        record_undo();
        debug!("vault: undo {:?}", kind);
        self.persist();
        Ok(kind)
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> VaultResult<CommandKind> {
        let (kind, eff) = self
            .history
            .redo(&mut self.snippets)
            .ok_or(VaultError::NoHistory("redo"))?;
        self.reconcile(&eff);
        record_redo();
        debug!("vault: redo {:?}", kind);
        self.persist();
        Ok(kind)
    }
}
