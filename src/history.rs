//! history — undo/redo поверх коллекции сниппетов.
//!
//! Command — tagged variant {Add, Delete, Edit}, несёт ровно те значения,
//! которые нужны для инверсии. Применение/откат — чистые функции над
//! коллекцией title -> Snippet; индексы (теги/trie) сверяет вызывающий по
//! возвращаемому `Effect`.
//!
//! Инвариант: каждая успешная мутация кладёт ровно одну команду в undo и
//! очищает redo. Верхней границы у стеков нет.

use std::collections::BTreeMap;

use crate::snippet::Snippet;

pub type Collection = BTreeMap<String, Snippet>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Add,
    Delete,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Snippet),
    Delete(Snippet),
    Edit { old: Snippet, new: Snippet },
}

/// What a forward/backward step did to the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    pub removed: Option<Snippet>,
    pub inserted: Option<Snippet>,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Add(_) => CommandKind::Add,
            Command::Delete(_) => CommandKind::Delete,
            Command::Edit { .. } => CommandKind::Edit,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Command::Add(s) | Command::Delete(s) => s.title(),
            Command::Edit { new, .. } => new.title(),
        }
    }

    /// Re-apply the forward effect (redo).
    pub fn apply(&self, coll: &mut Collection) -> Effect {
        match self {
            Command::Add(s) => put(coll, s),
            Command::Delete(s) => take(coll, s.title()),
            Command::Edit { new, .. } => put(coll, new),
        }
    }

    /// Invert the effect (undo).
    pub fn revert(&self, coll: &mut Collection) -> Effect {
        match self {
            Command::Add(s) => take(coll, s.title()),
            Command::Delete(s) => put(coll, s),
            Command::Edit { old, .. } => put(coll, old),
        }
    }
}

fn put(coll: &mut Collection, s: &Snippet) -> Effect {
    let removed = coll.insert(s.title().to_string(), s.clone());
    Effect {
        removed,
        inserted: Some(s.clone()),
    }
}

fn take(coll: &mut Collection, title: &str) -> Effect {
    Effect {
        removed: coll.remove(title),
        inserted: None,
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandHistory {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh mutation: push to undo, clear redo.
    pub fn record(&mut self, cmd: Command) {
        self.undo.push(cmd);
        self.redo.clear();
    }

    /// Pop the latest command, revert it against `coll`, move it to redo.
    /// None if there is nothing to undo.
    pub fn undo(&mut self, coll: &mut Collection) -> Option<(CommandKind, Effect)> {
        let cmd = self.undo.pop()?;
        let eff = cmd.revert(coll);
        let kind = cmd.kind();
        self.redo.push(cmd);
        Some((kind, eff))
    }

    /// Pop the latest undone command, re-apply it, move it back to undo.
    pub fn redo(&mut self, coll: &mut Collection) -> Option<(CommandKind, Effect)> {
        let cmd = self.redo.pop()?;
        let eff = cmd.apply(coll);
        let kind = cmd.kind();
        self.undo.push(cmd);
        Some((kind, eff))
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// (undo depth, redo depth)
    #[inline]
    pub fn depth(&self) -> (usize, usize) {
        (self.undo.len(), self.redo.len())
    }

    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo.last()
    }

    pub fn peek_redo(&self) -> Option<&Command> {
        self.redo.last()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
