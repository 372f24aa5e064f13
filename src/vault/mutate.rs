//! vault/mutate — add / edit / delete.
//!
//! Порядок для каждой мутации: валидация (ничего не трогаем) -> коллекция ->
//! tag index / trie -> команда в history (redo очищается) -> persist().
//! Ошибка валидации не оставляет частичных изменений ни в одном индексе.

use log::debug;

use crate::error::{VaultError, VaultResult};
use crate::history::Command;
use crate::metrics::{record_add, record_delete, record_edit};
use crate::snippet::{normalize_tags, validate_code, validate_language, validate_title, Snippet};

use super::core::Vault;

impl Vault {
    fn code_owner(&self, code: &str) -> Option<&str> {
        self.snippets
            .values()
            .find(|s| s.code() == code)
            .map(|s| s.title())
    }

    /// Add a new snippet and return a copy of it.
    ///
    /// Fails with `Capacity` when full, `Duplicate` on a title or code
    /// collision, `Validation` on bad fields or an unsupported language.
    pub fn add<I, S>(&mut self, title: &str, language: &str, code: &str, tags: I) -> VaultResult<Snippet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.snippets.len() >= self.cfg.max_snippets {
            return Err(VaultError::Capacity(self.cfg.max_snippets));
        }
        validate_title(title)?;
        let title = title.trim();
        if self.snippets.contains_key(title) {
            return Err(VaultError::duplicate(format!(
                "a snippet titled '{title}' already exists"
            )));
        }
        validate_language(&self.cfg, language)?;
        validate_code(code)?;
        if let Some(owner) = self.code_owner(code) {
            return Err(VaultError::duplicate(format!(
                "snippet '{owner}' already has this code"
            )));
        }
        let tags = normalize_tags(tags)?;

        let snippet = Snippet::new(
            title.to_string(),
            language.trim().to_string(),
            code.to_string(),
            tags,
        );
        self.snippets.insert(snippet.title().to_string(), snippet.clone());
        self.tags.insert_snippet(&snippet);
        self.keywords.insert_code(snippet.code());
        self.history.record(Command::Add(snippet.clone()));
        record_add();
        debug!("vault: add '{}' ({} tag(s))", snippet.title(), snippet.tags().len());

        self.persist();
        Ok(snippet)
    }

    /// Replace the snippet under `title` with a new value (new id and
    /// timestamps, version + 1). Returns a copy of the new value.
    ///
    /// Fails with `NotFound`, `Validation`, `NoChange` (language, code and tag
    /// set all equal) or `Duplicate` (another title already has this code).
    pub fn edit<I, S>(
        &mut self,
        title: &str,
        new_language: &str,
        new_code: &str,
        new_tags: I,
    ) -> VaultResult<Snippet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let title = title.trim();
        let old = self
            .snippets
            .get(title)
            .cloned()
            .ok_or_else(|| VaultError::not_found(title))?;

        validate_language(&self.cfg, new_language)?;
        validate_code(new_code)?;
        let new_tags = normalize_tags(new_tags)?;
        let new_language = new_language.trim();

        if old.same_content(new_language, new_code, &new_tags) {
            return Err(VaultError::NoChange(title.to_string()));
        }
        if let Some(owner) = self
            .snippets
            .values()
            .find(|s| s.title() != title && s.code() == new_code)
            .map(|s| s.title())
        {
            return Err(VaultError::duplicate(format!(
                "snippet '{owner}' already has this code"
            )));
        }

        let new = old.revise(new_language.to_string(), new_code.to_string(), new_tags);
        self.snippets.insert(title.to_string(), new.clone());
        self.tags.replace_snippet(&old, &new);
        // старые токены не вычищаем
        self.keywords.insert_code(new.code());
        self.history.record(Command::Edit {
            old,
            new: new.clone(),
        });
        record_edit();
        debug!("vault: edit '{}' -> v{}", title, new.version());

        self.persist();
        Ok(new)
    }

    /// Remove the snippet under `title` and return it.
    ///
    /// Keyword trie entries produced by it stay in place.
    pub fn delete(&mut self, title: &str) -> VaultResult<Snippet> {
        let title = title.trim();
        let removed = self
            .snippets
            .remove(title)
            .ok_or_else(|| VaultError::not_found(title))?;
        self.tags.remove_snippet(&removed);
        self.history.record(Command::Delete(removed.clone()));
        record_delete();
        debug!("vault: delete '{}'", title);

        self.persist();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::VaultConfig;
    use crate::error::VaultError;
    use crate::vault::Vault;

    const NO_TAGS: [&str; 0] = [];

    fn vault() -> Vault {
        Vault::in_memory(VaultConfig::default())
    }

    #[test]
    fn add_assigns_identity() {
        let mut v = vault();
        let s = v.add("hello", "Python", "print('hi')", ["greeting"]).unwrap();
        assert_eq!(s.version(), 1);
        assert_eq!(s.created_at(), s.last_modified());
        assert_eq!(s.language(), "Python");
        assert_eq!(v.get("hello").unwrap().id(), s.id());
    }

    #[test]
    fn add_rejects_collisions() {
        let mut v = vault();
        v.add("a", "c", "int a;", NO_TAGS).unwrap();
        assert!(matches!(
            v.add("a", "c", "int b;", NO_TAGS),
            Err(VaultError::Duplicate(_))
        ));
        assert!(matches!(
            v.add("b", "java", "int a;", NO_TAGS),
            Err(VaultError::Duplicate(_))
        ));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn add_validation_leaves_no_trace() {
        let mut v = vault();
        assert!(matches!(
            v.add("x", "cobol", "MOVE A TO B", ["legacy"]),
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            v.add("x", "c", "int y;", ["ok", " "]),
            Err(VaultError::Validation(_))
        ));
        assert!(v.is_empty());
        assert!(v.search_keywords("move").is_empty());
        assert!(v.search_by_tag("legacy").is_empty());
        assert!(!v.can_undo());
    }

    #[test]
    fn title_limit_applies_to_stored_form() {
        let mut v = vault();
        let full = "t".repeat(crate::consts::MAX_TITLE_CHARS);
        let s = v.add(&format!("{full}  "), "c", "int t;", NO_TAGS).unwrap();
        assert_eq!(s.title(), full);
        assert!(v.get(&full).is_some());
        assert!(matches!(
            v.add(&format!("{full}x"), "c", "int u;", NO_TAGS),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut v = Vault::in_memory(VaultConfig::default().with_max_snippets(2));
        v.add("a", "c", "1", NO_TAGS).unwrap();
        v.add("b", "c", "2", NO_TAGS).unwrap();
        assert!(matches!(
            v.add("c", "c", "3", NO_TAGS),
            Err(VaultError::Capacity(2))
        ));
    }

    #[test]
    fn edit_requires_a_change() {
        let mut v = vault();
        v.add("a", "c", "int a;", ["x", "y"]).unwrap();
        assert!(matches!(
            v.edit("a", "c", "int a;", ["y", "x"]),
            Err(VaultError::NoChange(_))
        ));
        assert!(matches!(
            v.edit("missing", "c", "int a;", NO_TAGS),
            Err(VaultError::NotFound(_))
        ));
        let e = v.edit("a", "c", "int a;", ["x"]).unwrap();
        assert_eq!(e.version(), 2);
        assert!(v.search_by_tag("y").is_empty());
    }

    #[test]
    fn edit_rejects_code_of_another_snippet() {
        let mut v = vault();
        v.add("a", "c", "int a;", NO_TAGS).unwrap();
        v.add("b", "c", "int b;", NO_TAGS).unwrap();
        assert!(matches!(
            v.edit("b", "c", "int a;", NO_TAGS),
            Err(VaultError::Duplicate(_))
        ));
        // своя же code + другой язык — это изменение
        assert!(v.edit("b", "cpp", "int b;", NO_TAGS).is_ok());
    }

    #[test]
    fn delete_prunes_tags_but_keeps_keywords() {
        let mut v = vault();
        v.add("a", "ruby", "puts unique_token", ["solo"]).unwrap();
        v.delete("a").unwrap();
        assert!(v.get("a").is_none());
        assert!(v.tag_names().is_empty());
        assert!(v.keyword_contains("unique"));
        assert!(matches!(v.delete("a"), Err(VaultError::NotFound(_))));
    }
}
