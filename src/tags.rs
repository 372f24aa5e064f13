//! tags — tag -> {title} индекс.
//!
//! Ключи хранятся в lowercase (поиск по тегу регистронезависимый).
//! Инвариант: ключ присутствует тогда и только тогда, когда хотя бы один живой
//! сниппет несёт этот тег; пустые корзины удаляются сразу.

use std::collections::{BTreeMap, BTreeSet};

use crate::snippet::Snippet;

#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    map: BTreeMap<String, BTreeSet<String>>,
}

#[inline]
fn tag_key(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every tag of `s` under its title.
    pub fn insert_snippet(&mut self, s: &Snippet) {
        for tag in s.tags() {
            self.map
                .entry(tag_key(tag))
                .or_default()
                .insert(s.title().to_string());
        }
    }

    /// Drop every association of `s`, pruning empty buckets.
    pub fn remove_snippet(&mut self, s: &Snippet) {
        for tag in s.tags() {
            let key = tag_key(tag);
            let now_empty = match self.map.get_mut(&key) {
                Some(titles) => {
                    titles.remove(s.title());
                    titles.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.map.remove(&key);
            }
        }
    }

    /// Swap associations of `old` for those of `new`.
    pub fn replace_snippet(&mut self, old: &Snippet, new: &Snippet) {
        self.remove_snippet(old);
        self.insert_snippet(new);
    }

    /// Titles carrying `tag` (sorted), empty if unknown.
    pub fn titles(&self, tag: &str) -> Vec<String> {
        self.map
            .get(&tag_key(tag))
            .map(|t| t.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.map.contains_key(&tag_key(tag))
    }

    /// All tag keys (sorted).
    pub fn tags(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// (tag, number of snippets) pairs.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.map.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}
