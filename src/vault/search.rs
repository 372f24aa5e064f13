//! vault/search — read-only запросы. History не трогается.
//!
//! Подстрочные поиски регистронезависимые; пустой (после trim) запрос
//! ничего не находит. Результаты отсортированы по title.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::snippet::Snippet;
use crate::trie::extract_keywords;

use super::core::Vault;

#[inline]
fn norm_query(q: &str) -> Option<String> {
    let q = q.trim();
    if q.is_empty() {
        None
    } else {
        Some(q.to_lowercase())
    }
}

impl Vault {
    fn collect_where<F: Fn(&Snippet) -> bool>(&self, pred: F) -> Vec<Snippet> {
        self.snippets.values().filter(|s| pred(s)).cloned().collect()
    }

    /// Exact lookup by title.
    pub fn get(&self, title: &str) -> Option<Snippet> {
        self.snippets.get(title.trim()).cloned()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.snippets.contains_key(title.trim())
    }

    pub fn search_by_title(&self, query: &str) -> Vec<Snippet> {
        let Some(q) = norm_query(query) else {
            return Vec::new();
        };
        self.collect_where(|s| s.title().to_lowercase().contains(&q))
    }

    pub fn search_by_content(&self, query: &str) -> Vec<Snippet> {
        let Some(q) = norm_query(query) else {
            return Vec::new();
        };
        self.collect_where(|s| s.code().to_lowercase().contains(&q))
    }

    /// Language equality, case-insensitive.
    pub fn search_by_language(&self, language: &str) -> Vec<Snippet> {
        let Some(q) = norm_query(language) else {
            return Vec::new();
        };
        self.collect_where(|s| s.language().to_lowercase() == q)
    }

    /// Exact tag, case-insensitive (through the tag index).
    pub fn search_by_tag(&self, tag: &str) -> Vec<Snippet> {
        self.tags
            .titles(tag)
            .iter()
            .filter_map(|t| self.snippets.get(t).cloned())
            .collect()
    }

    /// Keyword suggestions from the trie (includes tokens of deleted snippets).
    /// A blank prefix suggests nothing.
    pub fn search_keywords(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.keywords.search_prefix(prefix)
    }

    pub fn keyword_contains(&self, token: &str) -> bool {
        self.keywords.contains(token)
    }

    /// Live snippets whose code has a token starting with `prefix`.
    pub fn search_by_keyword(&self, prefix: &str) -> Vec<Snippet> {
        let words: BTreeSet<String> = self
            .search_keywords(prefix)
            .into_iter()
            .map(|w| w.to_ascii_lowercase())
            .collect();
        if words.is_empty() {
            return Vec::new();
        }
        self.collect_where(|s| {
            extract_keywords(s.code()).any(|t| words.contains(&t.to_ascii_lowercase()))
        })
    }

    /// Union of title, content, tag and language matches for one query.
    pub fn advanced_search(&self, query: &str) -> Vec<Snippet> {
        let mut out: BTreeMap<String, Snippet> = BTreeMap::new();
        let hits = self
            .search_by_title(query)
            .into_iter()
            .chain(self.search_by_content(query))
            .chain(self.search_by_tag(query))
            .chain(self.search_by_language(query));
        for s in hits {
            out.entry(s.title().to_string()).or_insert(s);
        }
        out.into_values().collect()
    }

    /// Snippets with `start <= created_at <= end`.
    pub fn search_by_date(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Snippet> {
        self.collect_where(|s| s.created_at() >= start && s.created_at() <= end)
    }
}
