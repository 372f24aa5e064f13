//! vault/stats — листинги и агрегаты.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::snippet::Snippet;

use super::core::Vault;

impl Vault {
    /// All snippets, sorted by title.
    pub fn list_all(&self) -> Vec<Snippet> {
        self.snippets.values().cloned().collect()
    }

    /// All snippets, oldest first (ties by title).
    pub fn list_by_date(&self) -> Vec<Snippet> {
        let mut v = self.list_all();
        v.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.title().cmp(b.title()))
        });
        v
    }

    /// Snippets created within the last `within`. A window reaching past the
    /// earliest representable time covers everything.
    pub fn recent(&self, within: Duration) -> Vec<Snippet> {
        let since = Utc::now()
            .checked_sub_signed(within)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.snippets
            .values()
            .filter(|s| s.created_at() >= since)
            .cloned()
            .collect()
    }

    /// Snippet count per language (lowercased).
    pub fn language_stats(&self) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for s in self.snippets.values() {
            *out.entry(s.language().to_lowercase()).or_insert(0) += 1;
        }
        out
    }

    /// Snippet count per tag (lowercased tag keys).
    pub fn tag_stats(&self) -> BTreeMap<String, usize> {
        self.tags.counts()
    }

    /// Tags currently carried by at least one snippet.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.tags()
    }

    /// Distinct keyword tokens ever indexed.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}
