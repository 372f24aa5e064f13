//! trie — keyword index (prefix tree) поверх токенов из кода сниппетов.
//!
//! - Токены: максимальные ASCII-alnum последовательности, всё остальное — разделители.
//! - Путь в дереве строится по lowercase-символам, терминальный узел хранит
//!   display-форму (регистр первого вставленного токена).
//! - Удаления нет: токен остаётся находимым по префиксу и после удаления
//!   сниппета, который его породил.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    // Some(display) => конец слова
    word: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct KeywordTrie {
    root: TrieNode,
    words: usize,
}

/// Split code into keyword tokens (original case preserved, empty tokens dropped).
pub fn extract_keywords(code: &str) -> impl Iterator<Item = &str> {
    code.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
}

impl KeywordTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one token. Idempotent; the first display form wins.
    pub fn insert(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in token.chars() {
            node = node.children.entry(c.to_ascii_lowercase()).or_default();
        }
        if node.word.is_none() {
            node.word = Some(token.to_string());
            self.words += 1;
        }
    }

    /// Insert every keyword extracted from `code`.
    pub fn insert_code(&mut self, code: &str) {
        for tok in extract_keywords(code) {
            self.insert(tok);
        }
    }

    fn find_node(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c.to_ascii_lowercase())?;
        }
        Some(node)
    }

    /// All tokens under `prefix` (depth-first). An empty prefix walks the
    /// whole trie.
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.find_node(prefix) {
            collect_words(node, &mut out);
        }
        out
    }

    pub fn contains(&self, token: &str) -> bool {
        matches!(self.find_node(token), Some(n) if n.word.is_some())
    }

    /// Number of distinct tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.words
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }
}

fn collect_words(node: &TrieNode, out: &mut Vec<String>) {
    if let Some(w) = &node.word {
        out.push(w.clone());
    }
    for child in node.children.values() {
        collect_words(child, out);
    }
}
