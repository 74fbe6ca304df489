//! Token Trie (spec §4.5).
//!
//! An explicit `HashMap<CompactString, TrieNode>`-per-node structure
//! keyed by whole tokens, not characters — the teacher has no trie
//! dependency to reuse, and the Vietnamese place-name token alphabet
//! doesn't benefit from a byte-trie crate the way string interning
//! would. Grounded on `original_source/Src` trie modules for the
//! interface; internals are plain Rust.

use compact_str::CompactString;
use std::collections::HashMap;

const MAX_WINDOW: usize = 6;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<CompactString, TrieNode>,
    value: Option<CompactString>,
}

/// A whole-token prefix tree. Insertion order wins on key collisions:
/// the first value ever inserted for a key is kept.
#[derive(Debug, Default)]
pub struct TokenTrie {
    root: TrieNode,
}

/// One hit from [`TokenTrie::scan`]: the matched display name and the
/// token span `[start, end)` it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub display_name: CompactString,
    pub start: usize,
    pub end: usize,
}

impl TokenTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `display_name` under `normalized_key` (space-separated
    /// tokens). Re-inserting the same key with the same value is a
    /// no-op; inserting a different value for an already-occupied key
    /// keeps the first value.
    pub fn insert(&mut self, normalized_key: &str, display_name: &str) {
        let mut node = &mut self.root;
        for token in normalized_key.split(' ').filter(|t| !t.is_empty()) {
            node = node.children.entry(token.into()).or_default();
        }
        if node.value.is_none() {
            node.value = Some(display_name.into());
        }
    }

    /// Exact key lookup.
    pub fn lookup(&self, normalized_key: &str) -> Option<&str> {
        let mut node = &self.root;
        for token in normalized_key.split(' ').filter(|t| !t.is_empty()) {
            node = node.children.get(token)?;
        }
        node.value.as_deref()
    }

    /// Scans every window `[i, j)` with `1 ≤ j - i ≤ 6` over `tokens`
    /// for a trie key match. Runs in O(n · w · c) with n = token count,
    /// w = 6, c = average key length in tokens.
    pub fn scan(&self, tokens: &[&str]) -> Vec<ScanHit> {
        let mut hits = Vec::new();
        for start in 0..tokens.len() {
            let mut node = &self.root;
            for span in 1..=MAX_WINDOW.min(tokens.len() - start) {
                let token = tokens[start + span - 1];
                match node.children.get(token) {
                    Some(next) => {
                        node = next;
                        if let Some(display_name) = &node.value {
                            hits.push(ScanHit {
                                display_name: display_name.clone(),
                                start,
                                end: start + span,
                            });
                        }
                    }
                    None => break,
                }
            }
        }
        hits
    }

    /// Selects the best scan hit per spec §4.9's span-selection rule:
    /// longest span first, then rightmost end position.
    pub fn best_hit(hits: &[ScanHit]) -> Option<&ScanHit> {
        hits.iter().max_by_key(|h| (h.end - h.start, h.end))
    }
}
