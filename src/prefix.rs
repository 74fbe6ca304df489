//! Admin-Prefix Handler (spec §4.3).
//!
//! Two distinct operations live here, matching the original's split
//! between a database-side tool and a parser-side tool (grounded in
//! `original_source/Src/admin_prefix_handler.py` and
//! `original_source/Src/prefix_expander.py` respectively):
//!
//! - [`strip`] removes a known admin prefix from the *front* of an
//!   entity display name or input fragment.
//! - [`expand_in_text`] rewrites abbreviated admin prefixes *found
//!   anywhere* in already-normalized user input into their canonical
//!   full form, so the trie/LCS/edit tiers see e.g. `"thanh pho hcm"`
//!   instead of `"tp hcm"`. The original does this with a regex
//!   cascade; the teacher's dependency stack carries no regex crate,
//!   so this is a token-level scan instead — same ordering guarantee
//!   (province patterns before district before ward, longest specific
//!   forms before the ambiguous single letters), no behavior lost.
//!
//! The dynamic abbreviation dictionary (built once per [`crate::Engine`]
//! from the hierarchy's display names) backs [`expand`], the residue
//! lookup used when stripping alone isn't enough to recover a canonical
//! name.

use compact_str::CompactString;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Province,
    District,
    Ward,
}

/// A single ordered prefix form. Tables are ordered longest-first
/// within a level so a greedy front-match is always correct: "thanh
/// pho" must be tried before "tp" before "t".
#[derive(Debug, Clone, Copy)]
pub struct PrefixPattern {
    pub text: &'static str,
    pub level: Level,
}

macro_rules! patterns {
    ($level:expr, [$($s:literal),+ $(,)?]) => {
        &[$(PrefixPattern { text: $s, level: $level }),+]
    };
}

pub static PROVINCE_PREFIXES: &[PrefixPattern] = patterns!(
    Level::Province,
    [
        "thanh pho truc thuoc trung uong",
        "thanh pho",
        "tinh",
        "tp.",
        "t.",
        "tp",
        "t",
    ]
);

pub static DISTRICT_PREFIXES: &[PrefixPattern] = patterns!(
    Level::District,
    ["thanh pho", "thi xa", "quan", "huyen", "tp.", "tx.", "q.", "h.", "tp", "tx", "q", "h"]
);

pub static WARD_PREFIXES: &[PrefixPattern] =
    patterns!(Level::Ward, ["thi tran", "phuong", "xa", "tt.", "p.", "x.", "tt", "p", "x"]);

fn table_for(level: Level) -> &'static [PrefixPattern] {
    match level {
        Level::Province => PROVINCE_PREFIXES,
        Level::District => DISTRICT_PREFIXES,
        Level::Ward => WARD_PREFIXES,
    }
}

fn byte_is_separator(text: &str, idx: usize) -> bool {
    match text[idx..].chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || c == '.',
    }
}

/// Removes the longest matching admin prefix from the start of `text`,
/// plus one trailing separator. `text` is expected already normalized
/// (lowercase, diacritics folded). Returns the original text unchanged
/// if no prefix matches.
pub fn strip(text: &str, level: Level) -> &str {
    let table = table_for(level);
    for pattern in table {
        if let Some(rest) = text.strip_prefix(pattern.text) {
            if byte_is_separator(text, pattern.text.len()) {
                let rest = rest.trim_start_matches(['.', ' ']);
                return rest;
            }
        }
    }
    text
}

/// A candidate the dynamic abbreviation dictionary can resolve an
/// abbreviation key to.
#[derive(Debug, Clone)]
pub struct AbbrevCandidate {
    pub display_name: CompactString,
    pub level: Level,
}

/// Dynamic abbreviation dictionary (spec §4.3), built once from the
/// hierarchy's display names. A single tagged-variant map replaces the
/// original's scalar-or-list dictionary (spec.md §9 DESIGN NOTES):
/// every key maps to a small list of candidates regardless of whether
/// it turned out ambiguous. `.unambiguous()` is a derived view, not a
/// separate stored map.
#[derive(Debug, Default)]
pub struct AbbreviationDict {
    entries: HashMap<CompactString, SmallVec<[AbbrevCandidate; 2]>>,
}

impl AbbreviationDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the four key-types for one entity's normalized,
    /// space-joined display name (spec §4.3): bare initials, dotted
    /// initials, no-space compaction, and — for ≥3 tokens — first+last.
    /// First insertion for a key wins the unambiguous slot; later
    /// insertions accumulate as ambiguity candidates in insertion order.
    pub fn register(&mut self, normalized_name: &str, display_name: &str, level: Level) {
        let tokens: Vec<&str> = normalized_name.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.len() < 2 {
            return;
        }
        let mut keys: SmallVec<[CompactString; 4]> = SmallVec::new();
        keys.push(tokens.iter().filter_map(|t| t.chars().next()).collect());
        keys.push(
            tokens
                .iter()
                .filter_map(|t| t.chars().next())
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(".")
                .into(),
        );
        keys.push(tokens.concat().into());
        if tokens.len() >= 3 {
            keys.push(format!("{} {}", tokens[0], tokens[tokens.len() - 1]).into());
        }
        for key in keys {
            let candidate = AbbrevCandidate {
                display_name: display_name.into(),
                level,
            };
            self.entries.entry(key).or_default().push(candidate);
        }
    }

    /// Unambiguous lookup: only returns a candidate if exactly one was
    /// ever registered under this key.
    pub fn unambiguous(&self, key: &str) -> Option<&AbbrevCandidate> {
        self.entries.get(key).filter(|v| v.len() == 1).map(|v| &v[0])
    }

    /// Falls back to the first-registered candidate for an ambiguous key.
    pub fn lookup(&self, key: &str) -> Option<&AbbrevCandidate> {
        self.entries.get(key).and_then(|v| v.first())
    }
}

/// Strips a prefix, then resolves the residue through the dynamic
/// abbreviation dictionary if the bare residue isn't already a direct
/// hit — the unambiguous map is checked first, then the ambiguous map.
pub fn expand<'a>(text: &'a str, level: Level, dict: &'a AbbreviationDict) -> Option<&'a str> {
    let residue = strip(text, level);
    if let Some(candidate) = dict.unambiguous(residue) {
        return Some(&candidate.display_name);
    }
    if let Some(candidate) = dict.lookup(residue) {
        return Some(&candidate.display_name);
    }
    None
}

#[derive(Debug, Clone, Copy)]
enum NextKind {
    AlphaMinLen(usize),
    Any,
}

struct ExpansionRule {
    abbrev: &'static str,
    full: &'static [&'static str],
    next: NextKind,
}

/// Ordered province → district → ward, most-specific first, mirroring
/// `original_source/Src/prefix_expander.py`'s `all_patterns` ordering.
static EXPANSION_RULES: &[ExpansionRule] = &[
    // province
    ExpansionRule { abbrev: "tp", full: &["thanh", "pho"], next: NextKind::Any },
    ExpansionRule { abbrev: "t", full: &["tinh"], next: NextKind::AlphaMinLen(3) },
    // district
    ExpansionRule { abbrev: "q", full: &["quan"], next: NextKind::Any },
    ExpansionRule { abbrev: "qu", full: &["quan"], next: NextKind::AlphaMinLen(1) },
    ExpansionRule { abbrev: "h", full: &["huyen"], next: NextKind::Any },
    ExpansionRule { abbrev: "huy", full: &["huyen"], next: NextKind::AlphaMinLen(1) },
    ExpansionRule { abbrev: "tx", full: &["thi", "xa"], next: NextKind::Any },
    // ward
    ExpansionRule { abbrev: "p", full: &["phuong"], next: NextKind::Any },
    ExpansionRule { abbrev: "ph", full: &["phuong"], next: NextKind::AlphaMinLen(1) },
    ExpansionRule { abbrev: "x", full: &["xa"], next: NextKind::Any },
    ExpansionRule { abbrev: "tt", full: &["thi", "tran"], next: NextKind::Any },
];

fn next_kind_matches(kind: NextKind, token: &str) -> bool {
    match kind {
        NextKind::Any => !token.is_empty(),
        NextKind::AlphaMinLen(n) => {
            token.chars().count() >= n && token.chars().all(|c| c.is_alphabetic())
        }
    }
}

/// Expands abbreviated admin prefixes found anywhere in already
/// (aggressively) normalized text, e.g. `"p1 q3 tp hcm"` →
/// `"phuong 1 quan 3 thanh pho hcm"`. Applied by the Three-Tier Parser
/// before tokenizing into the trie scan; additive to matching
/// semantics, not a replacement for it (spec SPEC_FULL §4.3).
pub fn expand_in_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();
    let mut out: Vec<CompactString> = Vec::with_capacity(tokens.len() + 2);
    let mut i = 0;
    'outer: while i < tokens.len() {
        let tok = tokens[i];
        if i + 1 < tokens.len() {
            for rule in EXPANSION_RULES {
                if tok == rule.abbrev && next_kind_matches(rule.next, tokens[i + 1]) {
                    for part in rule.full {
                        out.push((*part).into());
                    }
                    out.push(tokens[i + 1].into());
                    i += 2;
                    continue 'outer;
                }
            }
        }
        out.push(tok.into());
        i += 1;
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_longest_match_first() {
        assert_eq!(strip("thanh pho ha noi", Level::Province), "ha noi");
        assert_eq!(strip("tp.hcm", Level::Province), "hcm");
        assert_eq!(strip("tp ha noi", Level::Province), "ha noi");
        assert_eq!(strip("t tuyen quang", Level::Province), "tuyen quang");
    }

    #[test]
    fn strip_requires_separator() {
        // "tan binh" must not be stripped to "an binh" by a 't' prefix
        // that isn't followed by a separator.
        assert_eq!(strip("tan binh", Level::Province), "tan binh");
    }

    #[test]
    fn dictionary_unambiguous_and_ambiguous() {
        let mut dict = AbbreviationDict::new();
        dict.register("ho chi minh", "Hồ Chí Minh", Level::Province);
        assert_eq!(dict.unambiguous("hcm").unwrap().display_name, "Hồ Chí Minh");
        assert_eq!(dict.unambiguous("ho minh").unwrap().display_name, "Hồ Chí Minh");

        dict.register("ha chau minh", "Hà Châu Minh", Level::District);
        // "hcm" now collides between Hồ Chí Minh and Hà Châu Minh.
        assert!(dict.unambiguous("hcm").is_none());
        assert_eq!(dict.lookup("hcm").unwrap().display_name, "Hồ Chí Minh");
    }

    #[test]
    fn expand_resolves_residue_through_dictionary() {
        let mut dict = AbbreviationDict::new();
        dict.register("ho chi minh", "Hồ Chí Minh", Level::Province);
        assert_eq!(expand("tp.hcm", Level::Province, &dict), Some("Hồ Chí Minh"));
        assert_eq!(expand("tp ho chi minh extended", Level::Province, &dict), None);
    }

    #[test]
    fn expand_in_text_rewrites_abbreviations() {
        assert_eq!(expand_in_text("p1 q3 tp hcm"), "phuong 1 quan 3 thanh pho hcm");
        assert_eq!(
            expand_in_text("h yen son tinh tuyen quang"),
            "huyen yen son tinh tuyen quang"
        );
    }

    #[test]
    fn expand_in_text_leaves_plain_text_alone() {
        assert_eq!(expand_in_text("cau dien nam tu liem ha noi"), "cau dien nam tu liem ha noi");
    }
}
