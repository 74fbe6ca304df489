//! Text Normalizer (spec §4.2).
//!
//! Two operating modes sharing one pipeline. Lowercasing uses
//! `unicode_case_mapping` directly rather than `str::to_lowercase`,
//! mirroring the teacher's `case.rs` preference for the non-allocating
//! case-mapping tables over the stdlib path. Compact-input boundary
//! detection walks extended grapheme clusters via
//! `unicode_segmentation`, the same word-boundary-awareness the
//! teacher applies in `segment.rs`, so a boundary is never inserted
//! inside a combining sequence. Between lowercasing and folding, a
//! defensive pass (`decomposition::strip_combining_marks`) strips any
//! stray combining mark a non-precomposed input might carry, so
//! `fold::fold_str`'s precomposed-character table always sees what it
//! expects.

use crate::decomposition;
use crate::fold;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Preserves `.`, `,`, `/` — downstream prefix detection depends on them.
    Structural,
    /// Structural, plus `.`, `,`, `/` become spaces and all remaining
    /// punctuation is stripped.
    Aggressive,
}

const CLOSING_PUNCT: &[char] = &[')', ']', '}', '"', '\'', '»', '›'];

fn is_ascii_punct(c: char) -> bool {
    c.is_ascii() && c.is_ascii_punctuation()
}

fn is_extra_unicode_punct(c: char) -> bool {
    matches!(
        c,
        '–' | '—' | '‐' | '‑' | '−' | '‘' | '’' | '“' | '”' | '…' | '·' | '«' | '»' | '‹' | '›'
    )
}

fn is_punct(c: char) -> bool {
    is_ascii_punct(c) || is_extra_unicode_punct(c)
}

/// Approximates Unicode general categories {L, N, Z, P}: letters (already
/// ASCII after folding), digits, whitespace, and punctuation. Everything
/// else (symbols like `™`, `®`, `°`) is dropped.
fn is_lnzp(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c.is_whitespace() || is_punct(c)
}

/// Lowercases via `unicode_case_mapping`'s table, the teacher's
/// `case.rs` `CaseMapping` idiom, rather than `str::to_lowercase`. The
/// table returns `[0, 0]` for characters with no case mapping at all —
/// already-lowercase letters, digits, whitespace, punctuation — and
/// that must fall back to the original char, not disappear: `0` marks
/// an absent mapping slot, never a mapped-to char.
fn lowercase(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            let [x, y] = unicode_case_mapping::to_lowercase(c);
            if x == 0 {
                vec![c]
            } else {
                [x, y]
                    .into_iter()
                    .take_while(|&u| u != 0)
                    .map(|u| char::from_u32(u).unwrap_or(c))
                    .collect::<Vec<_>>()
            }
        })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

fn ensure_space_after_comma(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == ',' {
            if let Some(&next) = chars.peek() {
                if next != ' ' {
                    out.push(' ');
                }
            }
        }
    }
    out
}

/// Compact-input preprocessing: inserts a space at a lowercase/digit →
/// uppercase transition, or between a closing punctuation glyph and an
/// adjacent letter. Applied before mode selection, on the raw string,
/// so case information is still available to detect the transition.
pub fn preprocess_compact(s: &str) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    let mut out = String::with_capacity(s.len() + 8);
    for (i, g) in graphemes.iter().enumerate() {
        if i > 0 {
            let prev_last = graphemes[i - 1].chars().last().unwrap();
            let cur_first = g.chars().next().unwrap();
            let lower_or_digit_to_upper =
                (prev_last.is_lowercase() || prev_last.is_numeric()) && cur_first.is_uppercase();
            let closing_punct_to_letter =
                CLOSING_PUNCT.contains(&prev_last) && cur_first.is_alphabetic();
            if lower_or_digit_to_upper || closing_punct_to_letter {
                out.push(' ');
            }
        }
        out.push_str(g);
    }
    out
}

/// Runs the full normalization pipeline (spec §4.2). Idempotent:
/// `normalize(normalize(x, m), m) == normalize(x, m)`.
pub fn normalize(raw: &str, mode: Mode) -> String {
    let preprocessed = preprocess_compact(raw);
    let lowered = lowercase(&preprocessed);
    // Defensive pass for input that arrives already decomposed (a base
    // letter followed by a combining mark) rather than precomposed; the
    // fold table below only recognizes precomposed Vietnamese chars.
    let decomposed_stripped = decomposition::strip_combining_marks(&lowered);
    let folded = fold::fold_str(&decomposed_stripped);
    let kept: String = folded.chars().filter(|&c| is_lnzp(c)).collect();
    let collapsed = collapse_whitespace(&kept);
    let dehyphenated = collapsed.replace('-', " ");
    let collapsed = collapse_whitespace(&dehyphenated);
    let no_noise: String = collapsed
        .chars()
        .filter(|&c| !(is_punct(c) && !matches!(c, '.' | ',' | '/')))
        .collect();
    let comma_spaced = ensure_space_after_comma(&no_noise);
    let structural = collapse_whitespace(&comma_spaced).trim().to_string();

    match mode {
        Mode::Structural => structural,
        Mode::Aggressive => {
            let no_dots: String = structural
                .chars()
                .map(|c| if matches!(c, '.' | ',' | '/') { ' ' } else { c })
                .collect();
            let collapsed = collapse_whitespace(&no_dots);
            let no_punct: String = collapsed.chars().filter(|&c| !is_punct(c)).collect();
            collapse_whitespace(&no_punct).trim().to_string()
        }
    }
}

/// Splits an already-normalized string on single spaces into tokens.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    if normalized.is_empty() {
        Vec::new()
    } else {
        normalized.split(' ').filter(|t| !t.is_empty()).collect()
    }
}
