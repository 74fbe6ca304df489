//! Alias Generator (spec §4.4).
//!
//! Returns a fixed-capacity `SmallVec` rather than a `HashSet`,
//! following the teacher's `word.rs`/`web_match.rs` preference for
//! small stack-allocated collections over heap sets for short-lived
//! per-name data — at most 7 variants ever exist for one display name.

use compact_str::CompactString;
use smallvec::SmallVec;

pub type AliasSet = SmallVec<[CompactString; 8]>;

/// Generates searchable normalized keys for one display name, given its
/// aggressively-normalized, space-joined tokens. Duplicate variants
/// (common for short names) are removed; generation is deterministic.
pub fn generate(tokens: &[&str]) -> AliasSet {
    let mut out = AliasSet::new();
    let n = tokens.len();
    if n == 0 {
        return out;
    }

    // 1. join-with-spaces
    out.push(tokens.join(" ").into());

    // 2. concatenation
    out.push(tokens.concat().into());

    if n >= 2 {
        let initials: CompactString = tokens.iter().filter_map(|t| t.chars().next()).collect();
        // 3. initials
        out.push(initials.clone());

        // 4. dotted initials
        let dotted = tokens
            .iter()
            .filter_map(|t| t.chars().next())
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        out.push(dotted.into());

        // 6. first-initial + rest, with dot
        let first_initial = tokens[0].chars().next().unwrap();
        let rest = tokens[1..].join(" ");
        out.push(format!("{first_initial}. {rest}").into());

        // 7. first-initial + rest, without dot
        out.push(format!("{first_initial} {rest}").into());
    }

    if n >= 3 {
        // 5. first + last
        out.push(format!("{} {}", tokens[0], tokens[n - 1]).into());
    }

    dedup(&mut out);
    out
}

fn dedup(set: &mut AliasSet) {
    let mut seen: SmallVec<[CompactString; 8]> = SmallVec::new();
    let mut i = 0;
    while i < set.len() {
        if seen.contains(&set[i]) {
            set.remove(i);
        } else {
            seen.push(set[i].clone());
            i += 1;
        }
    }
}
