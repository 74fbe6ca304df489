//! Edit-Distance Matcher (spec §4.7).
//!
//! Bounded Levenshtein distance on the joined `"token token ..."`
//! string of both sides, with diagonal-band pruning for an early
//! out — grounded on `original_source/Src/edit_distance_matcher.py`
//! for the algorithm and interface.

pub const DEFAULT_K: usize = 2;

/// Computes a bounded Levenshtein distance between `s` and `t`. Returns
/// `k + 1` (meaning: farther than the threshold, exact value doesn't
/// matter) as soon as the strings provably can't be within `k`, so the
/// DP table is never allocated in the common rejection case.
pub fn bounded_distance(s: &str, t: &str, k: usize) -> usize {
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();
    let (n, m) = (s.len(), t.len());

    if n.abs_diff(m) > k {
        return k + 1;
    }

    let unreachable = k + 1;
    let mut prev = vec![unreachable; m + 1];
    let mut curr = vec![unreachable; m + 1];
    for (j, cell) in prev.iter_mut().enumerate().take(k.min(m) + 1) {
        *cell = j;
    }

    for i in 1..=n {
        curr.iter_mut().for_each(|c| *c = unreachable);
        let lo = i.saturating_sub(k).max(1);
        let hi = (i + k).min(m);
        if i <= k {
            curr[0] = i;
        }
        let mut row_min = curr[0];
        for j in lo..=hi {
            let cost = if s[i - 1] == t[j - 1] { 0 } else { 1 };
            let diagonal = prev[j - 1].saturating_add(cost);
            let deletion = prev[j].saturating_add(1);
            let insertion = curr[j - 1].saturating_add(1);
            curr[j] = diagonal.min(deletion).min(insertion);
            row_min = row_min.min(curr[j]);
        }
        if row_min > k {
            return unreachable;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m].min(unreachable)
}

/// Per-candidate `(edit_distance, normalized_score)`, where the score
/// is `1 - distance / max(|s|, |t|)`.
pub fn score(s: &str, t: &str, k: usize) -> (usize, f64) {
    let distance = bounded_distance(s, t, k);
    let max_len = s.chars().count().max(t.chars().count()).max(1);
    let normalized = if distance > k {
        0.0
    } else {
        1.0 - distance as f64 / max_len as f64
    };
    (distance, normalized)
}

pub struct Candidate<'a> {
    pub display_name: &'a str,
    pub tokens: &'a [&'a str],
}

fn joined(tokens: &[&str]) -> String {
    tokens.join(" ")
}

/// Picks the candidate with the minimum edit distance, subject to `k`.
/// Ties break on the higher normalized score.
pub fn best_match<'a>(
    input_tokens: &[&str],
    candidates: &'a [Candidate<'a>],
    k: usize,
) -> Option<(&'a str, usize, f64)> {
    let joined_input = joined(input_tokens);
    let mut best: Option<(&str, usize, f64)> = None;
    for c in candidates {
        let joined_candidate = joined(c.tokens);
        let (distance, norm) = score(&joined_input, &joined_candidate, k);
        if distance > k {
            continue;
        }
        best = match best {
            None => Some((c.display_name, distance, norm)),
            Some((_, best_d, best_norm))
                if distance < best_d || (distance == best_d && norm > best_norm) =>
            {
                Some((c.display_name, distance, norm))
            }
            other => other,
        };
    }
    best
}
