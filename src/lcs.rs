//! LCS Matcher (spec §4.6).
//!
//! Token-sequence longest-common-subsequence similarity over a
//! candidate list, grounded on `original_source/Src/lcs_matcher.py`
//! for the algorithm and interface (plain Rust internals; the teacher
//! carries no LCS/DP dependency to reuse).

pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Length of the longest common subsequence of two token sequences,
/// via the standard O(|a|·|b|) DP with a two-row rolling buffer.
fn lcs_length(a: &[&str], b: &[&str]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ta in a {
        for (j, &tb) in b.iter().enumerate() {
            curr[j + 1] = if ta == tb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

pub fn similarity(input_tokens: &[&str], candidate_tokens: &[&str]) -> f64 {
    let total = input_tokens.len() + candidate_tokens.len();
    if total == 0 {
        return 0.0;
    }
    let lcs = lcs_length(input_tokens, candidate_tokens);
    2.0 * lcs as f64 / total as f64
}

/// One candidate to match against: a display name plus its
/// pre-tokenized normalized form.
pub struct Candidate<'a> {
    pub display_name: &'a str,
    pub tokens: &'a [&'a str],
}

/// Picks the candidate with the highest similarity, subject to
/// `threshold`. Ties break on the shortest candidate (prefer
/// more-specific matches).
pub fn best_match<'a>(
    input_tokens: &[&str],
    candidates: &'a [Candidate<'a>],
    threshold: f64,
) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64, usize)> = None;
    for c in candidates {
        let score = similarity(input_tokens, c.tokens);
        if score < threshold {
            continue;
        }
        let len = c.tokens.len();
        best = match best {
            None => Some((c.display_name, score, len)),
            Some((_, best_score, best_len))
                if score > best_score || (score == best_score && len < best_len) =>
            {
                Some((c.display_name, score, len))
            }
            other => other,
        };
    }
    best.map(|(name, score, _)| (name, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_score_one() {
        let a = vec!["ha", "noi"];
        assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn disjoint_sequences_score_zero() {
        let a = vec!["ha", "noi"];
        let b = vec!["sai", "gon"];
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn best_match_prefers_higher_score() {
        let input = vec!["ha", "nol"];
        let candidates = vec![
            Candidate { display_name: "Hà Nội", tokens: &["ha", "noi"] },
            Candidate { display_name: "Hà Giang", tokens: &["ha", "giang"] },
        ];
        let (name, _) = best_match(&input, &candidates, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(name, "Hà Nội");
    }

    #[test]
    fn best_match_ties_prefer_shortest_candidate() {
        let input = vec!["tan", "binh"];
        let candidates = vec![
            Candidate { display_name: "Tân Bình Extended", tokens: &["tan", "binh", "extended"] },
            Candidate { display_name: "Tân Bình", tokens: &["tan", "binh"] },
        ];
        let (name, _) = best_match(&input, &candidates, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(name, "Tân Bình");
    }

    #[test]
    fn below_threshold_returns_none() {
        let input = vec!["xyz"];
        let candidates = vec![Candidate { display_name: "Hà Nội", tokens: &["ha", "noi"] }];
        assert!(best_match(&input, &candidates, DEFAULT_THRESHOLD).is_none());
    }
}
