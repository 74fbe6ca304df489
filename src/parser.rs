//! Three-Tier Parser orchestrator (spec §4.9).
//!
//! `Engine::classify` is the sole public query entry point, grounded on
//! `original_source/Src/address_parser_v3.py`'s `AddressParser.parse`
//! for the exact tier control flow, masking, and confidence ladder.
//! Tier helpers return `Option`/plain values and are composed with
//! ordinary control flow — no exceptions inside the matching pipeline
//! (spec.md §7).

use crate::edit;
use crate::lcs;
use crate::normalize::{self, Mode};
use crate::prefix::{self, AbbreviationDict, Level};
use crate::trie::TokenTrie;
use compact_str::CompactString;

use crate::hierarchy::HierarchyIndex;

/// Sentinel token substituted into already-matched spans before the
/// next level's scan. Chosen so it cannot occur in any real key: no
/// Vietnamese admin name contains a digit-only token embedded in
/// control characters.
const MASK_TOKEN: &str = "\u{0}masked\u{0}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Trie,
    Lcs,
    Edit,
    None,
}

/// Result of a single classification (spec §3 `ParsedAddress`).
#[derive(Debug, Clone, Default)]
pub struct ParsedAddress {
    pub province_name: Option<CompactString>,
    pub province_code: Option<CompactString>,
    pub district_name: Option<CompactString>,
    pub district_code: Option<CompactString>,
    pub ward_name: Option<CompactString>,
    pub ward_code: Option<CompactString>,
    pub confidence: f64,
    pub tier: Tier,
    pub valid: bool,
}

impl Default for Tier {
    fn default() -> Self {
        Tier::None
    }
}

impl ParsedAddress {
    fn empty() -> Self {
        ParsedAddress::default()
    }
}

/// The fully-built, read-only matching engine (spec §5: constructed
/// once, queried many times, safe from arbitrary parallel threads).
pub struct Engine {
    hierarchy: HierarchyIndex,
    province_trie: TokenTrie,
    district_trie: TokenTrie,
    ward_trie: TokenTrie,
    abbreviations: AbbreviationDict,
}

fn build_trie_and_dict(
    names: Vec<(&str, &str)>,
    level: Level,
    dict: &mut AbbreviationDict,
) -> TokenTrie {
    let mut trie = TokenTrie::new();
    for (display_name, _code) in &names {
        let normalized = normalize::normalize(display_name, Mode::Aggressive);
        for alias in crate::alias::generate(&normalize::tokenize(&normalized)) {
            trie.insert(&alias, display_name);
        }
        dict.register(&normalized, display_name, level);
    }
    trie
}

impl Engine {
    /// Builds a fully-initialized engine from caller-supplied reference
    /// data (spec §6). Fails only on referential-integrity violations
    /// in the hierarchy (spec §7 category 1).
    pub fn new(
        provinces: &[crate::hierarchy::ProvinceRecord],
        districts: &[crate::hierarchy::DistrictRecord],
        wards: &[crate::hierarchy::WardRecord],
    ) -> Result<Self, crate::error::InitError> {
        let hierarchy = HierarchyIndex::build(provinces, districts, wards)?;
        let mut dict = AbbreviationDict::new();

        let province_names = hierarchy.level_display_names(Level::Province);
        let district_names = hierarchy.level_display_names(Level::District);
        let ward_names = hierarchy.level_display_names(Level::Ward);

        let province_trie = build_trie_and_dict(province_names, Level::Province, &mut dict);
        let district_trie = build_trie_and_dict(district_names, Level::District, &mut dict);
        let ward_trie = build_trie_and_dict(ward_names, Level::Ward, &mut dict);

        Ok(Engine { hierarchy, province_trie, district_trie, ward_trie, abbreviations: dict })
    }

    /// As [`Engine::new`], additionally seeding the dynamic abbreviation
    /// dictionary from optional auxiliary name lists (spec §6).
    pub fn with_abbreviation_seeds(
        provinces: &[crate::hierarchy::ProvinceRecord],
        districts: &[crate::hierarchy::DistrictRecord],
        wards: &[crate::hierarchy::WardRecord],
        province_seeds: &[&str],
        district_seeds: &[&str],
        ward_seeds: &[&str],
    ) -> Result<Self, crate::error::InitError> {
        let mut engine = Self::new(provinces, districts, wards)?;
        for (seeds, level) in [
            (province_seeds, Level::Province),
            (district_seeds, Level::District),
            (ward_seeds, Level::Ward),
        ] {
            for name in seeds {
                let normalized = normalize::normalize(name, Mode::Aggressive);
                engine.abbreviations.register(&normalized, name, level);
            }
        }
        Ok(engine)
    }

    /// The sole public query operation. Immutable, non-suspending, safe
    /// to call from arbitrary parallel threads (spec §5).
    pub fn classify(&self, raw: &str) -> ParsedAddress {
        if raw.trim().is_empty() {
            return ParsedAddress::empty();
        }

        let structural = normalize::normalize(raw, Mode::Structural);
        let expanded = prefix::expand_in_text(&normalize::normalize(&structural, Mode::Aggressive));
        let tokens = normalize::tokenize(&expanded);
        if tokens.is_empty() {
            return ParsedAddress::empty();
        }

        let (province, district, ward) = self.run_tier1(&tokens);

        if let Some(province) = province {
            if district.is_some() {
                return assemble(Some(province), district, ward, Tier::Trie, 1.0);
            }

            // Tier 1 found a province but no district: spec §4.9 enters
            // Tier 2 (then Tier 3) constrained to this province alone,
            // rather than re-searching every province from scratch.
            let (district, ward) = self.search_in_province(&tokens, &province.code, MatchStrategy::Lcs);
            if district.is_some() {
                let confidence = if ward.is_some() { 0.7 } else { 0.6 };
                return assemble(Some(province), district, ward, Tier::Lcs, confidence);
            }

            let (district, ward) = self.search_in_province(&tokens, &province.code, MatchStrategy::Edit);
            if district.is_some() {
                let confidence = if ward.is_some() { 0.5 } else { 0.4 };
                return assemble(Some(province), district, ward, Tier::Edit, confidence);
            }

            // Graceful degradation: keep the province-only trie hit.
            return assemble(Some(province), None, None, Tier::Trie, 1.0);
        }

        if let Some((province, district, ward)) = self.search_all_provinces(&tokens, MatchStrategy::Lcs) {
            let confidence = if ward.is_some() { 0.7 } else if district.is_some() { 0.6 } else { 0.5 };
            return assemble(Some(province), district, ward, Tier::Lcs, confidence);
        }

        if let Some((province, district, ward)) = self.search_all_provinces(&tokens, MatchStrategy::Edit) {
            let confidence = if ward.is_some() { 0.5 } else if district.is_some() { 0.4 } else { 0.3 };
            return assemble(Some(province), district, ward, Tier::Edit, confidence);
        }

        ParsedAddress::empty()
    }

    /// Tier 1 (spec §4.9): exact trie scan with hierarchical masking
    /// between levels, resolving codes downward and dropping any level
    /// whose hit fails to resolve under the accumulated parent
    /// constraint.
    fn run_tier1(&self, tokens: &[&str]) -> (Option<LevelHit>, Option<LevelHit>, Option<LevelHit>) {
        let mut masked: Vec<&str> = tokens.to_vec();

        let province_hits = self.province_trie.scan(&masked);
        let province_raw = TokenTrie::best_hit(&province_hits).cloned();
        if let Some(hit) = &province_raw {
            mask_span(&mut masked, hit.start, hit.end);
        }

        let district_hits = self.district_trie.scan(&masked);
        let district_raw = TokenTrie::best_hit(&district_hits).cloned();
        if let Some(hit) = &district_raw {
            mask_span(&mut masked, hit.start, hit.end);
        }

        let ward_hits = self.ward_trie.scan(&masked);
        let ward_raw = TokenTrie::best_hit(&ward_hits).cloned();

        let province = province_raw.and_then(|h| {
            let key = normalize::normalize(&h.display_name, Mode::Aggressive);
            self.hierarchy
                .province_code_for(&key)
                .map(|code| LevelHit { name: h.display_name.to_string(), code: code.to_string() })
        });

        let district = match (&province, district_raw) {
            (Some(p), Some(h)) => {
                let key = normalize::normalize(&h.display_name, Mode::Aggressive);
                self.hierarchy
                    .resolve_district_code(&key, &p.code)
                    .map(|code| LevelHit { name: h.display_name.to_string(), code: code.to_string() })
            }
            _ => None,
        };

        let ward = match (&district, ward_raw) {
            (Some(d), Some(h)) => {
                let key = normalize::normalize(&h.display_name, Mode::Aggressive);
                self.hierarchy
                    .resolve_ward_code(&key, &d.code)
                    .map(|code| LevelHit { name: h.display_name.to_string(), code: code.to_string() })
            }
            _ => None,
        };

        (province, district, ward)
    }

    /// Constrained district-then-ward search within a known province
    /// (used both for Tier 1's province-only fallback and as part of
    /// [`Engine::search_all_provinces`]).
    fn search_in_province(
        &self,
        tokens: &[&str],
        province_code: &str,
        strategy: MatchStrategy,
    ) -> (Option<LevelHit>, Option<LevelHit>) {
        let district_candidates = self.hierarchy.districts_in(province_code);
        let district = match_candidate(tokens, district_candidates, strategy).and_then(|name| {
            let key = normalize::normalize(&name, Mode::Aggressive);
            self.hierarchy
                .resolve_district_code(&key, province_code)
                .map(|code| LevelHit { name, code: code.to_string() })
        });

        let ward = match &district {
            Some(d) => {
                let ward_candidates = self.hierarchy.wards_in(&d.code);
                match_candidate(tokens, ward_candidates, strategy).and_then(|name| {
                    let key = normalize::normalize(&name, Mode::Aggressive);
                    self.hierarchy
                        .resolve_ward_code(&key, &d.code)
                        .map(|code| LevelHit { name, code: code.to_string() })
                })
            }
            None => None,
        };

        (district, ward)
    }

    /// Unconstrained province search (Tier 2/3 entered when Tier 1
    /// found nothing), followed by the same constrained district/ward
    /// cascade used by [`Engine::search_in_province`].
    fn search_all_provinces(
        &self,
        tokens: &[&str],
        strategy: MatchStrategy,
    ) -> Option<(LevelHit, Option<LevelHit>, Option<LevelHit>)> {
        let province_name = self.match_province(tokens, strategy)?;
        let key = normalize::normalize(&province_name, Mode::Aggressive);
        let province_code = self.hierarchy.province_code_for(&key)?.to_string();
        let province = LevelHit { name: province_name, code: province_code };

        let (district, ward) = self.search_in_province(tokens, &province.code, strategy);
        Some((province, district, ward))
    }

    fn match_province(&self, tokens: &[&str], strategy: MatchStrategy) -> Option<String> {
        let names: Vec<(&str, &str)> = self.hierarchy.level_display_names(Level::Province);
        let owned_tokens: Vec<(String, Vec<CompactString>)> = names
            .iter()
            .map(|(name, _)| {
                let normalized = normalize::normalize(name, Mode::Aggressive);
                let toks = normalize::tokenize(&normalized).into_iter().map(CompactString::from).collect();
                (name.to_string(), toks)
            })
            .collect();
        let refs: Vec<Vec<&str>> =
            owned_tokens.iter().map(|(_, t)| t.iter().map(|x| x.as_str()).collect()).collect();

        match strategy {
            MatchStrategy::Lcs => {
                let candidates: Vec<lcs::Candidate> = owned_tokens
                    .iter()
                    .zip(refs.iter())
                    .map(|((name, _), toks)| lcs::Candidate { display_name: name.as_str(), tokens: toks })
                    .collect();
                lcs::best_match(tokens, &candidates, lcs::DEFAULT_THRESHOLD).map(|(name, _)| name.to_string())
            }
            MatchStrategy::Edit => {
                let candidates: Vec<edit::Candidate> = owned_tokens
                    .iter()
                    .zip(refs.iter())
                    .map(|((name, _), toks)| edit::Candidate { display_name: name.as_str(), tokens: toks })
                    .collect();
                edit::best_match(tokens, &candidates, edit::DEFAULT_K).map(|(name, _, _)| name.to_string())
            }
        }
    }

}

#[derive(Debug, Clone, Copy)]
enum MatchStrategy {
    Lcs,
    Edit,
}

/// One resolved level hit: a display name plus its official code.
#[derive(Debug, Clone)]
struct LevelHit {
    name: String,
    code: String,
}

/// Builds the final `ParsedAddress` from resolved level hits. Requires
/// a province; this is the graceful-degradation boundary from spec
/// §4.9 ("Result validation") — a district/ward is only ever included
/// alongside an already-resolved parent, so this function can assume
/// what it's handed is hierarchically consistent and just needs
/// assembling.
fn assemble(
    province: Option<LevelHit>,
    district: Option<LevelHit>,
    ward: Option<LevelHit>,
    tier: Tier,
    confidence: f64,
) -> ParsedAddress {
    let Some(province) = province else {
        return ParsedAddress::empty();
    };
    ParsedAddress {
        province_name: Some(province.name.into()),
        province_code: Some(province.code.into()),
        district_name: district.as_ref().map(|d| d.name.clone().into()),
        district_code: district.as_ref().map(|d| d.code.clone().into()),
        ward_name: ward.as_ref().map(|w| w.name.clone().into()),
        ward_code: ward.map(|w| w.code.into()),
        confidence,
        tier,
        valid: true,
    }
}

fn mask_span(tokens: &mut [&str], start: usize, end: usize) {
    for slot in tokens.iter_mut().take(end).skip(start) {
        *slot = MASK_TOKEN;
    }
}

fn match_candidate(
    tokens: &[&str],
    candidates: &[crate::hierarchy::CandidateEntity],
    strategy: MatchStrategy,
) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    match strategy {
        MatchStrategy::Lcs => {
            let refs: Vec<Vec<&str>> = candidates.iter().map(|c| c.token_refs()).collect();
            let lcs_candidates: Vec<lcs::Candidate> = candidates
                .iter()
                .zip(refs.iter())
                .map(|(c, toks)| lcs::Candidate { display_name: c.display_name.as_str(), tokens: toks })
                .collect();
            lcs::best_match(tokens, &lcs_candidates, lcs::DEFAULT_THRESHOLD).map(|(n, _)| n.to_string())
        }
        MatchStrategy::Edit => {
            let refs: Vec<Vec<&str>> = candidates.iter().map(|c| c.token_refs()).collect();
            let edit_candidates: Vec<edit::Candidate> = candidates
                .iter()
                .zip(refs.iter())
                .map(|(c, toks)| edit::Candidate { display_name: c.display_name.as_str(), tokens: toks })
                .collect();
            edit::best_match(tokens, &edit_candidates, edit::DEFAULT_K).map(|(n, _, _)| n.to_string())
        }
    }
}

fn assert_sync<T: Sync>() {}

#[allow(dead_code)]
fn _engine_is_sync() {
    assert_sync::<Engine>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{DistrictRecord, ProvinceRecord, WardRecord};

    fn fixture() -> Engine {
        let provinces = vec![
            ProvinceRecord { code: "HN".into(), name: "Hà Nội".into() },
            ProvinceRecord { code: "HCM".into(), name: "Hồ Chí Minh".into() },
            ProvinceRecord { code: "TQ".into(), name: "Tuyên Quang".into() },
        ];
        let districts = vec![
            DistrictRecord { code: "NTL".into(), name: "Nam Từ Liêm".into(), province_code: "HN".into() },
            DistrictRecord { code: "TB-HCM".into(), name: "Tân Bình".into(), province_code: "HCM".into() },
            DistrictRecord { code: "YS".into(), name: "Yên Sơn".into(), province_code: "TQ".into() },
        ];
        let wards = vec![
            WardRecord { code: "CD".into(), name: "Cầu Diễn".into(), district_code: "NTL".into() },
            WardRecord { code: "TB-W".into(), name: "Tân Bình".into(), district_code: "TB-HCM".into() },
            WardRecord { code: "TBY".into(), name: "Tân Bình".into(), district_code: "YS".into() },
        ];
        Engine::new(&provinces, &districts, &wards).unwrap()
    }

    #[test]
    fn scenario_full_address_resolves_via_trie() {
        let engine = fixture();
        let result = engine.classify("Cầu Diễn, Nam Từ Liêm, Hà Nội");
        assert_eq!(result.tier, Tier::Trie);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.province_name.as_deref(), Some("Hà Nội"));
        assert_eq!(result.district_name.as_deref(), Some("Nam Từ Liêm"));
        assert_eq!(result.ward_name.as_deref(), Some("Cầu Diễn"));
        assert!(result.valid);
    }

    #[test]
    fn scenario_repeated_name_resolves_valid_triple() {
        let engine = fixture();
        let result = engine.classify("Tân Bình, Tân Bình, Hồ Chí Minh");
        assert_eq!(result.province_name.as_deref(), Some("Hồ Chí Minh"));
        assert_eq!(result.district_code.as_deref(), Some("TB-HCM"));
        assert_eq!(result.ward_code.as_deref(), Some("TB-W"));
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let engine = fixture();
        let result = engine.classify("   ");
        assert!(!result.valid);
        assert_eq!(result.tier, Tier::None);
        assert_eq!(result.confidence, 0.0);
        assert!(result.province_name.is_none());
    }

    #[test]
    fn garbage_input_yields_empty_result() {
        let engine = fixture();
        let result = engine.classify("xyz random garbage");
        assert!(!result.valid);
        assert_eq!(result.tier, Tier::None);
    }

    #[test]
    fn typo_falls_back_to_lcs_tier_not_edit() {
        // "nol" only shares its first token with "noi" as whole-token
        // sequences, so this clears Tier 2's LCS threshold (2*1/4 = 0.5)
        // before Tier 3's edit-distance matcher ever runs (see DESIGN.md's
        // Open Question decisions for the spec.md §8 scenario 5 tension).
        let engine = fixture();
        let result = engine.classify("ha nol");
        assert!(result.valid);
        assert_eq!(result.tier, Tier::Lcs);
        assert_eq!(result.province_name.as_deref(), Some("Hà Nội"));
        assert!(result.district_name.is_none());
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn far_typo_falls_back_to_edit_distance() {
        // Single-character substitution with no shared tokens at all,
        // so Tier 2's LCS similarity is 0 and only Tier 3 can resolve it.
        let engine = fixture();
        let result = engine.classify("haz nzi");
        assert!(result.valid);
        assert_eq!(result.tier, Tier::Edit);
        assert_eq!(result.province_name.as_deref(), Some("Hà Nội"));
    }

    #[test]
    fn engine_is_sync() {
        _engine_is_sync();
    }
}
