//! Data model and Hierarchy Index (spec §3, §4.8).
//!
//! Record types mirror the `{Code, Name, ProvinceCode}`-shaped JSON
//! arrays spec.md §6 describes via `serde` derives — generalizing the
//! teacher's optional, `ToJson`-only `serialization.rs` feature into a
//! required schema, since here the reference-data shape is load-bearing
//! rather than an export convenience.

use crate::error::InitError;
use crate::normalize::{self, Mode};
use crate::prefix::Level;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvinceRecord {
    pub code: CompactString,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistrictRecord {
    pub code: CompactString,
    pub name: String,
    pub province_code: CompactString,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WardRecord {
    pub code: CompactString,
    pub name: String,
    pub district_code: CompactString,
}

/// One entity usable as an LCS/Edit-Distance candidate: its display
/// name plus pre-tokenized (aggressive-mode) normalized tokens, so the
/// hot matching path never re-normalizes.
#[derive(Debug, Clone)]
pub struct CandidateEntity {
    pub display_name: CompactString,
    pub code: CompactString,
    pub tokens: Vec<CompactString>,
}

impl CandidateEntity {
    pub fn token_refs(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.as_str()).collect()
    }
}

/// Built once from the reference triples (spec §4.8); thereafter
/// entirely read-only.
#[derive(Debug, Default)]
pub struct HierarchyIndex {
    province_name_to_code: HashMap<CompactString, CompactString>,
    district_name_to_codes: HashMap<CompactString, Vec<CompactString>>,
    ward_name_to_codes: HashMap<CompactString, Vec<CompactString>>,

    district_to_province: HashMap<CompactString, CompactString>,
    ward_to_district: HashMap<CompactString, CompactString>,

    province_display: HashMap<CompactString, CompactString>,
    district_display: HashMap<CompactString, CompactString>,
    ward_display: HashMap<CompactString, CompactString>,

    districts_of_province: HashMap<CompactString, Vec<CandidateEntity>>,
    wards_of_district: HashMap<CompactString, Vec<CandidateEntity>>,

    // Insertion-order mirrors of the three `*_display` maps above.
    // `HashMap` iteration order is randomized per-process, which would
    // make trie/alias-dictionary first-insertion-wins tie-breaking
    // (spec §4.5, §4.3) nondeterministic across runs on the same
    // reference data. These preserve the caller-supplied record order
    // instead, so `level_display_names` is reproducible.
    province_order: Vec<(CompactString, CompactString)>,
    district_order: Vec<(CompactString, CompactString)>,
    ward_order: Vec<(CompactString, CompactString)>,
}

fn normalized_key(name: &str) -> CompactString {
    normalize::normalize(name, Mode::Aggressive).into()
}

fn tokens_of(normalized: &str) -> Vec<CompactString> {
    normalize::tokenize(normalized).into_iter().map(CompactString::from).collect()
}

impl HierarchyIndex {
    /// Builds the index, checking referential integrity as it goes.
    /// Returns the first violation found rather than collecting all of
    /// them (spec.md §7 category 1: construction fails fast).
    pub fn build(
        provinces: &[ProvinceRecord],
        districts: &[DistrictRecord],
        wards: &[WardRecord],
    ) -> Result<Self, InitError> {
        let mut idx = HierarchyIndex::default();

        for p in provinces {
            if idx.province_display.contains_key(&p.code) {
                return Err(InitError::DuplicateProvinceCode { code: p.code.clone() });
            }
            idx.province_display.insert(p.code.clone(), p.name.clone().into());
            idx.province_order.push((p.code.clone(), p.name.clone().into()));
            let key = normalized_key(&p.name);
            idx.province_name_to_code.insert(key, p.code.clone());
        }

        for d in districts {
            if !idx.province_display.contains_key(&d.province_code) {
                return Err(InitError::DanglingDistrictParent {
                    district_code: d.code.clone(),
                    province_code: d.province_code.clone(),
                });
            }
            if idx.district_to_province.contains_key(&d.code) {
                return Err(InitError::DuplicateDistrictCode { code: d.code.clone() });
            }
            idx.district_to_province.insert(d.code.clone(), d.province_code.clone());
            idx.district_display.insert(d.code.clone(), d.name.clone().into());
            idx.district_order.push((d.code.clone(), d.name.clone().into()));

            let key = normalized_key(&d.name);
            idx.district_name_to_codes.entry(key.clone()).or_default().push(d.code.clone());

            let normalized = normalize::normalize(&d.name, Mode::Aggressive);
            idx.districts_of_province.entry(d.province_code.clone()).or_default().push(
                CandidateEntity {
                    display_name: d.name.clone().into(),
                    code: d.code.clone(),
                    tokens: tokens_of(&normalized),
                },
            );
        }

        for w in wards {
            if !idx.district_to_province.contains_key(&w.district_code) {
                return Err(InitError::DanglingWardParent {
                    ward_code: w.code.clone(),
                    district_code: w.district_code.clone(),
                });
            }
            if idx.ward_to_district.contains_key(&w.code) {
                return Err(InitError::DuplicateWardCode { code: w.code.clone() });
            }
            idx.ward_to_district.insert(w.code.clone(), w.district_code.clone());
            idx.ward_display.insert(w.code.clone(), w.name.clone().into());
            idx.ward_order.push((w.code.clone(), w.name.clone().into()));

            let key = normalized_key(&w.name);
            idx.ward_name_to_codes.entry(key.clone()).or_default().push(w.code.clone());

            let normalized = normalize::normalize(&w.name, Mode::Aggressive);
            idx.wards_of_district.entry(w.district_code.clone()).or_default().push(
                CandidateEntity {
                    display_name: w.name.clone().into(),
                    code: w.code.clone(),
                    tokens: tokens_of(&normalized),
                },
            );
        }

        Ok(idx)
    }

    pub fn province_display_name(&self, code: &str) -> Option<&str> {
        self.province_display.get(code).map(|s| s.as_str())
    }

    pub fn district_display_name(&self, code: &str) -> Option<&str> {
        self.district_display.get(code).map(|s| s.as_str())
    }

    pub fn ward_display_name(&self, code: &str) -> Option<&str> {
        self.ward_display.get(code).map(|s| s.as_str())
    }

    /// Province names are unique: 1:1 lookup.
    pub fn province_code_for(&self, normalized_name: &str) -> Option<&str> {
        self.province_name_to_code.get(normalized_name).map(|s| s.as_str())
    }

    /// Picks the district code whose parent matches `province_code`.
    pub fn resolve_district_code(
        &self,
        normalized_district_name: &str,
        province_code: &str,
    ) -> Option<&str> {
        let codes = self.district_name_to_codes.get(normalized_district_name)?;
        codes
            .iter()
            .find(|c| self.district_to_province.get(c.as_str()).map(|s| s.as_str()) == Some(province_code))
            .map(|c| c.as_str())
    }

    /// Same, chained: picks the ward code whose parent district in turn
    /// belongs to `province_code`.
    pub fn resolve_ward_code(
        &self,
        normalized_ward_name: &str,
        district_code: &str,
    ) -> Option<&str> {
        let codes = self.ward_name_to_codes.get(normalized_ward_name)?;
        codes
            .iter()
            .find(|c| self.ward_to_district.get(c.as_str()).map(|s| s.as_str()) == Some(district_code))
            .map(|c| c.as_str())
    }

    pub fn is_valid_triple(
        &self,
        ward_code: Option<&str>,
        district_code: Option<&str>,
        province_code: &str,
    ) -> bool {
        if !self.province_display.contains_key(province_code) {
            return false;
        }
        let Some(district_code) = district_code else {
            return ward_code.is_none();
        };
        if self.district_to_province.get(district_code).map(|s| s.as_str()) != Some(province_code) {
            return false;
        }
        match ward_code {
            None => true,
            Some(ward_code) => {
                self.ward_to_district.get(ward_code).map(|s| s.as_str()) == Some(district_code)
            }
        }
    }

    /// Candidate districts for constrained LCS/ED searches.
    pub fn districts_in(&self, province_code: &str) -> &[CandidateEntity] {
        self.districts_of_province.get(province_code).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Candidate wards for constrained LCS/ED searches.
    pub fn wards_in(&self, district_code: &str) -> &[CandidateEntity] {
        self.wards_of_district.get(district_code).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn district_parent(&self, district_code: &str) -> Option<&str> {
        self.district_to_province.get(district_code).map(|s| s.as_str())
    }

    pub fn ward_parent(&self, ward_code: &str) -> Option<&str> {
        self.ward_to_district.get(ward_code).map(|s| s.as_str())
    }

    /// Display names in caller-supplied reference-data order (not
    /// `HashMap` iteration order, which is randomized per-process and
    /// would make the trie's and abbreviation dictionary's
    /// first-insertion-wins tie-breaking nondeterministic across runs).
    pub fn level_display_names(&self, level: Level) -> Vec<(&str, &str)> {
        let order = match level {
            Level::Province => &self.province_order,
            Level::District => &self.district_order,
            Level::Ward => &self.ward_order,
        };
        order.iter().map(|(code, name)| (name.as_str(), code.as_str())).collect()
    }
}
