use compact_str::CompactString;
use std::fmt;

/// Fatal construction-time failures (spec §7, category 1).
///
/// Each variant names the referential-integrity violation found while
/// building a [`crate::Engine`] from caller-supplied reference data.
/// None of these can occur once an `Engine` exists — the query phase
/// (`Engine::classify`) never returns an error; see spec §7, category 2
/// and 3, which are represented instead by fields on `ParsedAddress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// A district's `province_code` does not name any known province.
    DanglingDistrictParent {
        district_code: CompactString,
        province_code: CompactString,
    },
    /// A ward's `district_code` does not name any known district.
    DanglingWardParent {
        ward_code: CompactString,
        district_code: CompactString,
    },
    /// Two provinces were supplied with the same code.
    DuplicateProvinceCode { code: CompactString },
    /// Two districts were supplied with the same code.
    DuplicateDistrictCode { code: CompactString },
    /// Two wards were supplied with the same code.
    DuplicateWardCode { code: CompactString },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::DanglingDistrictParent {
                district_code,
                province_code,
            } => write!(
                f,
                "district {district_code} references unknown province {province_code}"
            ),
            InitError::DanglingWardParent {
                ward_code,
                district_code,
            } => write!(
                f,
                "ward {ward_code} references unknown district {district_code}"
            ),
            InitError::DuplicateProvinceCode { code } => {
                write!(f, "duplicate province code {code}")
            }
            InitError::DuplicateDistrictCode { code } => {
                write!(f, "duplicate district code {code}")
            }
            InitError::DuplicateWardCode { code } => write!(f, "duplicate ward code {code}"),
        }
    }
}

impl std::error::Error for InitError {}
