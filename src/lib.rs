//! Classifies unstructured Vietnamese postal addresses into
//! province/district/ward triples against a caller-supplied
//! administrative hierarchy.
//!
//! The crate is built once per hierarchy via [`Engine::new`] (or
//! [`Engine::with_abbreviation_seeds`]) and then queried many times
//! through [`Engine::classify`], which never fails — malformed or
//! unrecognizable input comes back as an empty, `valid: false`
//! [`ParsedAddress`] rather than an error. Construction is the only
//! place that can fail, and only on a referentially inconsistent
//! hierarchy ([`InitError`]).
//!
//! ```
//! use viet_address_classifier::{DistrictRecord, Engine, ProvinceRecord, WardRecord};
//!
//! let provinces = vec![ProvinceRecord { code: "HN".into(), name: "Hà Nội".into() }];
//! let districts = vec![DistrictRecord {
//!     code: "NTL".into(),
//!     name: "Nam Từ Liêm".into(),
//!     province_code: "HN".into(),
//! }];
//! let wards = vec![WardRecord {
//!     code: "CD".into(),
//!     name: "Cầu Diễn".into(),
//!     district_code: "NTL".into(),
//! }];
//!
//! let engine = Engine::new(&provinces, &districts, &wards).unwrap();
//! let result = engine.classify("Cầu Diễn, Nam Từ Liêm, Hà Nội");
//! assert!(result.valid);
//! assert_eq!(result.province_code.as_deref(), Some("HN"));
//! ```

mod alias;
mod decomposition;
mod edit;
mod error;
mod fold;
mod hierarchy;
mod lcs;
mod normalize;
mod parser;
mod prefix;
mod trie;

pub use error::InitError;
pub use hierarchy::{CandidateEntity, DistrictRecord, ProvinceRecord, WardRecord};
pub use normalize::Mode as NormalizeMode;
pub use parser::{Engine, ParsedAddress, Tier};
pub use prefix::Level;
