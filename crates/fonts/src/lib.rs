//! Font resolution: which family the engine actually rendered an element with.
//!
//! - `TextMeasurer`: renders reference strings in a candidate family and reports the box
//! - `FontAvailabilityOracle`: proves whether a named font is really available, memoized
//! - `FamilyResolutionCascade`: walks the fallback chain and other evidence to the real family
//! - `format_weight` / `ResolvedFont`: the remaining font facts reported for an element

#![forbid(unsafe_code)]

mod cascade;
mod config;
mod measure;
mod oracle;
mod platform;
mod resolved;
mod token;
mod weight;

pub use cascade::{EvidenceSource, FamilyResolution, FamilyResolutionCascade};
pub use config::{CascadeConfig, OracleConfig};
pub use measure::{NARROW_REFERENCE, TextMeasurer, WIDE_REFERENCE};
pub use oracle::{AvailabilityCache, FontAvailabilityOracle};
pub use platform::Platform;
pub use resolved::ResolvedFont;
pub use token::{FamilyChain, FontFamilyToken, TokenCategory, is_alias_keyword, is_generic_keyword};
pub use weight::{FontStyle, FontWeight, format_weight};
