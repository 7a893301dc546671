//! Font inspector: what font and color is the element under the pointer really rendered with?
//!
//! `Inspector` owns the session lifecycle and is the single entry point a presentation layer
//! talks to. The resolution machinery lives in the component crates:
//! `inspect_target`, `inspect_fonts`, `inspect_color` and `inspect_census`.

#![forbid(unsafe_code)]

mod config;
mod inspector;

pub use config::InspectorConfig;
pub use inspector::{Inspection, Inspector};

pub use inspect_census::{CensusConfig, ContextLabel, FontCensusEntry};
pub use inspect_color::ResolvedColor;
pub use inspect_fonts::{CascadeConfig, EvidenceSource, FontStyle, OracleConfig, ResolvedFont};
pub use inspect_host::{Host, NodeId, ScreenPoint};
pub use inspect_target::{Strategy, TargetConfig};
