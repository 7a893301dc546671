use anyhow::{Context as _, Result};
use inspect_census::CensusConfig;
use inspect_fonts::{CascadeConfig, OracleConfig};
use inspect_target::TargetConfig;
use serde::Deserialize;

/// Every tunable, grouped per component. Missing sections and fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub target: TargetConfig,
    pub oracle: OracleConfig,
    pub cascade: CascadeConfig,
    pub census: CensusConfig,
}

impl InspectorConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns an error if `json` is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid inspector configuration")
    }
}
