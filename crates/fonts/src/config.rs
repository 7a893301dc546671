//! Tunables for the oracle and the cascade.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Sizes the measurement differential is repeated at.
    pub probe_sizes_px: Vec<f32>,
    /// Sizes tried against the registry's `check`.
    pub registry_check_sizes_px: Vec<f32>,
    /// Size used when comparing two renderings for exact equality.
    pub comparison_size_px: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            probe_sizes_px: vec![32.0, 48.0],
            registry_check_sizes_px: vec![16.0, 32.0],
            comparison_size_px: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Ancestor hops walked when collecting declarations.
    pub max_ancestor_hops: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            max_ancestor_hops: 8,
        }
    }
}
