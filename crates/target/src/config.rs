use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Ancestor hops walked when ascending from a node.
    pub max_ancestor_hops: usize,
    /// Nested shadow roots pierced before giving up.
    pub max_pierce_depth: usize,
    /// Farthest a nearest-neighbour match may be from the point.
    pub nearest_radius_px: f32,
    /// Candidates smaller than this score highest for size.
    pub small_area_px: f32,
    pub medium_area_px: f32,
    /// Fraction of the viewport a fixed element must cover to count as an overlay.
    pub overlay_coverage: f32,
    /// Attribute marking the inspector's own UI, which is never a target.
    pub own_ui_attribute: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            max_ancestor_hops: 8,
            max_pierce_depth: 10,
            nearest_radius_px: 200.0,
            small_area_px: 50_000.0,
            medium_area_px: 200_000.0,
            overlay_coverage: 0.9,
            own_ui_attribute: "data-font-inspector".to_owned(),
        }
    }
}
