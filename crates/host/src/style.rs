//! Computed style and stylesheet access.

use anyhow::Result;

use crate::NodeId;

/// The subset of an element's computed style the inspector reads.
///
/// Values are kept in the engine's serialized form (`"700"`, `"italic"`, `"normal"`,
/// `"rgb(0, 0, 0)"`); interpretation is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub font_family: String,
    pub font_size_px: f32,
    pub font_weight: String,
    pub font_style: String,
    pub letter_spacing: String,
    pub line_height: String,
    pub color: String,
    pub display: String,
    pub position: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_family: "serif".to_owned(),
            font_size_px: 16.0,
            font_weight: "400".to_owned(),
            font_style: "normal".to_owned(),
            letter_spacing: "normal".to_owned(),
            line_height: "normal".to_owned(),
            color: "rgb(0, 0, 0)".to_owned(),
            display: "block".to_owned(),
            position: "static".to_owned(),
        }
    }
}

impl ComputedStyle {
    /// Rendered at all: non-zero font size and not `display: none`.
    pub fn is_rendered(&self) -> bool {
        self.font_size_px > 0.0 && !self.display.eq_ignore_ascii_case("none")
    }
}

pub trait StyleReader {
    fn computed_style(&self, node: NodeId) -> Option<ComputedStyle>;

    /// Raw `style` attribute text of an element.
    fn inline_style(&self, node: NodeId) -> Option<String>;

    /// Custom properties (`--*`) visible on `node`, with `var()` references already substituted.
    fn custom_properties(&self, node: NodeId) -> Vec<(String, String)>;

    fn stylesheet_count(&self) -> usize;

    /// Family names declared by `@font-face` rules in one stylesheet.
    ///
    /// # Errors
    /// Returns an error when the sheet's rules are unreadable (cross-origin sheets).
    fn font_face_families(&self, sheet: usize) -> Result<Vec<String>>;
}
