//! The font facts reported for an inspected element.

use inspect_host::ComputedStyle;
use serde::Serialize;

use crate::weight::{FontStyle, format_weight};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFont {
    pub family: String,
    pub weight_numeric: u16,
    pub weight_label: String,
    pub style: FontStyle,
    pub size_px: f32,
    pub letter_spacing: String,
    pub line_height: String,
}

impl ResolvedFont {
    /// Combine a resolved family with the element's computed style.
    pub fn from_computed(family: String, style: &ComputedStyle) -> Self {
        let weight = format_weight(&style.font_weight);
        Self {
            family,
            weight_numeric: weight.numeric,
            weight_label: weight.label.to_owned(),
            style: FontStyle::parse(&style.font_style),
            size_px: style.font_size_px,
            letter_spacing: style.letter_spacing.clone(),
            line_height: style.line_height.clone(),
        }
    }
}
