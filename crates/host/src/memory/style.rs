//! Computed style for the in-memory engine: declared values plus inheritance.

use crate::css::{CustomProperties, parse_style_attribute_into_map, resolve_vars_in_value};
use crate::{ComputedStyle, NodeId};

use super::tree::Tree;

const INLINE_TAGS: [&str; 14] = [
    "a", "span", "em", "strong", "b", "i", "u", "small", "mark", "code", "label", "button",
    "img", "svg",
];

/// Declared value for `property` on one element, inline style first.
fn declared_on(tree: &Tree, node: NodeId, property: &str) -> Option<String> {
    let element = tree.element(node)?;
    element
        .inline_style
        .as_deref()
        .map(parse_style_attribute_into_map)
        .and_then(|mut inline| inline.remove(property))
        .or_else(|| element.declared.get(property).cloned())
}

/// Nearest declared value walking logical ancestors.
fn inherited(tree: &Tree, node: NodeId, property: &str) -> Option<String> {
    let mut current = Some(node);
    while let Some(candidate) = current {
        if let Some(value) = declared_on(tree, candidate, property) {
            return Some(value);
        }
        current = tree.logical_parent(candidate);
    }
    None
}

/// Custom properties visible on `node`; nearer declarations shadow farther ones.
pub(super) fn custom_properties(tree: &Tree, node: NodeId) -> CustomProperties {
    let mut properties = CustomProperties::new();
    let mut current = Some(node);
    while let Some(candidate) = current {
        if let Some(element) = tree.element(candidate) {
            let inline = element
                .inline_style
                .as_deref()
                .map(parse_style_attribute_into_map)
                .unwrap_or_default();
            for (name, value) in inline.into_iter().chain(element.declared.clone()) {
                if name.starts_with("--") {
                    properties.entry(name).or_insert(value);
                }
            }
        }
        current = tree.logical_parent(candidate);
    }
    properties
}

fn parse_px(value: &str, parent_px: f32) -> Option<f32> {
    let trimmed = value.trim();
    if let Some(number) = trimmed.strip_suffix("px") {
        return number.trim().parse().ok();
    }
    if let Some(number) = trimmed.strip_suffix("em") {
        return number.trim().parse::<f32>().ok().map(|em| em * parent_px);
    }
    if let Some(number) = trimmed.strip_suffix('%') {
        return number
            .trim()
            .parse::<f32>()
            .ok()
            .map(|percent| percent / 100.0 * parent_px);
    }
    trimmed.parse().ok()
}

fn font_size(tree: &Tree, node: NodeId, properties: &CustomProperties) -> f32 {
    let parent_px = tree
        .logical_parent(node)
        .map_or(16.0, |parent| font_size(tree, parent, properties));
    declared_on(tree, node, "font-size")
        .map(|raw| resolve_vars_in_value(&raw, properties))
        .and_then(|value| parse_px(&value, parent_px))
        .unwrap_or(parent_px)
}

fn computed_weight(value: &str) -> String {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => "400".to_owned(),
        "bold" => "700".to_owned(),
        other => other.to_owned(),
    }
}

pub(super) fn computed_style(tree: &Tree, node: NodeId) -> Option<ComputedStyle> {
    let element = tree.element(node)?;
    let properties = custom_properties(tree, node);
    let resolve = |property: &str| {
        inherited(tree, node, property).map(|raw| resolve_vars_in_value(&raw, &properties))
    };
    let defaults = ComputedStyle::default();
    let default_display = if INLINE_TAGS.contains(&element.tag_name.as_str()) {
        "inline"
    } else {
        "block"
    };
    let own = |property: &str| {
        declared_on(tree, node, property).map(|raw| resolve_vars_in_value(&raw, &properties))
    };
    Some(ComputedStyle {
        font_family: resolve("font-family").unwrap_or(defaults.font_family),
        font_size_px: font_size(tree, node, &properties),
        font_weight: resolve("font-weight").map_or(defaults.font_weight, |raw| computed_weight(&raw)),
        font_style: resolve("font-style").unwrap_or(defaults.font_style),
        letter_spacing: resolve("letter-spacing").unwrap_or(defaults.letter_spacing),
        line_height: resolve("line-height").unwrap_or(defaults.line_height),
        color: resolve("color").unwrap_or(defaults.color),
        display: own("display").unwrap_or_else(|| default_display.to_owned()),
        position: own("position").unwrap_or(defaults.position),
    })
}
