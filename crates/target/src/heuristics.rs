//! Element predicates shared by the strategies.

use inspect_host::{DomView, NodeId, StyleReader};

use crate::config::TargetConfig;

/// Tags that conventionally carry readable text.
pub const TEXT_TAGS: [&str; 23] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "a", "li", "td", "th", "dt", "dd", "label",
    "button", "span", "em", "strong", "b", "i", "small", "mark", "code",
];

/// Media and embedded content that covers text without carrying any.
pub const MEDIA_TAGS: [&str; 9] = [
    "video", "iframe", "canvas", "svg", "img", "picture", "source", "embed", "object",
];

pub fn is_text_tag(tag: &str) -> bool {
    TEXT_TAGS.contains(&tag)
}

/// Read-only predicates over one document.
pub struct Heuristics<'host> {
    pub dom: &'host dyn DomView,
    pub styles: &'host dyn StyleReader,
    pub config: &'host TargetConfig,
}

impl Heuristics<'_> {
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.dom.tag_name(node)
    }

    /// Nonzero font size and not `display: none`.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.styles
            .computed_style(node)
            .is_some_and(|style| style.is_rendered())
    }

    /// Owns a text node child with non-whitespace content.
    pub fn has_direct_text(&self, node: NodeId) -> bool {
        self.dom.children(node).into_iter().any(|child| self.is_visible_text(child))
    }

    /// Some descendant in the light tree owns text.
    pub fn contains_text(&self, node: NodeId) -> bool {
        let mut pending = self.dom.children(node);
        while let Some(current) = pending.pop() {
            if self.is_visible_text(current) {
                return true;
            }
            pending.extend(self.dom.children(current));
        }
        false
    }

    fn is_visible_text(&self, node: NodeId) -> bool {
        self.dom.is_text(node)
            && self
                .dom
                .text(node)
                .is_some_and(|text| !text.trim().is_empty())
    }

    /// Media content, or a fixed element blanketing the viewport.
    pub fn is_overlay(&self, node: NodeId) -> bool {
        if self
            .tag(node)
            .is_some_and(|tag| MEDIA_TAGS.contains(&tag.as_str()))
        {
            return true;
        }
        let fixed = self
            .styles
            .computed_style(node)
            .is_some_and(|style| style.position == "fixed");
        if !fixed {
            return false;
        }
        let viewport = self.dom.viewport().area();
        self.dom.bounding_rect(node).is_some_and(|rect| {
            viewport > 0.0 && rect.area() >= viewport * self.config.overlay_coverage
        })
    }

    /// Part of the inspector's own UI: the node or a logical ancestor carries the marker.
    pub fn is_own_ui(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self
                .dom
                .attribute(candidate, &self.config.own_ui_attribute)
                .is_some()
            {
                return true;
            }
            current = self.dom.logical_parent(candidate);
        }
        false
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        Some(node) == self.dom.document_element() || Some(node) == self.dom.body()
    }

    /// Acceptable as the final answer of the ascent rule.
    pub fn is_text_target(&self, node: NodeId) -> bool {
        !self.dom.is_text(node)
            && self.is_rendered(node)
            && self.has_direct_text(node)
            && !self.is_overlay(node)
            && !self.is_own_ui(node)
    }
}
