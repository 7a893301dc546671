//! Page-wide font census.
//!
//! Families are collected from `@font-face` rules, the loaded-font registry and a bounded
//! sweep over text-bearing elements, then merged into one entry per family name.

#![forbid(unsafe_code)]

use std::collections::{BTreeSet, HashMap};

use inspect_fonts::{FontAvailabilityOracle, FontFamilyToken, FontStyle, TokenCategory, format_weight};
use inspect_host::{DomView, FontRegistry, NodeId, StyleReader};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    /// Elements visited by the document sweep.
    pub sample_limit: usize,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self { sample_limit: 2_000 }
    }
}

/// Where on the page a family was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContextLabel {
    Heading,
    Paragraph,
    Link,
    Button,
    Form,
    Code,
    List,
    Table,
    /// Any other visible text.
    Text,
    /// Declared by an `@font-face` rule.
    FontFace,
    /// Present in the loaded-font registry.
    Registry,
}

impl ContextLabel {
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Self::Heading,
            "p" | "blockquote" => Self::Paragraph,
            "a" => Self::Link,
            "button" => Self::Button,
            "input" | "select" | "textarea" | "label" | "form" | "option" => Self::Form,
            "code" | "pre" | "kbd" | "samp" => Self::Code,
            "ul" | "ol" | "li" | "dl" | "dt" | "dd" => Self::List,
            "table" | "td" | "th" | "caption" => Self::Table,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontCensusEntry {
    pub name: String,
    pub contexts: BTreeSet<ContextLabel>,
    pub weights: BTreeSet<String>,
    pub styles: BTreeSet<String>,
    pub is_loaded: bool,
}

impl FontCensusEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            contexts: BTreeSet::new(),
            weights: BTreeSet::new(),
            styles: BTreeSet::new(),
            is_loaded: false,
        }
    }
}

/// Entries keyed by lowercase name; the first spelling seen is kept for display.
#[derive(Default)]
struct Tally {
    entries: HashMap<String, FontCensusEntry>,
}

impl Tally {
    fn entry(&mut self, name: &str) -> &mut FontCensusEntry {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| FontCensusEntry::new(name))
    }
}

pub struct PageFontCensus<'session> {
    dom: &'session dyn DomView,
    styles: &'session dyn StyleReader,
    registry: Option<&'session dyn FontRegistry>,
    oracle: &'session FontAvailabilityOracle<'session>,
    config: &'session CensusConfig,
}

impl<'session> PageFontCensus<'session> {
    pub fn new(
        dom: &'session dyn DomView,
        styles: &'session dyn StyleReader,
        registry: Option<&'session dyn FontRegistry>,
        oracle: &'session FontAvailabilityOracle<'session>,
        config: &'session CensusConfig,
    ) -> Self {
        Self {
            dom,
            styles,
            registry,
            oracle,
            config,
        }
    }

    /// One entry per family: loaded first, then by number of contexts, then by name.
    pub fn scan(&self) -> Vec<FontCensusEntry> {
        let mut tally = Tally::default();
        self.collect_font_faces(&mut tally);
        self.collect_registry(&mut tally);
        self.sweep_document(&mut tally);

        let mut entries: Vec<FontCensusEntry> = tally
            .entries
            .into_values()
            .map(|mut entry| {
                // The allowlist alone does not make a face loaded; it must also render.
                entry.is_loaded = self.oracle.is_available(&entry.name)
                    && self.oracle.renders_itself(&entry.name);
                entry
            })
            .collect();
        entries.sort_by(|left, right| {
            right
                .is_loaded
                .cmp(&left.is_loaded)
                .then_with(|| right.contexts.len().cmp(&left.contexts.len()))
                .then_with(|| {
                    left.name
                        .to_ascii_lowercase()
                        .cmp(&right.name.to_ascii_lowercase())
                })
        });
        debug!(target: "font_census", "{} families found", entries.len());
        entries
    }

    fn collect_font_faces(&self, tally: &mut Tally) {
        for sheet in 0..self.styles.stylesheet_count() {
            match self.styles.font_face_families(sheet) {
                Ok(families) => {
                    for family in families {
                        let name = family.trim().trim_matches(['"', '\'']);
                        if !name.is_empty() {
                            tally.entry(name).contexts.insert(ContextLabel::FontFace);
                        }
                    }
                }
                Err(err) => debug!(target: "font_census", "skipping stylesheet {sheet}: {err}"),
            }
        }
    }

    fn collect_registry(&self, tally: &mut Tally) {
        let Some(registry) = self.registry else {
            return;
        };
        match registry.faces() {
            Ok(faces) => {
                for face in faces {
                    let name = face.family.trim();
                    if name.is_empty() {
                        continue;
                    }
                    let entry = tally.entry(name);
                    entry.contexts.insert(ContextLabel::Registry);
                    entry
                        .weights
                        .insert(format_weight(&face.weight).numeric.to_string());
                    entry
                        .styles
                        .insert(FontStyle::parse(&face.style).as_str().to_owned());
                }
            }
            Err(err) => debug!(target: "font_census", "registry unavailable: {err}"),
        }
    }

    fn sweep_document(&self, tally: &mut Tally) {
        for node in self
            .dom
            .all_elements()
            .into_iter()
            .take(self.config.sample_limit)
        {
            if !self.has_direct_text(node) {
                continue;
            }
            let Some(style) = self.styles.computed_style(node) else {
                continue;
            };
            if !style.is_rendered() {
                continue;
            }
            let Some(family) = primary_family(&style.font_family) else {
                continue;
            };
            let context = self
                .dom
                .tag_name(node)
                .map_or(ContextLabel::Text, |tag| ContextLabel::for_tag(&tag));
            trace!(target: "font_census", "{node:?} uses {family:?} as {context:?}");
            let entry = tally.entry(&family);
            entry.contexts.insert(context);
            entry
                .weights
                .insert(format_weight(&style.font_weight).numeric.to_string());
            entry
                .styles
                .insert(FontStyle::parse(&style.font_style).as_str().to_owned());
        }
    }

    fn has_direct_text(&self, node: NodeId) -> bool {
        self.dom.children(node).into_iter().any(|child| {
            self.dom.is_text(child)
                && self
                    .dom
                    .text(child)
                    .is_some_and(|text| !text.trim().is_empty())
        })
    }
}

/// The first concrete name of a `font-family` value, else its first keyword.
fn primary_family(value: &str) -> Option<String> {
    let tokens = FontFamilyToken::parse_list(value);
    tokens
        .iter()
        .find(|token| token.category == TokenCategory::Named)
        .or_else(|| tokens.first())
        .map(|token| token.name.clone())
}
