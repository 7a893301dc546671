//! Family resolution: from an element to the one family the engine really rendered.
//!
//! The declared `font-family` chain is the primary evidence. When no concrete name in it is
//! available, the search widens to font custom properties, inline styles, the loaded-font
//! registry and `@font-face` rules. Whatever is chosen is then checked against the platform's
//! system fonts to catch names that are silently falling back.

use inspect_host::css::{parse_style_attribute_into_map, serialize_family, split_family_list};
use inspect_host::{DomView, FontRegistry, NodeId, StyleReader};
use log::{debug, trace};
use serde::Serialize;

use crate::config::CascadeConfig;
use crate::oracle::FontAvailabilityOracle;
use crate::token::{FamilyChain, FontFamilyToken, TokenCategory};

/// Where the reported family came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EvidenceSource {
    ComputedChain,
    CustomProperty,
    InlineStyle,
    FontRegistry,
    FontFaceRule,
    /// The declared name was falling back to a system font.
    SystemFallback,
    /// An alias keyword unmasked to the platform UI font.
    AliasUnmasked,
    GenericKeyword,
    DefaultLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyResolution {
    pub family: String,
    pub source: EvidenceSource,
}

impl FamilyResolution {
    fn new(family: impl Into<String>, source: EvidenceSource) -> Self {
        Self {
            family: family.into(),
            source,
        }
    }
}

pub struct FamilyResolutionCascade<'session> {
    dom: &'session dyn DomView,
    styles: &'session dyn StyleReader,
    registry: Option<&'session dyn FontRegistry>,
    oracle: &'session FontAvailabilityOracle<'session>,
    config: &'session CascadeConfig,
}

impl<'session> FamilyResolutionCascade<'session> {
    pub fn new(
        dom: &'session dyn DomView,
        styles: &'session dyn StyleReader,
        registry: Option<&'session dyn FontRegistry>,
        oracle: &'session FontAvailabilityOracle<'session>,
        config: &'session CascadeConfig,
    ) -> Self {
        Self {
            dom,
            styles,
            registry,
            oracle,
            config,
        }
    }

    /// The concrete family name the engine rendered `start` with.
    pub fn resolve(&self, start: NodeId) -> String {
        self.resolve_detailed(start).family
    }

    pub fn resolve_detailed(&self, start: NodeId) -> FamilyResolution {
        let chain = self.build_chain(start);
        trace!(target: "font_cascade", "chain for {start:?}: {chain:?}");

        let mut first_alias: Option<&FontFamilyToken> = None;
        let mut first_generic: Option<&FontFamilyToken> = None;
        let mut chosen: Option<FamilyResolution> = None;
        for token in chain.iter() {
            match token.category {
                TokenCategory::Alias => {
                    first_alias.get_or_insert(token);
                }
                TokenCategory::Generic => {
                    first_generic.get_or_insert(token);
                }
                TokenCategory::Named => {
                    if chosen.is_none() && self.oracle.is_available_token(token) {
                        chosen = Some(FamilyResolution::new(
                            token.name.clone(),
                            EvidenceSource::ComputedChain,
                        ));
                    }
                }
            }
        }

        let chosen = chosen
            .or_else(|| self.from_custom_properties(start))
            .or_else(|| self.from_inline_styles(start))
            .or_else(|| self.from_registry(&chain))
            .or_else(|| self.from_font_face_rules(&chain));

        // Every evidence source yields a concrete name; alias keywords only unmask below.
        if let Some(resolution) = chosen {
            if resolution.source == EvidenceSource::FontRegistry {
                return resolution;
            }
            return self
                .reality_check(&resolution.family)
                .unwrap_or(resolution);
        }

        if let Some(alias) = first_alias {
            return self.unmask_alias(&alias.name);
        }
        if let Some(generic) = first_generic {
            return FamilyResolution::new(generic.name.clone(), EvidenceSource::GenericKeyword);
        }
        FamilyResolution::new(
            self.oracle.platform().ui_label(),
            EvidenceSource::DefaultLabel,
        )
    }

    /// Logical ancestors of `start`, itself included, bounded by the hop limit.
    fn ancestors(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = vec![start];
        let mut current = start;
        for _ in 0..self.config.max_ancestor_hops {
            let Some(parent) = self.dom.logical_parent(current) else {
                break;
            };
            out.push(parent);
            current = parent;
        }
        out
    }

    fn build_chain(&self, start: NodeId) -> FamilyChain {
        let mut chain = FamilyChain::new();
        let roots = [self.dom.document_element(), self.dom.body()];
        for node in self.ancestors(start).into_iter().chain(roots.into_iter().flatten()) {
            if let Some(style) = self.styles.computed_style(node) {
                chain.extend_from_declaration(&style.font_family);
            }
        }
        chain
    }

    fn first_available_named(&self, value: &str) -> Option<String> {
        FontFamilyToken::parse_list(value)
            .into_iter()
            .find(|token| {
                token.category == TokenCategory::Named && self.oracle.is_available_token(token)
            })
            .map(|token| token.name)
    }

    fn from_custom_properties(&self, start: NodeId) -> Option<FamilyResolution> {
        let mut scopes = vec![start];
        scopes.extend(self.dom.document_element());
        scopes.into_iter().find_map(|node| {
            self.styles
                .custom_properties(node)
                .into_iter()
                .filter(|(name, _)| is_font_variable(name))
                .find_map(|(name, value)| {
                    let found = self.first_available_named(&value)?;
                    debug!(target: "font_cascade", "resolved via custom property {name}");
                    Some(FamilyResolution::new(found, EvidenceSource::CustomProperty))
                })
        })
    }

    fn from_inline_styles(&self, start: NodeId) -> Option<FamilyResolution> {
        self.ancestors(start).into_iter().find_map(|node| {
            let inline = self.styles.inline_style(node)?;
            let declarations = parse_style_attribute_into_map(&inline);
            let family_value = declarations
                .get("font-family")
                .cloned()
                .or_else(|| declarations.get("font").map(|font| shorthand_family(font)))?;
            self.first_available_named(&family_value)
                .map(|found| FamilyResolution::new(found, EvidenceSource::InlineStyle))
        })
    }

    fn from_registry(&self, chain: &FamilyChain) -> Option<FamilyResolution> {
        let registry = self.registry?;
        let faces = match registry.faces() {
            Ok(faces) => faces,
            Err(err) => {
                debug!(target: "font_cascade", "registry unavailable: {err}");
                return None;
            }
        };
        let loaded: Vec<String> = faces
            .into_iter()
            .filter(|face| face.is_loaded())
            .map(|face| face.family.trim().to_owned())
            .collect();
        self.prefer_declared(&loaded, chain)
            .map(|found| FamilyResolution::new(found, EvidenceSource::FontRegistry))
    }

    fn from_font_face_rules(&self, chain: &FamilyChain) -> Option<FamilyResolution> {
        let mut families = Vec::new();
        for sheet in 0..self.styles.stylesheet_count() {
            match self.styles.font_face_families(sheet) {
                Ok(declared) => families.extend(declared),
                Err(err) => debug!(target: "font_cascade", "skipping stylesheet {sheet}: {err}"),
            }
        }
        self.prefer_declared(&families, chain)
            .map(|found| FamilyResolution::new(found, EvidenceSource::FontFaceRule))
    }

    /// A name declared in the chain if any is available, else any available name.
    ///
    /// Registry and `@font-face` families are concrete names whatever they are spelled like.
    fn prefer_declared(&self, names: &[String], chain: &FamilyChain) -> Option<String> {
        let available =
            |name: &&String| self.oracle.is_available_token(&FontFamilyToken::named(name));
        names
            .iter()
            .filter(|name| chain.contains(name))
            .find(available)
            .or_else(|| names.iter().find(available))
            .cloned()
    }

    /// Whether rendering `family, fallback_a` is metric-identical to `other, fallback_b`.
    fn same_rendering(&self, left: (&str, &str), right: (&str, &str)) -> bool {
        let size = self.oracle.config().comparison_size_px;
        let measurer = self.oracle.measurer();
        let compared = measurer
            .measure_references(size, left.0, left.1)
            .and_then(|left_boxes| {
                let right_boxes = measurer.measure_references(size, right.0, right.1)?;
                Ok(left_boxes == right_boxes)
            });
        compared.unwrap_or_else(|err| {
            debug!(target: "font_cascade", "comparison failed: {err}");
            false
        })
    }

    /// Report the system font a declared-but-missing family is really rendering as.
    fn reality_check(&self, chosen: &str) -> Option<FamilyResolution> {
        let chosen_css = serialize_family(chosen, false);
        self.oracle
            .platform()
            .fallback_candidates()
            .iter()
            .filter(|candidate| !candidate.eq_ignore_ascii_case(chosen))
            .filter(|candidate| self.oracle.renders_itself(candidate))
            .find(|candidate| {
                let candidate_css = serialize_family(candidate, false);
                self.same_rendering(
                    (chosen_css.as_str(), candidate_css.as_str()),
                    (candidate_css.as_str(), "sans-serif"),
                )
            })
            .map(|candidate| {
                debug!(target: "font_cascade", "{chosen:?} is falling back to {candidate:?}");
                FamilyResolution::new(*candidate, EvidenceSource::SystemFallback)
            })
    }

    /// Map a system-font alias keyword to the platform font it renders as.
    fn unmask_alias(&self, alias: &str) -> FamilyResolution {
        let platform = self.oracle.platform();
        let alias_css = serialize_family(alias, true);
        let mut candidates: Vec<&str> = platform.ui_font_candidates().to_vec();
        for candidate in platform.fallback_candidates() {
            if !candidates.contains(candidate) {
                candidates.push(candidate);
            }
        }
        candidates
            .into_iter()
            .filter(|candidate| self.oracle.renders_itself(candidate))
            .find(|candidate| {
                let candidate_css = serialize_family(candidate, false);
                self.same_rendering(
                    (alias_css.as_str(), candidate_css.as_str()),
                    (candidate_css.as_str(), "sans-serif"),
                )
            })
            .map_or_else(
                || FamilyResolution::new(platform.ui_label(), EvidenceSource::AliasUnmasked),
                |candidate| FamilyResolution::new(candidate, EvidenceSource::AliasUnmasked),
            )
    }
}

/// Conventional names for font custom properties (`--brand-font`, `--body-font-family`).
fn is_font_variable(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("--")
        && (lower.ends_with("-font") || lower.ends_with("-family") || lower.contains("font-family"))
}

/// Family part of a `font` shorthand: everything after the size token.
fn shorthand_family(font: &str) -> String {
    let words: Vec<&str> = font.split_whitespace().collect();
    let size_index = words.iter().position(|word| {
        word.chars().next().is_some_and(|first| first.is_ascii_digit())
            && (word.contains("px")
                || word.contains("em")
                || word.contains("pt")
                || word.contains('%'))
    });
    let family = size_index.map_or_else(
        || font.to_owned(),
        |index| words.get(index + 1..).unwrap_or_default().join(" "),
    );
    split_family_list(&family)
        .into_iter()
        .map(|entry| serialize_family(&entry.name, !entry.quoted))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_variables_follow_naming_conventions() {
        assert!(is_font_variable("--brand-font"));
        assert!(is_font_variable("--body-font-family"));
        assert!(is_font_variable("--heading-family"));
        assert!(!is_font_variable("--font-size"));
        assert!(!is_font_variable("brand-font"));
    }

    #[test]
    fn shorthand_family_skips_style_and_size() {
        assert_eq!(
            shorthand_family("italic bold 14px/1.4 \"Fira Sans\", sans-serif"),
            "\"Fira Sans\", sans-serif"
        );
        assert_eq!(shorthand_family("Georgia"), "Georgia");
    }
}
