//! Empirical font availability.
//!
//! The engine's own claims are not trusted. A name is available only if one of these proves it,
//! tried in order:
//! 1. the registry's `check` is satisfied for the name
//! 2. a loaded registry entry carries the name
//! 3. measuring the name changes the rendered box against every generic fallback
//! 4. the platform allowlist lists it
//!
//! Verdicts are memoized in an `AvailabilityCache` owned by the inspection session.

use std::cell::RefCell;
use std::collections::HashMap;

use inspect_host::FontRegistry;
use inspect_host::css::serialize_family;
use log::{debug, trace};

use crate::config::OracleConfig;
use crate::measure::TextMeasurer;
use crate::platform::Platform;
use crate::token::{FontFamilyToken, TokenCategory, is_alias_keyword, is_generic_keyword};

const PROBE_FALLBACKS: [&str; 3] = ["serif", "sans-serif", "monospace"];

/// A family name no system will ever have, used to measure a fallback on its own.
const MISSING_FAMILY: &str = "__font_inspector_missing_family__";

/// Session-lifetime memo of oracle results, keyed by lowercase family name.
///
/// Single-threaded by construction: interior mutability lets the oracle stay `&self`.
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    verdicts: RefCell<HashMap<String, bool>>,
    self_rendering: RefCell<HashMap<String, bool>>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verdict(&self, name: &str) -> Option<bool> {
        self.verdicts.borrow().get(&cache_key(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.verdicts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.verdicts.borrow_mut().clear();
        self.self_rendering.borrow_mut().clear();
    }

    fn remember(&self, name: &str, verdict: bool) {
        self.verdicts.borrow_mut().insert(cache_key(name), verdict);
    }
}

fn cache_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

pub struct FontAvailabilityOracle<'session> {
    measurer: TextMeasurer<'session>,
    registry: Option<&'session dyn FontRegistry>,
    platform: Platform,
    config: &'session OracleConfig,
    cache: &'session AvailabilityCache,
}

impl<'session> FontAvailabilityOracle<'session> {
    pub fn new(
        measurer: TextMeasurer<'session>,
        registry: Option<&'session dyn FontRegistry>,
        platform: Platform,
        config: &'session OracleConfig,
        cache: &'session AvailabilityCache,
    ) -> Self {
        Self {
            measurer,
            registry,
            platform,
            config,
            cache,
        }
    }

    pub fn measurer(&self) -> TextMeasurer<'session> {
        self.measurer
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &OracleConfig {
        self.config
    }

    /// Whether `name` is actually available to the engine. Stable for the session.
    ///
    /// A bare name spelled like a generic or alias keyword is taken as that keyword.
    pub fn is_available(&self, name: &str) -> bool {
        let trimmed = name.trim();
        if is_generic_keyword(trimmed) || is_alias_keyword(trimmed) {
            return true;
        }
        self.is_named_available(trimmed)
    }

    /// Like `is_available`, but honors the token's category: a quoted `"serif"` is a concrete
    /// family name and must be proven like any other.
    pub fn is_available_token(&self, token: &FontFamilyToken) -> bool {
        match token.category {
            TokenCategory::Alias | TokenCategory::Generic => true,
            TokenCategory::Named => self.is_named_available(token.name.trim()),
        }
    }

    fn is_named_available(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        if let Some(verdict) = self.cache.verdict(name) {
            return verdict;
        }
        let verdict = self.registry_check(name)
            || self.registry_enumeration(name)
            || self.measurement_differential(name)
            || self.platform.is_known_font(name);
        debug!(target: "font_oracle", "{name:?} available: {verdict}");
        self.cache.remember(name, verdict);
        verdict
    }

    fn registry_check(&self, name: &str) -> bool {
        let Some(registry) = self.registry else {
            return false;
        };
        let quoted = serialize_family(name, false);
        let mut queries: Vec<String> = self
            .config
            .registry_check_sizes_px
            .iter()
            .map(|size| format!("{size}px {quoted}"))
            .collect();
        if let Some(size) = self.config.registry_check_sizes_px.first() {
            queries.push(format!("bold {size}px {quoted}"));
        }
        queries.iter().any(|query| match registry.check(query) {
            Ok(satisfied) => satisfied,
            Err(err) => {
                debug!(target: "font_oracle", "registry check {query:?} failed: {err}");
                false
            }
        })
    }

    fn registry_enumeration(&self, name: &str) -> bool {
        let Some(registry) = self.registry else {
            return false;
        };
        match registry.faces() {
            Ok(faces) => faces
                .iter()
                .any(|face| face.is_loaded() && face.family.trim().eq_ignore_ascii_case(name)),
            Err(err) => {
                debug!(target: "font_oracle", "registry enumeration failed: {err}");
                false
            }
        }
    }

    /// Available only if the name changes the rendered box for every fallback and size.
    fn measurement_differential(&self, name: &str) -> bool {
        let candidate = serialize_family(name, false);
        let missing = serialize_family(MISSING_FAMILY, false);
        for size in &self.config.probe_sizes_px {
            for fallback in PROBE_FALLBACKS {
                let measured = self
                    .measurer
                    .measure_references(*size, &missing, fallback)
                    .and_then(|baseline| {
                        let probe = self.measurer.measure_references(*size, &candidate, fallback)?;
                        Ok(baseline != probe)
                    });
                match measured {
                    Ok(true) => {}
                    Ok(false) => {
                        trace!(target: "font_oracle", "{name:?} matches {fallback} at {size}px");
                        return false;
                    }
                    Err(err) => {
                        debug!(target: "font_oracle", "measuring {name:?} failed: {err}");
                        return false;
                    }
                }
            }
        }
        !self.config.probe_sizes_px.is_empty()
    }

    /// Whether `name` renders as itself rather than as whatever fallback follows it.
    ///
    /// A present font measures the same behind `serif` and `monospace`; a missing one takes
    /// on each fallback's metrics. Memoized alongside the availability verdicts.
    pub fn renders_itself(&self, name: &str) -> bool {
        let trimmed = name.trim();
        if is_generic_keyword(trimmed) || is_alias_keyword(trimmed) {
            return true;
        }
        let key = cache_key(trimmed);
        if let Some(known) = self.cache.self_rendering.borrow().get(&key) {
            return *known;
        }
        let family = serialize_family(trimmed, false);
        let size = self.config.comparison_size_px;
        let compared = self
            .measurer
            .measure_references(size, &family, "serif")
            .and_then(|behind_serif| {
                let behind_mono = self.measurer.measure_references(size, &family, "monospace")?;
                Ok(behind_serif == behind_mono)
            });
        match compared {
            Ok(itself) => {
                self.cache.self_rendering.borrow_mut().insert(key, itself);
                itself
            }
            Err(err) => {
                debug!(target: "font_oracle", "self-rendering check for {trimmed:?} failed: {err}");
                false
            }
        }
    }
}
