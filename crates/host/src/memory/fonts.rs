//! Installed fonts, family matching and text metrics for the in-memory engine.

use std::collections::HashMap;

use crate::css::split_family_list;
use crate::{ProbeSpec, TextBox};

/// Per-font glyph advances, as fractions of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Advance of wide glyphs (`m`, `w`, `M`, `W`, `@`).
    pub wide: f32,
    /// Advance of narrow glyphs (`i`, `l`, `j`, `I`, `1`, punctuation).
    pub narrow: f32,
    /// Advance of every other glyph.
    pub regular: f32,
    /// Line box height.
    pub line: f32,
}

impl FontMetrics {
    pub const fn new(wide: f32, narrow: f32, regular: f32, line: f32) -> Self {
        Self {
            wide,
            narrow,
            regular,
            line,
        }
    }

    /// Metrics that differ from those of every other `seed`.
    pub fn distinct(seed: u16) -> Self {
        let step = f32::from(seed);
        Self::new(
            0.013_f32.mul_add(step, 0.8),
            0.007_f32.mul_add(step, 0.25),
            0.011_f32.mul_add(step, 0.5),
            0.017_f32.mul_add(step, 1.1),
        )
    }

    fn advance(&self, glyph: char) -> f32 {
        match glyph {
            'm' | 'w' | 'M' | 'W' | '@' => self.wide,
            'i' | 'l' | 'j' | 'I' | '1' | 't' | 'f' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => {
                self.narrow
            }
            _ => self.regular,
        }
    }

    pub(super) fn measure(&self, text: &str, font_size_px: f32) -> TextBox {
        let em_width: f32 = text.chars().map(|glyph| self.advance(glyph)).sum();
        TextBox::new(em_width * font_size_px, self.line * font_size_px)
    }
}

const GENERIC_KEYWORDS: [&str; 12] = [
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "math",
    "emoji",
    "fangsong",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
];

const SYSTEM_ALIASES: [&str; 3] = ["system-ui", "-apple-system", "blinkmacsystemfont"];

/// Every font the engine can render, plus its generic-family defaults.
#[derive(Debug, Clone)]
pub(super) struct FontBook {
    /// Keyed by lowercase family name.
    installed: HashMap<String, (String, FontMetrics)>,
    /// Loaded web fonts, keyed by lowercase family name.
    web_faces: HashMap<String, FontMetrics>,
    generics: HashMap<String, String>,
    system_ui: String,
    next_seed: u16,
}

impl FontBook {
    pub fn with_defaults() -> Self {
        let mut book = Self {
            installed: HashMap::new(),
            web_faces: HashMap::new(),
            generics: HashMap::new(),
            system_ui: "DejaVu Sans".to_owned(),
            next_seed: 0,
        };
        book.install_generated("DejaVu Serif");
        book.install_generated("DejaVu Sans");
        book.install_generated("DejaVu Sans Mono");
        for (generic, family) in [
            ("serif", "DejaVu Serif"),
            ("sans-serif", "DejaVu Sans"),
            ("monospace", "DejaVu Sans Mono"),
            ("cursive", "DejaVu Serif"),
            ("fantasy", "DejaVu Serif"),
        ] {
            book.generics.insert(generic.to_owned(), family.to_owned());
        }
        book
    }

    pub fn install(&mut self, family: &str, metrics: FontMetrics) {
        self.installed
            .insert(family.to_ascii_lowercase(), (family.to_owned(), metrics));
    }

    /// Install with generated metrics unique within this book.
    pub fn install_generated(&mut self, family: &str) -> FontMetrics {
        let metrics = FontMetrics::distinct(self.next_seed);
        self.next_seed = self.next_seed.wrapping_add(1);
        self.install(family, metrics);
        metrics
    }

    pub fn load_web_face(&mut self, family: &str, metrics: FontMetrics) {
        self.web_faces.insert(family.to_ascii_lowercase(), metrics);
    }

    pub fn set_generic(&mut self, generic: &str, family: &str) {
        self.generics
            .insert(generic.to_ascii_lowercase(), family.to_owned());
    }

    pub fn set_system_ui(&mut self, family: &str) {
        family.clone_into(&mut self.system_ui);
    }

    pub fn has_web_face(&self, family: &str) -> bool {
        self.web_faces.contains_key(&family.to_ascii_lowercase())
    }

    fn named(&self, family: &str) -> Option<FontMetrics> {
        let key = family.to_ascii_lowercase();
        self.web_faces
            .get(&key)
            .copied()
            .or_else(|| self.installed.get(&key).map(|(_, metrics)| *metrics))
    }

    fn generic(&self, keyword: &str) -> Option<FontMetrics> {
        let canonical = match keyword {
            "ui-serif" | "math" | "emoji" | "fangsong" => "serif",
            "ui-sans-serif" | "ui-rounded" => "sans-serif",
            "ui-monospace" => "monospace",
            other => other,
        };
        self.generics
            .get(canonical)
            .and_then(|family| self.named(family))
    }

    /// Metrics of the face the engine would pick for a `font-family` value.
    pub fn resolve(&self, font_family: &str) -> FontMetrics {
        for family in split_family_list(font_family) {
            let lower = family.name.to_ascii_lowercase();
            let found = if family.quoted {
                self.named(&family.name)
            } else if SYSTEM_ALIASES.contains(&lower.as_str()) {
                self.named(&self.system_ui)
            } else if GENERIC_KEYWORDS.contains(&lower.as_str()) {
                self.generic(&lower)
            } else {
                self.named(&family.name)
            };
            if let Some(metrics) = found {
                return metrics;
            }
        }
        self.generic("serif")
            .unwrap_or_else(|| FontMetrics::distinct(u16::MAX))
    }

    pub fn measure(&self, spec: &ProbeSpec) -> TextBox {
        self.resolve(&spec.font_family)
            .measure(&spec.text, spec.font_size_px)
    }
}
