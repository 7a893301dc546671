//! Family tokens and the deduplicated fallback chain.

use std::collections::HashSet;

use inspect_host::css::{FamilyName, serialize_family, split_family_list};
use serde::Serialize;

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

/// Keywords standing for "this OS's default UI font".
const ALIAS_KEYWORDS: [&str; 3] = ["system-ui", "-apple-system", "blinkmacsystemfont"];

/// CSS-wide keywords are never family names.
const WIDE_KEYWORDS: [&str; 5] = ["inherit", "initial", "unset", "revert", "revert-layer"];

pub fn is_generic_keyword(name: &str) -> bool {
    GENERIC_KEYWORDS.contains(&name.trim().to_ascii_lowercase().as_str())
}

pub fn is_alias_keyword(name: &str) -> bool {
    ALIAS_KEYWORDS.contains(&name.trim().to_ascii_lowercase().as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenCategory {
    /// Engine-internal system font keyword.
    Alias,
    /// CSS generic family keyword.
    Generic,
    /// A concrete font name.
    Named,
}

/// A normalized family name and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFamilyToken {
    pub name: String,
    pub category: TokenCategory,
}

impl FontFamilyToken {
    /// Categorize one list entry. Quoted entries are always `Named`.
    pub fn classify(family: &FamilyName) -> Self {
        let category = if family.quoted {
            TokenCategory::Named
        } else if is_alias_keyword(&family.name) {
            TokenCategory::Alias
        } else if is_generic_keyword(&family.name) {
            TokenCategory::Generic
        } else {
            TokenCategory::Named
        };
        Self {
            name: family.name.clone(),
            category,
        }
    }

    /// Tokens of a `font-family` value, in order, without CSS-wide keywords.
    pub fn parse_list(value: &str) -> Vec<Self> {
        split_family_list(value)
            .iter()
            .filter(|family| {
                family.quoted || !WIDE_KEYWORDS.contains(&family.name.to_ascii_lowercase().as_str())
            })
            .map(Self::classify)
            .collect()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            category: TokenCategory::Named,
        }
    }

    /// Deduplication key.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Serialization for a `font-family` declaration.
    pub fn to_css(&self) -> String {
        serialize_family(&self.name, self.category != TokenCategory::Named)
    }
}

/// Ordered family candidates, deduplicated by lowercase name; the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct FamilyChain {
    tokens: Vec<FontFamilyToken>,
    seen: HashSet<String>,
}

impl FamilyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token unless its name is already present. Returns whether it was added.
    pub fn push(&mut self, token: FontFamilyToken) -> bool {
        if self.seen.insert(token.key()) {
            self.tokens.push(token);
            true
        } else {
            false
        }
    }

    /// Append every token of a `font-family` value.
    pub fn extend_from_declaration(&mut self, value: &str) {
        for token in FontFamilyToken::parse_list(value) {
            self.push(token);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(&name.trim().to_ascii_lowercase())
    }

    pub fn first_of(&self, category: TokenCategory) -> Option<&FontFamilyToken> {
        self.tokens.iter().find(|token| token.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontFamilyToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
