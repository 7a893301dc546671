//! The engine's loaded-font registry.

use anyhow::Result;

/// Load state of a registered font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStatus {
    Unloaded,
    Loading,
    Loaded,
    Error,
}

/// One entry of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// Family name with any quotes removed.
    pub family: String,
    pub weight: String,
    pub style: String,
    pub status: FaceStatus,
}

impl FontFace {
    pub fn is_loaded(&self) -> bool {
        self.status == FaceStatus::Loaded
    }
}

pub trait FontRegistry {
    /// Whether a font shorthand such as `16px "Inter"` is satisfied by the registry.
    ///
    /// # Errors
    /// Returns an error when the engine rejects the query (for example a malformed shorthand).
    fn check(&self, font: &str) -> Result<bool>;

    /// Every registered face.
    ///
    /// # Errors
    /// Returns an error if the registry cannot be enumerated.
    fn faces(&self) -> Result<Vec<FontFace>>;
}
