//! Transient render targets: text probes and single-pixel color surfaces.

use anyhow::Result;

use crate::TextBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// What an invisible text probe renders.
///
/// Only the family list and the size vary; weight, style, letter-spacing and line-height are
/// pinned to neutral values so the measured box depends on the family alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpec {
    pub text: String,
    pub font_size_px: f32,
    /// A complete CSS `font-family` value, already quoted where needed.
    pub font_family: String,
    pub font_weight: u16,
    pub font_style: &'static str,
    pub letter_spacing_px: f32,
    pub line_height: &'static str,
}

impl ProbeSpec {
    pub fn new(text: &str, font_size_px: f32, font_family: String) -> Self {
        Self {
            text: text.to_owned(),
            font_size_px,
            font_family,
            font_weight: 400,
            font_style: "normal",
            letter_spacing_px: 0.0,
            line_height: "normal",
        }
    }
}

pub trait TextRenderer {
    /// Insert an invisible, absolutely positioned text node rendered per `spec`.
    ///
    /// # Errors
    /// Returns an error if the probe cannot be attached to the document.
    fn attach_probe(&self, spec: &ProbeSpec) -> Result<ProbeId>;

    /// Bounding box of an attached probe.
    ///
    /// # Errors
    /// Returns an error if the probe was detached or has no layout.
    fn probe_box(&self, probe: ProbeId) -> Result<TextBox>;

    /// Remove a probe from the document. Unknown ids are ignored.
    fn detach_probe(&self, probe: ProbeId);
}

pub trait ColorSampler {
    /// Create a 1x1 offscreen surface.
    ///
    /// # Errors
    /// Returns an error if the engine cannot allocate a surface.
    fn create_surface(&self) -> Result<SurfaceId>;

    /// Fill the whole surface with `color`, parsed by the engine.
    ///
    /// Unparseable colors leave the previous fill style in effect, as a canvas does.
    ///
    /// # Errors
    /// Returns an error if the surface is unknown.
    fn fill(&self, surface: SurfaceId, color: &str) -> Result<()>;

    /// Read back the single pixel as straight-alpha RGBA bytes.
    ///
    /// # Errors
    /// Returns an error if the surface is unknown.
    fn read_pixel(&self, surface: SurfaceId) -> Result<[u8; 4]>;

    /// Release a surface. Unknown ids are ignored.
    fn release_surface(&self, surface: SurfaceId);
}
