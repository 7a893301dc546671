//! Color normalization.
//!
//! A color string is painted into a 1x1 surface by the engine and the pixel is read back, so
//! every spelling the engine accepts normalizes to the same bytes.

#![forbid(unsafe_code)]

use anyhow::Result;
use inspect_host::{ColorSampler, SurfaceId};
use log::debug;
use serde::Serialize;

/// Channel values observed on the sampling surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedColor {
    #[serde(rename = "r")]
    pub red: u8,
    #[serde(rename = "g")]
    pub green: u8,
    #[serde(rename = "b")]
    pub blue: u8,
    #[serde(rename = "a")]
    pub alpha: u8,
}

impl ResolvedColor {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn from_rgba8(channels: [u8; 4]) -> Self {
        Self::new(channels[0], channels[1], channels[2], channels[3])
    }

    pub const fn is_opaque(self) -> bool {
        self.alpha == u8::MAX
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }

    /// `rgb(r, g, b)` when opaque, `rgba(r, g, b, alpha)` with alpha in `0..=1` otherwise.
    pub fn to_rgba_string(self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.red, self.green, self.blue)
        } else {
            let fraction = f32::from(self.alpha) / 255.0;
            let rounded = (fraction * 1000.0).round() / 1000.0;
            format!(
                "rgba({}, {}, {}, {rounded})",
                self.red, self.green, self.blue
            )
        }
    }
}

impl Default for ResolvedColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Releases the sampling surface on every exit path.
struct SurfaceGuard<'host> {
    sampler: &'host dyn ColorSampler,
    surface: SurfaceId,
}

impl<'host> SurfaceGuard<'host> {
    fn create(sampler: &'host dyn ColorSampler) -> Result<Self> {
        Ok(Self {
            sampler,
            surface: sampler.create_surface()?,
        })
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.sampler.release_surface(self.surface);
    }
}

#[derive(Clone, Copy)]
pub struct ColorResolver<'host> {
    sampler: &'host dyn ColorSampler,
}

impl<'host> ColorResolver<'host> {
    pub fn new(sampler: &'host dyn ColorSampler) -> Self {
        Self { sampler }
    }

    /// Normalize `color` through the engine. Never fails; sampling errors yield opaque black.
    pub fn resolve(&self, color: &str) -> ResolvedColor {
        self.sample(color).unwrap_or_else(|err| {
            debug!(target: "color_resolver", "sampling {color:?} failed: {err}");
            ResolvedColor::BLACK
        })
    }

    fn sample(&self, color: &str) -> Result<ResolvedColor> {
        let guard = SurfaceGuard::create(self.sampler)?;
        self.sampler.fill(guard.surface, color)?;
        let pixel = self.sampler.read_pixel(guard.surface)?;
        Ok(ResolvedColor::from_rgba8(pixel))
    }
}
