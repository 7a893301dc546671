//! Invisible text measurement with only the family varying.

use anyhow::Result;
use inspect_host::{ProbeId, ProbeSpec, TextBox, TextRenderer};

/// Reference string dominated by wide glyphs.
pub const WIDE_REFERENCE: &str = "mmmmmmmmmmwwwwwwwwwwMWMW@@";
/// Reference string dominated by narrow glyphs.
pub const NARROW_REFERENCE: &str = "iiiiiiiiiilllllllllljjjjjIII111";

/// Detaches the probe on every exit path.
struct ProbeGuard<'host> {
    renderer: &'host dyn TextRenderer,
    probe: ProbeId,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.renderer.detach_probe(self.probe);
    }
}

#[derive(Clone, Copy)]
pub struct TextMeasurer<'host> {
    renderer: &'host dyn TextRenderer,
}

impl<'host> TextMeasurer<'host> {
    pub fn new(renderer: &'host dyn TextRenderer) -> Self {
        Self { renderer }
    }

    /// Render `text` with `font-family: <family>, <fallback>` and return its box.
    ///
    /// Both arguments are CSS family serializations: keywords bare, names quoted.
    /// Weight, style, letter-spacing and line-height are pinned by `ProbeSpec`.
    ///
    /// # Errors
    /// Returns an error if the engine cannot attach or lay out the probe.
    pub fn measure(
        &self,
        text: &str,
        font_size_px: f32,
        family: &str,
        fallback: &str,
    ) -> Result<TextBox> {
        let spec = ProbeSpec::new(text, font_size_px, format!("{family}, {fallback}"));
        let guard = ProbeGuard {
            renderer: self.renderer,
            probe: self.renderer.attach_probe(&spec)?,
        };
        self.renderer.probe_box(guard.probe)
    }

    /// Measure both reference strings.
    ///
    /// # Errors
    /// Returns an error if either measurement fails.
    pub fn measure_references(
        &self,
        font_size_px: f32,
        family: &str,
        fallback: &str,
    ) -> Result<(TextBox, TextBox)> {
        Ok((
            self.measure(WIDE_REFERENCE, font_size_px, family, fallback)?,
            self.measure(NARROW_REFERENCE, font_size_px, family, fallback)?,
        ))
    }
}
