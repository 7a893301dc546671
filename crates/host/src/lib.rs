//! Narrow capability interface between the font inspector and a rendering engine.
//!
//! The inspector never touches a concrete engine. Everything it needs is expressed as a
//! small set of traits:
//! - `DomView`: tree structure, geometry and hit testing (including shadow scopes)
//! - `StyleReader`: computed style, inline style, custom properties and stylesheet access
//! - `TextRenderer`: transient invisible text probes used for metric measurement
//! - `FontRegistry`: the engine's loaded-font registry, when it exposes one
//! - `ColorSampler`: a 1x1 offscreen surface used to normalize colors
//! - `EventHub`: capture-phase listener installation for point-of-interest events
//!
//! `MemoryHost` implements all of them over a deterministic in-memory document.

#![forbid(unsafe_code)]

pub mod css;
mod dom;
mod events;
mod geometry;
pub mod memory;
mod registry;
mod render;
mod style;

pub use dom::{DomView, HitScope};
pub use events::{EventHub, InteractionKind, ListenerId};
pub use geometry::{Rect, ScreenPoint, TextBox};
pub use memory::MemoryHost;
pub use registry::{FaceStatus, FontFace, FontRegistry};
pub use render::{ColorSampler, ProbeId, ProbeSpec, SurfaceId, TextRenderer};
pub use style::{ComputedStyle, StyleReader};

use serde::Serialize;

/// Opaque handle to a node in the host's render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Every capability the inspector consumes, bundled for convenience.
///
/// Components take only the individual traits they need; the session layer holds a `Host`.
pub trait Host {
    fn dom(&self) -> &dyn DomView;
    fn styles(&self) -> &dyn StyleReader;
    fn text_renderer(&self) -> &dyn TextRenderer;
    fn color_sampler(&self) -> &dyn ColorSampler;
    fn events(&self) -> &dyn EventHub;

    /// The loaded-font registry, or `None` when the engine does not expose one.
    fn font_registry(&self) -> Option<&dyn FontRegistry>;

    /// Platform identification string (user agent or platform token) used for OS sniffing.
    fn platform_string(&self) -> String;
}

impl<T: Host + ?Sized> Host for &T {
    fn dom(&self) -> &dyn DomView {
        (**self).dom()
    }

    fn styles(&self) -> &dyn StyleReader {
        (**self).styles()
    }

    fn text_renderer(&self) -> &dyn TextRenderer {
        (**self).text_renderer()
    }

    fn color_sampler(&self) -> &dyn ColorSampler {
        (**self).color_sampler()
    }

    fn events(&self) -> &dyn EventHub {
        (**self).events()
    }

    fn font_registry(&self) -> Option<&dyn FontRegistry> {
        (**self).font_registry()
    }

    fn platform_string(&self) -> String {
        (**self).platform_string()
    }
}
