//! A deterministic in-memory rendering engine.
//!
//! `MemoryHost` stands in for a browser: it owns a small DOM with explicit geometry, a font
//! book with synthetic metrics, an optional loaded-font registry and a color sampler backed by
//! `csscolorparser`. Headless evaluation and every test in the workspace run against it.

mod fonts;
mod style;
mod tree;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{Result, anyhow};
use log::trace;

use crate::css::{parse_style_attribute_into_map, resolve_vars_in_value, split_family_list};
use crate::{
    ColorSampler, ComputedStyle, DomView, EventHub, FaceStatus, FontFace, FontRegistry,
    HitScope, Host, InteractionKind, ListenerId, NodeId, ProbeId, ProbeSpec, Rect,
    ScreenPoint, StyleReader, SurfaceId, TextBox, TextRenderer,
};

pub use fonts::FontMetrics;
use fonts::FontBook;
use tree::{ElementData, NodeData, Tree};

/// A stylesheet as the inspector can see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryStylesheet {
    /// Same-origin sheet; lists the families of its `@font-face` rules.
    Readable { font_faces: Vec<String> },
    /// Cross-origin sheet whose rules cannot be read.
    CrossOrigin,
}

impl MemoryStylesheet {
    pub fn readable<I, S>(font_faces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Readable {
            font_faces: font_faces.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Surface {
    fill_style: [u8; 4],
    pixel: [u8; 4],
}

pub struct MemoryHost {
    tree: Tree,
    html: NodeId,
    body: NodeId,
    viewport: Rect,
    platform: String,
    fonts: FontBook,
    registry_enabled: bool,
    faces: Vec<FontFace>,
    stylesheets: Vec<MemoryStylesheet>,
    next_handle: Cell<u64>,
    probes: RefCell<HashMap<u64, ProbeSpec>>,
    probes_attached: Cell<u64>,
    surfaces: RefCell<HashMap<u64, Surface>>,
    listeners: RefCell<HashMap<u64, InteractionKind>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// An empty 1280x800 document (`<html><body>`) on a Linux platform string.
    pub fn new() -> Self {
        let viewport = Rect::new(0.0, 0.0, 1280.0, 800.0);
        let mut tree = Tree::default();
        let html = tree.push(NodeData::Element(element("html", viewport)), None, None);
        let body = tree.push(NodeData::Element(element("body", viewport)), Some(html), None);
        Self {
            tree,
            html,
            body,
            viewport,
            platform: "Mozilla/5.0 (X11; Linux x86_64)".to_owned(),
            fonts: FontBook::with_defaults(),
            registry_enabled: true,
            faces: Vec::new(),
            stylesheets: Vec::new(),
            next_handle: Cell::new(1),
            probes: RefCell::new(HashMap::new()),
            probes_attached: Cell::new(0),
            surfaces: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: &str) -> Self {
        platform.clone_into(&mut self.platform);
        self
    }

    /// Resize the viewport; `<html>` and `<body>` keep covering it.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        for node in [self.html, self.body] {
            if let Some(data) = self.tree.element_mut(node) {
                data.rect = Some(viewport);
            }
        }
        self
    }

    /// Behave like an engine that does not expose a font registry.
    #[must_use]
    pub fn without_font_registry(mut self) -> Self {
        self.registry_enabled = false;
        self
    }

    pub fn html_node(&self) -> NodeId {
        self.html
    }

    pub fn body_node(&self) -> NodeId {
        self.body
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.tree.push(
            NodeData::Element(ElementData {
                tag_name: tag.to_ascii_lowercase(),
                ..ElementData::default()
            }),
            Some(parent),
            None,
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.tree
            .push(NodeData::Text(text.to_owned()), Some(parent), None)
    }

    /// Create an element at the top level of `host`'s shadow root, attaching one if needed.
    pub fn attach_shadow_child(&mut self, host: NodeId, tag: &str) -> NodeId {
        self.tree.push(
            NodeData::Element(ElementData {
                tag_name: tag.to_ascii_lowercase(),
                ..ElementData::default()
            }),
            None,
            Some(host),
        )
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.tree.element_mut(node) {
            data.rect = Some(rect);
        }
    }

    pub fn set_z_index(&mut self, node: NodeId, z_index: i32) {
        if let Some(data) = self.tree.element_mut(node) {
            data.z_index = z_index;
        }
    }

    /// Merge declarations (as if matched from a stylesheet) into an element.
    pub fn set_style(&mut self, node: NodeId, declarations: &str) {
        if let Some(data) = self.tree.element_mut(node) {
            data.declared
                .extend(parse_style_attribute_into_map(declarations));
        }
    }

    /// Replace the element's `style` attribute.
    pub fn set_inline_style(&mut self, node: NodeId, style: &str) {
        if let Some(data) = self.tree.element_mut(node) {
            data.inline_style = Some(style.to_owned());
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.tree.element_mut(node) {
            data.attributes
                .insert(name.to_ascii_lowercase(), value.to_owned());
        }
    }

    pub fn install_font(&mut self, family: &str, metrics: FontMetrics) {
        self.fonts.install(family, metrics);
    }

    /// Install a font with generated metrics distinct from every other installed font.
    pub fn install_system_font(&mut self, family: &str) -> FontMetrics {
        self.fonts.install_generated(family)
    }

    pub fn set_generic_font(&mut self, generic: &str, family: &str) {
        self.fonts.set_generic(generic, family);
    }

    /// Font that `system-ui` and the vendor system-font aliases render with.
    pub fn set_system_ui_font(&mut self, family: &str) {
        self.fonts.set_system_ui(family);
    }

    /// Add a face to the registry. Loaded faces render with `metrics`.
    pub fn register_face(&mut self, family: &str, status: FaceStatus, metrics: FontMetrics) {
        if status == FaceStatus::Loaded {
            self.fonts.load_web_face(family, metrics);
        }
        self.faces.push(FontFace {
            family: family.to_owned(),
            weight: "400".to_owned(),
            style: "normal".to_owned(),
            status,
        });
    }

    pub fn add_stylesheet(&mut self, sheet: MemoryStylesheet) {
        self.stylesheets.push(sheet);
    }

    /// Probes currently attached to the document.
    pub fn live_probes(&self) -> usize {
        self.probes.borrow().len()
    }

    /// Probes attached over the host's lifetime.
    pub fn probes_attached(&self) -> u64 {
        self.probes_attached.get()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.borrow().len()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn next_handle(&self) -> u64 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }
}

fn element(tag: &str, rect: Rect) -> ElementData {
    ElementData {
        tag_name: tag.to_owned(),
        rect: Some(rect),
        ..ElementData::default()
    }
}

impl DomView for MemoryHost {
    fn document_element(&self) -> Option<NodeId> {
        Some(self.html)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree.element(node).map(|data| data.tag_name.clone())
    }

    fn is_text(&self, node: NodeId) -> bool {
        matches!(
            self.tree.get(node).map(|entry| &entry.data),
            Some(NodeData::Text(_))
        )
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match &self.tree.get(node)?.data {
            NodeData::Text(text) => Some(text.clone()),
            NodeData::Element(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .element(node)?
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.parent
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node)?.host
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .get(node)
            .map(|entry| entry.children.clone())
            .unwrap_or_default()
    }

    fn has_shadow_root(&self, node: NodeId) -> bool {
        self.tree
            .get(node)
            .is_some_and(|entry| entry.shadow_children.is_some())
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        match &self.tree.get(node)?.data {
            NodeData::Element(data) => data.rect,
            NodeData::Text(_) => self
                .parent(node)
                .and_then(|parent| self.bounding_rect(parent)),
        }
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn elements_from_point(&self, point: ScreenPoint) -> Vec<NodeId> {
        self.tree.stacked_at(HitScope::Document, self.html, point)
    }

    fn hit_test(&self, scope: HitScope, point: ScreenPoint) -> Option<NodeId> {
        self.tree
            .stacked_at(scope, self.html, point)
            .into_iter()
            .next()
    }

    fn caret_text_at(&self, point: ScreenPoint) -> Option<NodeId> {
        self.elements_from_point(point)
            .into_iter()
            .find_map(|node| self.tree.direct_text_child(node))
    }

    fn all_elements(&self) -> Vec<NodeId> {
        self.tree.scope_elements(HitScope::Document, self.html)
    }
}

impl StyleReader for MemoryHost {
    fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        let element_node = if self.is_text(node) {
            self.parent(node)?
        } else {
            node
        };
        style::computed_style(&self.tree, element_node)
    }

    fn inline_style(&self, node: NodeId) -> Option<String> {
        self.tree.element(node)?.inline_style.clone()
    }

    fn custom_properties(&self, node: NodeId) -> Vec<(String, String)> {
        let properties = style::custom_properties(&self.tree, node);
        let mut resolved: Vec<(String, String)> = properties
            .iter()
            .map(|(name, value)| {
                (name.clone(), resolve_vars_in_value(value, &properties))
            })
            .collect();
        resolved.sort();
        resolved
    }

    fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    fn font_face_families(&self, sheet: usize) -> Result<Vec<String>> {
        match self.stylesheets.get(sheet) {
            Some(MemoryStylesheet::Readable { font_faces }) => Ok(font_faces.clone()),
            Some(MemoryStylesheet::CrossOrigin) => {
                Err(anyhow!("stylesheet {sheet}: cross-origin rules are not readable"))
            }
            None => Err(anyhow!("stylesheet {sheet} does not exist")),
        }
    }
}

impl TextRenderer for MemoryHost {
    fn attach_probe(&self, spec: &ProbeSpec) -> Result<ProbeId> {
        if spec.font_size_px <= 0.0 {
            return Err(anyhow!("probe font size must be positive"));
        }
        let handle = self.next_handle();
        self.probes.borrow_mut().insert(handle, spec.clone());
        self.probes_attached.set(self.probes_attached.get() + 1);
        Ok(ProbeId(handle))
    }

    fn probe_box(&self, probe: ProbeId) -> Result<TextBox> {
        let probes = self.probes.borrow();
        let spec = probes
            .get(&probe.0)
            .ok_or_else(|| anyhow!("probe {} is not attached", probe.0))?;
        let measured = self.fonts.measure(spec);
        trace!(target: "memory_host", "probe {:?} -> {measured:?}", spec.font_family);
        Ok(measured)
    }

    fn detach_probe(&self, probe: ProbeId) {
        self.probes.borrow_mut().remove(&probe.0);
    }
}

impl FontRegistry for MemoryHost {
    fn check(&self, font: &str) -> Result<bool> {
        let family_list = font
            .split_whitespace()
            .position(|token| token.ends_with("px"))
            .map(|index| font.split_whitespace().skip(index + 1).collect::<Vec<_>>().join(" "))
            .ok_or_else(|| anyhow!("malformed font shorthand: {font}"))?;
        Ok(split_family_list(&family_list)
            .iter()
            .any(|family| self.fonts.has_web_face(&family.name)))
    }

    fn faces(&self) -> Result<Vec<FontFace>> {
        Ok(self.faces.clone())
    }
}

impl ColorSampler for MemoryHost {
    fn create_surface(&self) -> Result<SurfaceId> {
        let handle = self.next_handle();
        self.surfaces.borrow_mut().insert(
            handle,
            Surface {
                fill_style: [0, 0, 0, 255],
                pixel: [0, 0, 0, 0],
            },
        );
        Ok(SurfaceId(handle))
    }

    fn fill(&self, surface: SurfaceId, color: &str) -> Result<()> {
        let mut surfaces = self.surfaces.borrow_mut();
        let target = surfaces
            .get_mut(&surface.0)
            .ok_or_else(|| anyhow!("surface {} does not exist", surface.0))?;
        if let Ok(parsed) = color.trim().parse::<csscolorparser::Color>() {
            target.fill_style = parsed.to_rgba8();
        }
        target.pixel = target.fill_style;
        Ok(())
    }

    fn read_pixel(&self, surface: SurfaceId) -> Result<[u8; 4]> {
        self.surfaces
            .borrow()
            .get(&surface.0)
            .map(|target| target.pixel)
            .ok_or_else(|| anyhow!("surface {} does not exist", surface.0))
    }

    fn release_surface(&self, surface: SurfaceId) {
        self.surfaces.borrow_mut().remove(&surface.0);
    }
}

impl EventHub for MemoryHost {
    fn listen(&self, kind: InteractionKind) -> Result<ListenerId> {
        let handle = self.next_handle();
        self.listeners.borrow_mut().insert(handle, kind);
        Ok(ListenerId(handle))
    }

    fn unlisten(&self, listener: ListenerId) {
        self.listeners.borrow_mut().remove(&listener.0);
    }
}

impl Host for MemoryHost {
    fn dom(&self) -> &dyn DomView {
        self
    }

    fn styles(&self) -> &dyn StyleReader {
        self
    }

    fn text_renderer(&self) -> &dyn TextRenderer {
        self
    }

    fn color_sampler(&self) -> &dyn ColorSampler {
        self
    }

    fn events(&self) -> &dyn EventHub {
        self
    }

    fn font_registry(&self) -> Option<&dyn FontRegistry> {
        self.registry_enabled.then_some(self as &dyn FontRegistry)
    }

    fn platform_string(&self) -> String {
        self.platform.clone()
    }
}
