//! Tree structure, geometry and hit testing.

use crate::{NodeId, Rect, ScreenPoint};

/// Which encapsulation scope a hit test runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitScope {
    /// The document's light tree. Shadow content is retargeted to its host.
    Document,
    /// The shadow root attached to the given host element.
    ShadowRoot(NodeId),
}

/// Read-only view of the render tree.
pub trait DomView {
    /// The root element (`<html>`).
    fn document_element(&self) -> Option<NodeId>;
    fn body(&self) -> Option<NodeId>;

    /// Lowercase tag name, `None` for text and other non-element nodes.
    fn tag_name(&self, node: NodeId) -> Option<String>;
    fn is_text(&self, node: NodeId) -> bool;
    /// Character data of a text node.
    fn text(&self, node: NodeId) -> Option<String>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Parent in the light tree. `None` for the document element and for top-level shadow children.
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    /// Host element of the shadow root that directly contains `node`.
    fn shadow_host(&self, node: NodeId) -> Option<NodeId>;
    /// Child nodes (elements and text) in the light tree.
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn has_shadow_root(&self, node: NodeId) -> bool;

    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;
    fn viewport(&self) -> Rect;

    /// Every element stacked at `point` in document scope, topmost first.
    fn elements_from_point(&self, point: ScreenPoint) -> Vec<NodeId>;
    /// Topmost element at `point` within `scope`.
    fn hit_test(&self, scope: HitScope, point: ScreenPoint) -> Option<NodeId>;
    /// Text node holding the caret position for `point`, if the engine can tell.
    fn caret_text_at(&self, point: ScreenPoint) -> Option<NodeId>;

    /// All elements of the light tree in document order.
    fn all_elements(&self) -> Vec<NodeId>;

    /// Parent, or the enclosing shadow host when `node` sits at the top of a shadow tree.
    fn logical_parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).or_else(|| self.shadow_host(node))
    }
}
