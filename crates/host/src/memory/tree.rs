//! Node storage, relationships and hit testing for the in-memory engine.

use std::collections::HashMap;

use crate::{HitScope, NodeId, Rect, ScreenPoint};

#[derive(Debug, Clone)]
pub(super) enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub(super) struct ElementData {
    pub tag_name: String,
    pub attributes: HashMap<String, String>,
    pub rect: Option<Rect>,
    pub z_index: i32,
    /// Declarations matched from stylesheets, already flattened per element.
    pub declared: HashMap<String, String>,
    /// Raw `style` attribute.
    pub inline_style: Option<String>,
}

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    /// Set on top-level children of a shadow root: the root's host.
    pub host: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Top-level children of an attached shadow root.
    pub shadow_children: Option<Vec<NodeId>>,
}

/// Flat arena of nodes; `NodeId` is the index.
#[derive(Debug, Clone, Default)]
pub(super) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn push(&mut self, data: NodeData, parent: Option<NodeId>, host: Option<NodeId>) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u64);
        self.nodes.push(Node {
            data,
            parent,
            host,
            children: Vec::new(),
            shadow_children: None,
        });
        if let Some(parent_id) = parent
            && let Some(parent_node) = self.get_mut(parent_id)
        {
            parent_node.children.push(id);
        }
        if let Some(host_id) = host
            && let Some(host_node) = self.get_mut(host_id)
        {
            host_node.shadow_children.get_or_insert_with(Vec::new).push(id);
        }
        id
    }

    pub fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.as_u64() as usize)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node.as_u64() as usize)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.get(node)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.get_mut(node)?.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    pub fn logical_parent(&self, node: NodeId) -> Option<NodeId> {
        let entry = self.get(node)?;
        entry.parent.or(entry.host)
    }

    /// Elements of one scope in paint order (preorder), not entering nested shadow roots.
    pub fn scope_elements(&self, scope: HitScope, document_element: NodeId) -> Vec<NodeId> {
        let roots = match scope {
            HitScope::Document => vec![document_element],
            HitScope::ShadowRoot(host) => self
                .get(host)
                .and_then(|entry| entry.shadow_children.clone())
                .unwrap_or_default(),
        };
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = roots.into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            let Some(entry) = self.get(current) else {
                continue;
            };
            if matches!(entry.data, NodeData::Element(_)) {
                out.push(current);
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        out
    }

    /// Elements of `scope` containing `point`, topmost first.
    pub fn stacked_at(
        &self,
        scope: HitScope,
        document_element: NodeId,
        point: ScreenPoint,
    ) -> Vec<NodeId> {
        let mut hits: Vec<(i32, usize, NodeId)> = self
            .scope_elements(scope, document_element)
            .into_iter()
            .enumerate()
            .filter_map(|(order, node)| {
                let element = self.element(node)?;
                let rect = element.rect?;
                rect.contains(point).then_some((element.z_index, order, node))
            })
            .collect();
        hits.sort_by(|left, right| (right.0, right.1).cmp(&(left.0, left.1)));
        hits.into_iter().map(|(_, _, node)| node).collect()
    }

    /// First non-whitespace text child.
    pub fn direct_text_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.children.iter().copied().find(|child| {
            matches!(
                self.get(*child).map(|entry| &entry.data),
                Some(NodeData::Text(text)) if !text.trim().is_empty()
            )
        })
    }
}
