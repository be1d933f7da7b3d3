//! In-process document - arena-based DOM representation.
//!
//! Storage follows the arena layout with sibling links and depth tracking;
//! construction happens through a mutation API rather than a parser, since
//! callers assemble fixture trees (or mirror a host document) node by node.
//!
//! [`Document::handle`] hands out [`DomHandle`] values: cheap, copyable
//! [`TreeNode`] implementations that walk the arena directly.

use super::node::{DomAttribute, DomNode, NodeId, NodeKind};
use crate::error::PathError;
use crate::node::{NodeType, TreeNode};

/// A document stored in arena format
#[derive(Debug, Default)]
pub struct Document {
    /// Arena of nodes; index 0 is always the document root
    nodes: Vec<DomNode>,
}

impl Document {
    /// The document root node id
    pub const ROOT: NodeId = 0;

    /// Create an empty document containing only the root node
    pub fn new() -> Self {
        Document {
            nodes: vec![DomNode::document()],
        }
    }

    /// Append an HTML element: the tag is stored lowercased as the local name
    /// and uppercased as the raw node name, mirroring HTML DOM casing.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let local = tag.to_ascii_lowercase();
        let raw = tag.to_ascii_uppercase();
        self.append(parent, DomNode::element(&raw, &local))
    }

    /// Append an element with explicit raw and local names (prefixed or
    /// foreign tags whose casing must be preserved).
    pub fn append_element_ns(&mut self, parent: NodeId, node_name: &str, local_name: &str) -> NodeId {
        self.append(parent, DomNode::element(node_name, local_name))
    }

    /// Append a text node
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> NodeId {
        self.append(parent, DomNode::text(content))
    }

    /// Append a CDATA section
    pub fn append_cdata(&mut self, parent: NodeId, content: &str) -> NodeId {
        self.append(parent, DomNode::cdata(content))
    }

    /// Append a comment node
    pub fn append_comment(&mut self, parent: NodeId, content: &str) -> NodeId {
        self.append(parent, DomNode::comment(content))
    }

    /// Append a processing instruction
    pub fn append_processing_instruction(
        &mut self,
        parent: NodeId,
        target: &str,
        data: &str,
    ) -> NodeId {
        self.append(parent, DomNode::processing_instruction(target, data))
    }

    /// Set (or replace) an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(id as usize) {
            if let Some(attr) = node.attributes.iter_mut().find(|attr| attr.name == name) {
                attr.value = value.to_string();
            } else {
                node.attributes.push(DomAttribute {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    /// Mark an element as hosting a shadow root with the given mode
    pub fn set_shadow_root_mode(&mut self, id: NodeId, mode: &str) {
        if let Some(node) = self.nodes.get_mut(id as usize) {
            node.shadow_root_mode = Some(mode.to_string());
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id as usize)
    }

    /// Iterate over children of a node (all node kinds)
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get(id).and_then(|node| node.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Get a tree-walk handle for a node
    pub fn handle(&self, id: NodeId) -> DomHandle<'_> {
        DomHandle { doc: self, id }
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link a node under its parent, maintaining sibling chain and depth
    fn append(&mut self, parent: NodeId, mut node: DomNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        node.parent = Some(parent);
        node.depth = self
            .get(parent)
            .map(|p| p.depth.saturating_add(1))
            .unwrap_or(0);

        let prev_last = self.get(parent).and_then(|p| p.last_child);
        node.prev_sibling = prev_last;
        self.nodes.push(node);

        if let Some(last) = prev_last {
            if let Some(last_node) = self.nodes.get_mut(last as usize) {
                last_node.next_sibling = Some(id);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(parent as usize) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(id);
            }
            parent_node.last_child = Some(id);
        }
        id
    }
}

/// Iterator over child nodes
pub struct ChildIter<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get(current).and_then(|node| node.next_sibling);
        Some(current)
    }
}

/// Borrow-based [`TreeNode`] over an arena [`Document`].
///
/// Identity is arena id equality, which is stable for the lifetime of the
/// document. Accessors cannot fail for live ids; a stale id reports
/// [`PathError::Detached`].
#[derive(Debug, Clone, Copy)]
pub struct DomHandle<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> DomHandle<'a> {
    /// Arena id of this handle
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> Result<&'a DomNode, PathError> {
        self.doc
            .get(self.id)
            .ok_or(PathError::Detached(self.id as u64))
    }
}

impl TreeNode for DomHandle<'_> {
    fn node_type(&self) -> Result<NodeType, PathError> {
        Ok(match self.node()?.kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element => NodeType::Element,
            NodeKind::Text => NodeType::Text,
            NodeKind::CData => NodeType::CData,
            NodeKind::Comment => NodeType::Comment,
            NodeKind::ProcessingInstruction => NodeType::ProcessingInstruction,
        })
    }

    fn node_name(&self) -> Result<String, PathError> {
        Ok(self.node()?.node_name.clone())
    }

    fn local_name(&self) -> Result<String, PathError> {
        Ok(self.node()?.local_name.clone())
    }

    fn id_attribute(&self) -> Result<String, PathError> {
        Ok(self.node()?.attribute("id").unwrap_or("").to_string())
    }

    fn class_attribute(&self) -> Result<String, PathError> {
        Ok(self.node()?.attribute("class").unwrap_or("").to_string())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, PathError> {
        Ok(self.node()?.attribute(name).map(str::to_string))
    }

    fn shadow_root_mode(&self) -> Result<Option<String>, PathError> {
        Ok(self.node()?.shadow_root_mode.clone())
    }

    fn parent(&self) -> Result<Option<Self>, PathError> {
        Ok(self.node()?.parent.map(|id| self.doc.handle(id)))
    }

    fn children(&self) -> Result<Vec<Self>, PathError> {
        self.node()?;
        Ok(self
            .doc
            .children(self.id)
            .filter(|&child| self.doc.get(child).is_some_and(DomNode::is_element))
            .map(|child| self.doc.handle(child))
            .collect())
    }

    fn is_same_node(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}
