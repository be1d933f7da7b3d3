//! Arena node representation.
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of DOM node stored in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// A DOM node in the arena
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Raw node name: uppercased tag for HTML elements, `#text`-style labels
    /// for character data, the target for processing instructions
    pub node_name: String,
    /// Local name (elements only; empty otherwise)
    pub local_name: String,
    /// Text payload for text/CDATA/comment nodes, data for PIs
    pub text: String,
    /// Attributes in document order (elements only)
    pub attributes: Vec<DomAttribute>,
    /// Mode of an attached shadow root, if any
    pub shadow_root_mode: Option<String>,
    /// Depth in document tree
    pub depth: u16,
}

impl DomNode {
    /// Create a new document root node
    pub fn document() -> Self {
        DomNode::blank(NodeKind::Document, "#document")
    }

    /// Create a new element node with explicit raw and local names
    pub fn element(node_name: &str, local_name: &str) -> Self {
        let mut node = DomNode::blank(NodeKind::Element, node_name);
        node.local_name = local_name.to_string();
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        let mut node = DomNode::blank(NodeKind::Text, "#text");
        node.text = content.to_string();
        node
    }

    /// Create a new CDATA node
    pub fn cdata(content: &str) -> Self {
        let mut node = DomNode::blank(NodeKind::CData, "#cdata-section");
        node.text = content.to_string();
        node
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        let mut node = DomNode::blank(NodeKind::Comment, "#comment");
        node.text = content.to_string();
        node
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target: &str, data: &str) -> Self {
        let mut node = DomNode::blank(NodeKind::ProcessingInstruction, target);
        node.text = data.to_string();
        node
    }

    fn blank(kind: NodeKind, node_name: &str) -> Self {
        DomNode {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            node_name: node_name.to_string(),
            local_name: String::new(),
            text: String::new(),
            attributes: Vec::new(),
            shadow_root_mode: None,
            depth: 0,
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// Stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomAttribute {
    /// Attribute name
    pub name: String,
    /// Attribute value
    pub value: String,
}
