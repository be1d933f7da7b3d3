//! Tree node capability contract.
//!
//! The path builders never touch a concrete document type. Everything they
//! need from a tree position (type, names, id/class, parent, element
//! children, identity) comes through [`TreeNode`]. Any adapter satisfying
//! this contract is interchangeable: the in-process arena walk in [`crate::dom`]
//! and the remote proxy in [`crate::remote`] implement the same trait.

use crate::error::PathError;

/// Type of a tree node, following DOM node-type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Processing instruction
    ProcessingInstruction,
    /// Comment
    Comment,
    /// Document root
    Document,
    /// Anything else (doctype, fragments, host-specific nodes)
    Other,
}

/// Read-only access to one position in a rooted, ordered tree.
///
/// Accessors may cross a process boundary, so every one of them is fallible;
/// results must stay consistent across repeated calls within a single path
/// computation (no mid-call tree mutation is assumed).
///
/// Handles are cheap values: ascending derives a fresh handle per level and
/// none are retained once the path string is returned.
pub trait TreeNode: Sized {
    /// Node type of this position.
    fn node_type(&self) -> Result<NodeType, PathError>;

    /// Raw node name (HTML element names come back uppercased, as in the DOM).
    fn node_name(&self) -> Result<String, PathError>;

    /// Local name: the node name without a namespace prefix, case-folded for
    /// HTML elements. Empty for nodes without a local name.
    fn local_name(&self) -> Result<String, PathError>;

    /// Value of the `id` attribute; empty string when absent.
    fn id_attribute(&self) -> Result<String, PathError>;

    /// Value of the `class` attribute (whitespace-separated token list);
    /// empty string when absent.
    fn class_attribute(&self) -> Result<String, PathError>;

    /// Arbitrary attribute lookup by name.
    fn attribute(&self, name: &str) -> Result<Option<String>, PathError>;

    /// Mode of an attached shadow root (`"open"` / `"closed"`), if any.
    fn shadow_root_mode(&self) -> Result<Option<String>, PathError>;

    /// Parent node, or `None` at the root.
    fn parent(&self) -> Result<Option<Self>, PathError>;

    /// Element children in document order. Non-element children are never
    /// reported; siblings returned here share this node's parent.
    fn children(&self) -> Result<Vec<Self>, PathError>;

    /// Position identity: true iff both handles denote the same underlying
    /// tree position, even when fetched independently. Content equality is
    /// not sufficient; the disambiguation scans terminate through this.
    fn is_same_node(&self, other: &Self) -> bool;
}
