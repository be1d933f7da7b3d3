//! DOM module - arena-based in-process document.
//!
//! Provides the direct tree-walk implementation of the [`crate::node::TreeNode`]
//! contract:
//! - Arena allocation with NodeId (u32) indices and sibling links
//! - Mutation API for assembling trees node by node
//! - [`DomHandle`]: copyable tree-walk handles over a borrowed document

pub mod document;
pub mod node;

pub use document::{ChildIter, Document, DomHandle};
pub use node::{DomAttribute, DomNode, NodeId, NodeKind};
