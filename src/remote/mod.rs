//! Remote document proxy.
//!
//! One adapter covers every out-of-process document: the host supplies a
//! [`DocumentChannel`] (the automation transport) and [`RemoteNode`] turns it
//! into a [`TreeNode`] the builders can walk. Per-node metadata is fetched as
//! a single batched [`NodeSummary`] and memoized on the handle, so repeated
//! accessor calls during one path computation cost one round trip per node.
//! Batching is a performance hook only; behavior is identical to a
//! field-by-field fetch.

use std::cell::OnceCell;

use crate::error::PathError;
use crate::node::{NodeType, TreeNode};

/// Host-side node identifier on the automation channel
pub type RemoteId = u64;

/// Batched per-node metadata, fetched in one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub node_type: NodeType,
    pub node_name: String,
    pub local_name: String,
    /// Value of the `id` attribute; empty when absent
    pub id_attribute: String,
    /// Value of the `class` attribute; empty when absent
    pub class_attribute: String,
    pub shadow_root_mode: Option<String>,
}

impl NodeSummary {
    /// Summary for an HTML element without id/class/shadow root
    pub fn element(tag: &str) -> Self {
        NodeSummary {
            node_type: NodeType::Element,
            node_name: tag.to_ascii_uppercase(),
            local_name: tag.to_ascii_lowercase(),
            id_attribute: String::new(),
            class_attribute: String::new(),
            shadow_root_mode: None,
        }
    }
}

/// What a host automation channel must answer about its document.
///
/// Every call may cross a process boundary and therefore fail; failures are
/// terminal for the path computation in progress (a detached node can never
/// produce a meaningful locator, so nothing is retried).
pub trait DocumentChannel {
    /// Fetch the batched metadata for one node
    fn summary(&self, node: RemoteId) -> Result<NodeSummary, PathError>;

    /// Fetch a single attribute value
    fn attribute(&self, node: RemoteId, name: &str) -> Result<Option<String>, PathError>;

    /// Fetch the parent id, `None` at the root
    fn parent(&self, node: RemoteId) -> Result<Option<RemoteId>, PathError>;

    /// Fetch element children ids in document order
    fn children(&self, node: RemoteId) -> Result<Vec<RemoteId>, PathError>;
}

/// Tree-walk handle over a [`DocumentChannel`].
///
/// Identity is remote-id equality. The node's summary is fetched lazily on
/// first use and cached for the life of the handle; handles derived while
/// ascending or scanning start cold and fetch their own summary on demand.
pub struct RemoteNode<'a, C: DocumentChannel> {
    channel: &'a C,
    id: RemoteId,
    summary: OnceCell<NodeSummary>,
}

impl<'a, C: DocumentChannel> RemoteNode<'a, C> {
    /// Wrap a remote node id
    pub fn new(channel: &'a C, id: RemoteId) -> Self {
        RemoteNode {
            channel,
            id,
            summary: OnceCell::new(),
        }
    }

    /// Remote id of this handle
    pub fn id(&self) -> RemoteId {
        self.id
    }

    fn summary(&self) -> Result<&NodeSummary, PathError> {
        if let Some(summary) = self.summary.get() {
            return Ok(summary);
        }
        let fetched = self.channel.summary(self.id)?;
        Ok(self.summary.get_or_init(|| fetched))
    }
}

impl<C: DocumentChannel> TreeNode for RemoteNode<'_, C> {
    fn node_type(&self) -> Result<NodeType, PathError> {
        Ok(self.summary()?.node_type)
    }

    fn node_name(&self) -> Result<String, PathError> {
        Ok(self.summary()?.node_name.clone())
    }

    fn local_name(&self) -> Result<String, PathError> {
        Ok(self.summary()?.local_name.clone())
    }

    fn id_attribute(&self) -> Result<String, PathError> {
        Ok(self.summary()?.id_attribute.clone())
    }

    fn class_attribute(&self) -> Result<String, PathError> {
        Ok(self.summary()?.class_attribute.clone())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, PathError> {
        self.channel.attribute(self.id, name)
    }

    fn shadow_root_mode(&self) -> Result<Option<String>, PathError> {
        Ok(self.summary()?.shadow_root_mode.clone())
    }

    fn parent(&self) -> Result<Option<Self>, PathError> {
        Ok(self
            .channel
            .parent(self.id)?
            .map(|id| RemoteNode::new(self.channel, id)))
    }

    fn children(&self) -> Result<Vec<Self>, PathError> {
        Ok(self
            .channel
            .children(self.id)?
            .into_iter()
            .map(|id| RemoteNode::new(self.channel, id))
            .collect())
    }

    fn is_same_node(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
