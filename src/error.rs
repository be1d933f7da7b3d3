//! Error taxonomy for path computation.
//!
//! Accessor failures are terminal for the whole computation: a detached node
//! can never produce a meaningful locator, so there are no local retries.
//! Tree-consistency faults (a node missing from its parent's child list) are
//! not errors: the builders truncate the ascent and return the prefix
//! accumulated so far.

use thiserror::Error;

/// Failure of a path computation or locator resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A node handle no longer maps to a live node in its document.
    #[error("node {0} is detached from its document")]
    Detached(u64),

    /// The transport behind a remote document handle failed.
    #[error("document channel error: {0}")]
    Channel(String),

    /// A locator string handed to the resolver was not in the emitted grammar.
    #[error("unsupported or malformed locator: {0}")]
    Selector(String),
}
