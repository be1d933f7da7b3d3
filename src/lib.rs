//! dompath - Stable CSS selector and XPath locator generation
//!
//! Surfaces:
//! - `path::css_path` / `path::x_path`: build a locator for one node
//! - `resolve`: evaluate emitted locators back against a tree
//! - `dom`: arena-backed in-process document
//! - `remote`: adapter over a host automation channel
//! - `parallel`: batch computation over many targets
//! - `cache`: caller-owned LRU of computed locators
//!
//! Everything is generic over [`TreeNode`], the capability contract a
//! document must satisfy for the builders to walk it.

pub mod cache;
pub mod dom;
pub mod error;
pub mod node;
pub mod parallel;
pub mod path;
pub mod remote;
pub mod resolve;

pub use cache::{LocatorCache, PathKind};
pub use dom::{Document, DomHandle, NodeId};
pub use error::PathError;
pub use node::{NodeType, TreeNode};
pub use parallel::{css_paths_parallel, x_paths_parallel};
pub use path::{css_escape, css_path, x_path, Step};
pub use remote::{DocumentChannel, NodeSummary, RemoteId, RemoteNode};
pub use resolve::{resolve_css, resolve_xpath};
