//! Batch path computation.
//!
//! Independent targets share no mutable state, so computing their locators is
//! embarrassingly parallel. Uses Rayon over any `Sync` tree handle (the
//! in-process [`crate::dom::DomHandle`] qualifies).

use rayon::prelude::*;

use crate::error::PathError;
use crate::node::TreeNode;
use crate::path::{css_path, x_path};

/// Compute CSS selector paths for many targets in parallel
pub fn css_paths_parallel<N: TreeNode + Sync>(
    targets: &[N],
    optimized: bool,
) -> Vec<Result<String, PathError>> {
    targets
        .par_iter()
        .map(|target| css_path(target, optimized))
        .collect()
}

/// Compute XPath expressions for many targets in parallel
pub fn x_paths_parallel<N: TreeNode + Sync>(
    targets: &[N],
    optimized: bool,
) -> Vec<Result<String, PathError>> {
    targets
        .par_iter()
        .map(|target| x_path(target, optimized))
        .collect()
}
