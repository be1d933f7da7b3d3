//! Path construction: the CSS selector and XPath builders.
//!
//! Both builders share the same ascent shape: walk parent links from the
//! target, emit one [`Step`] per level, stop on an optimized step, a missing
//! parent, or an unresolvable node, then reverse and join the fragments.

pub mod css;
pub mod escape;
pub mod xpath;

pub use css::css_path;
pub use escape::css_escape;
pub use xpath::x_path;

use std::fmt;

/// The path fragment contributed at one tree level.
///
/// `optimized` asserts that the fragment alone uniquely resolves from this
/// level to the document root, so the ascent may stop here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub value: String,
    pub optimized: bool,
}

impl Step {
    pub fn new(value: impl Into<String>, optimized: bool) -> Self {
        Step {
            value: value.into(),
            optimized,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
