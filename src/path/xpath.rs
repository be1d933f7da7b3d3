//! XPath location-path construction.
//!
//! Same ascent shape as the CSS builder, different per-level value grammar:
//! each step is a node test (`tag`, `@name`, `text()`, `comment()`,
//! `processing-instruction()`) with an optional 1-based positional predicate
//! counted among *similar* siblings.

use log::{debug, trace, warn};

use super::Step;
use crate::error::PathError;
use crate::node::{NodeType, TreeNode};

/// Compute an XPath expression for `target`.
///
/// The document node itself is `"/"`. With `optimized` set, elements carrying
/// an id collapse to the absolute `//*[@id="..."]` shortcut.
pub fn x_path<N: TreeNode>(target: &N, optimized: bool) -> Result<String, PathError> {
    if target.node_type()? == NodeType::Document {
        return Ok("/".to_string());
    }

    let mut steps: Vec<Step> = Vec::new();
    match x_path_value(target, optimized)? {
        Some(step) => {
            let stop = step.optimized;
            steps.push(step);
            if !stop {
                ascend(target, optimized, &mut steps)?;
            }
        }
        None => {}
    }

    steps.reverse();
    // An id-based first step is already absolute; a leading slash would
    // double it.
    let absolute = if steps.first().is_some_and(|step| step.optimized) {
        ""
    } else {
        "/"
    };
    let path = format!(
        "{}{}",
        absolute,
        steps
            .iter()
            .map(|step| step.value.as_str())
            .collect::<Vec<_>>()
            .join("/")
    );
    debug!("xpath computed in {} steps: {}", steps.len(), path);
    Ok(path)
}

fn ascend<N: TreeNode>(
    target: &N,
    optimized: bool,
    steps: &mut Vec<Step>,
) -> Result<(), PathError> {
    let mut context = target.parent()?;
    while let Some(node) = context {
        match x_path_value(&node, optimized)? {
            Some(step) => {
                trace!("location step: {}", step);
                let stop = step.optimized;
                steps.push(step);
                if stop {
                    return Ok(());
                }
            }
            // Consistency fault at this level: truncate the ascent and hand
            // back the prefix accumulated so far.
            None => return Ok(()),
        }
        context = node.parent()?;
    }
    Ok(())
}

/// Compute the location step contributed by one node.
///
/// Returns `None` when the node cannot be found among its own siblings (a
/// tree-consistency fault), aborting the ascent at this level.
///
/// The id value embedded in the `//*[@id="..."]` shortcut is not escaped
/// beyond the surrounding quotes; an id containing `"` produces an invalid
/// XPath literal. This matches the reference behavior and is left as-is.
pub fn x_path_value<N: TreeNode>(node: &N, optimized: bool) -> Result<Option<Step>, PathError> {
    let own_index = match x_path_index(node)? {
        Some(index) => index,
        None => {
            warn!("node not found among its parent's children; truncating xpath ascent");
            return Ok(None);
        }
    };

    let node_type = node.node_type()?;
    let mut value = match node_type {
        NodeType::Element => {
            if optimized {
                let id = node.id_attribute()?;
                if !id.is_empty() {
                    return Ok(Some(Step::new(format!("//*[@id=\"{}\"]", id), true)));
                }
            }
            node.local_name()?
        }
        NodeType::Attribute => format!("@{}", node.node_name()?),
        NodeType::Text | NodeType::CData => "text()".to_string(),
        NodeType::ProcessingInstruction => "processing-instruction()".to_string(),
        NodeType::Comment => "comment()".to_string(),
        NodeType::Document | NodeType::Other => String::new(),
    };

    if own_index > 0 {
        value.push_str(&format!("[{}]", own_index));
    }

    Ok(Some(Step::new(value, node_type == NodeType::Document)))
}

/// Position of a node among its similar siblings.
///
/// `Some(0)` means no competing sibling (no predicate needed), `Some(n)` the
/// 1-based XPath ordinal, and `None` a tree-consistency fault: the node claims
/// a parent that does not list it as a child.
pub fn x_path_index<N: TreeNode>(node: &N) -> Result<Option<usize>, PathError> {
    let parent = match node.parent()? {
        Some(parent) => parent,
        // Root node - nothing to compete with.
        None => return Ok(Some(0)),
    };
    let siblings = parent.children()?;

    let mut has_similar = false;
    for sibling in &siblings {
        if nodes_similar(node, sibling)? && !sibling.is_same_node(node) {
            has_similar = true;
            break;
        }
    }
    if !has_similar {
        return Ok(Some(0));
    }

    // XPath indices start with 1.
    let mut own_index = 1;
    for sibling in &siblings {
        if nodes_similar(node, sibling)? {
            if sibling.is_same_node(node) {
                return Ok(Some(own_index));
            }
            own_index += 1;
        }
    }
    Ok(None)
}

/// Whether XPath's positional predicate counts two siblings together:
/// same local name for elements, same node type otherwise.
fn nodes_similar<N: TreeNode>(left: &N, right: &N) -> Result<bool, PathError> {
    if left.is_same_node(right) {
        return Ok(true);
    }

    let left_type = left.node_type()?;
    let right_type = right.node_type()?;
    if left_type == NodeType::Element && right_type == NodeType::Element {
        return Ok(left.local_name()? == right.local_name()?);
    }
    if left_type == right_type {
        return Ok(true);
    }

    // XPath treats CDATA sections as text nodes.
    Ok(normalize_type(left_type) == normalize_type(right_type))
}

fn normalize_type(node_type: NodeType) -> NodeType {
    if node_type == NodeType::CData {
        NodeType::Text
    } else {
        node_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn page() -> (Document, crate::dom::NodeId) {
        let mut doc = Document::new();
        let html = doc.append_element(Document::ROOT, "html");
        let body = doc.append_element(html, "body");
        (doc, body)
    }

    #[test]
    fn test_document_is_slash() {
        let doc = Document::new();
        assert_eq!(x_path(&doc.handle(Document::ROOT), false).unwrap(), "/");
        assert_eq!(x_path(&doc.handle(Document::ROOT), true).unwrap(), "/");
    }

    #[test]
    fn test_optimized_id_shortcut() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "test");

        assert_eq!(
            x_path(&doc.handle(div), true).unwrap(),
            "//*[@id=\"test\"]"
        );
    }

    #[test]
    fn test_unoptimized_ignores_id() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "test");

        assert_eq!(x_path(&doc.handle(div), false).unwrap(), "/html/body/div");
    }

    #[test]
    fn test_id_is_not_quote_escaped() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "with\"quote");

        assert_eq!(
            x_path(&doc.handle(div), true).unwrap(),
            "//*[@id=\"with\"quote\"]"
        );
    }

    #[test]
    fn test_sibling_ordinals() {
        let (mut doc, body) = page();
        let divs = [
            doc.append_element(body, "div"),
            doc.append_element(body, "div"),
            doc.append_element(body, "div"),
        ];

        for (i, div) in divs.iter().enumerate() {
            assert_eq!(
                x_path(&doc.handle(*div), false).unwrap(),
                format!("/html/body/div[{}]", i + 1)
            );
        }
    }

    #[test]
    fn test_classes_do_not_matter() {
        // Same-tag siblings count together regardless of class attributes.
        let (mut doc, body) = page();
        let classed = doc.append_element(body, "div");
        doc.set_attribute(classed, "class", "test");
        doc.append_element(body, "div");

        assert_eq!(
            x_path(&doc.handle(classed), false).unwrap(),
            "/html/body/div[1]"
        );
    }

    #[test]
    fn test_unique_tag_gets_no_ordinal() {
        let (mut doc, body) = page();
        doc.append_element(body, "div");
        let span = doc.append_element(body, "span");
        doc.append_element(body, "div");

        assert_eq!(x_path(&doc.handle(span), false).unwrap(), "/html/body/span");
    }

    #[test]
    fn test_nested_elements() {
        let (mut doc, body) = page();
        let outer = doc.append_element(body, "div");
        let inner = doc.append_element(outer, "div");

        assert_eq!(
            x_path(&doc.handle(inner), false).unwrap(),
            "/html/body/div/div"
        );
    }

    #[test]
    fn test_text_node_step() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        let text = doc.append_text(div, "hello");

        assert_eq!(
            x_path(&doc.handle(text), false).unwrap(),
            "/html/body/div/text()"
        );
    }

    #[test]
    fn test_comment_node_step() {
        let (mut doc, body) = page();
        let comment = doc.append_comment(body, "marker");

        assert_eq!(
            x_path(&doc.handle(comment), false).unwrap(),
            "/html/body/comment()"
        );
    }

    #[test]
    fn test_determinism() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.append_element(body, "div");

        for optimized in [false, true] {
            let first = x_path(&doc.handle(div), optimized).unwrap();
            let second = x_path(&doc.handle(div), optimized).unwrap();
            assert_eq!(first, second);
        }
    }

    mod inconsistent {
        //! Doubles for a tree whose parent does not list its child.

        use super::*;

        /// Hand-built tree: node 2 claims node 1 as parent; node 1 lists only
        /// node 2; node 1 claims node 0 as parent; node 0 lists node 9 (a
        /// similar element that is not node 1).
        #[derive(Clone)]
        struct Fault(u64);

        impl TreeNode for Fault {
            fn node_type(&self) -> Result<NodeType, PathError> {
                Ok(NodeType::Element)
            }
            fn node_name(&self) -> Result<String, PathError> {
                Ok("DIV".to_string())
            }
            fn local_name(&self) -> Result<String, PathError> {
                Ok("div".to_string())
            }
            fn id_attribute(&self) -> Result<String, PathError> {
                Ok(String::new())
            }
            fn class_attribute(&self) -> Result<String, PathError> {
                Ok(String::new())
            }
            fn attribute(&self, _name: &str) -> Result<Option<String>, PathError> {
                Ok(None)
            }
            fn shadow_root_mode(&self) -> Result<Option<String>, PathError> {
                Ok(None)
            }
            fn parent(&self) -> Result<Option<Self>, PathError> {
                match self.0 {
                    2 => Ok(Some(Fault(1))),
                    1 => Ok(Some(Fault(0))),
                    _ => Ok(None),
                }
            }
            fn children(&self) -> Result<Vec<Self>, PathError> {
                match self.0 {
                    1 => Ok(vec![Fault(2)]),
                    0 => Ok(vec![Fault(9)]),
                    _ => Ok(Vec::new()),
                }
            }
            fn is_same_node(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        #[test]
        fn test_index_reports_fault() {
            // Node 1 is similar to node 9 but missing from node 0's children.
            assert_eq!(x_path_index(&Fault(1)).unwrap(), None);
        }

        #[test]
        fn test_partial_path_on_mid_ascent_fault() {
            // The target's own level resolves; the ascent truncates above it.
            assert_eq!(x_path(&Fault(2), false).unwrap(), "/div");
        }

        #[test]
        fn test_target_level_fault_yields_root_path() {
            assert_eq!(x_path(&Fault(1), false).unwrap(), "/");
        }
    }
}
