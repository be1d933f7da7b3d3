//! CSS selector path construction.
//!
//! Walks from the target node to the root (or to an early-stop point),
//! producing one [`Step`] per level, then joins the reversed fragments with
//! `" > "`. Per-level disambiguation prefers an id, then the target's class
//! list, then an `:nth-child` ordinal; the decision is best-effort single-pass
//! and does not attempt a globally minimal selector.

use std::collections::HashSet;

use log::{debug, trace, warn};

use super::escape::css_escape;
use super::Step;
use crate::error::PathError;
use crate::node::{NodeType, TreeNode};

/// How a step distinguishes the node from its same-tag siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SiblingDecision {
    /// No same-tag sibling: the bare tag name is enough at this level.
    Bare,
    /// Some same-tag sibling fully shares the node's classes (or the node has
    /// none): fall back to the positional ordinal, 1-based.
    NthChild(usize),
    /// Same-tag siblings exist but none covers the node's class set: append
    /// the node's own class tokens.
    ClassList,
}

/// Compute a CSS selector path for `target`.
///
/// Returns the empty string for non-element targets, since selectors only
/// address elements. With `optimized` set, id and `body`/`head`/`html` shortcuts are
/// preferred over fully structural paths.
pub fn css_path<N: TreeNode>(target: &N, optimized: bool) -> Result<String, PathError> {
    if target.node_type()? != NodeType::Element {
        return Ok(String::new());
    }

    let mut steps: Vec<Step> = Vec::new();
    match css_path_step(target, optimized, true)? {
        Some(step) => {
            let stop = step.optimized;
            steps.push(step);
            if !stop {
                ascend(target, optimized, &mut steps)?;
            }
        }
        None => warn!("target not addressable by a selector; returning empty path"),
    }

    steps.reverse();
    let path = join_steps(&steps, " > ");
    debug!("css path computed in {} steps: {}", steps.len(), path);
    Ok(path)
}

/// Walk parent links above the target, appending one step per level.
fn ascend<N: TreeNode>(
    target: &N,
    optimized: bool,
    steps: &mut Vec<Step>,
) -> Result<(), PathError> {
    let mut context = target.parent()?;
    while let Some(node) = context {
        match css_path_step(&node, optimized, node.is_same_node(target))? {
            Some(step) => {
                trace!("selector step: {}", step);
                let stop = step.optimized;
                steps.push(step);
                if stop {
                    return Ok(());
                }
            }
            None => {
                // Unresolvable level: truncate and hand back the prefix.
                warn!("selector ascent hit an unresolvable node; truncating path");
                return Ok(());
            }
        }
        context = node.parent()?;
    }
    Ok(())
}

/// Compute the selector fragment contributed by one node.
///
/// Returns `None` for non-element nodes (the level is not addressable).
/// A step marked `optimized` terminates the ascent: an id is assumed unique
/// document-wide, and nothing above a root element can help disambiguate.
pub fn css_path_step<N: TreeNode>(
    node: &N,
    optimized: bool,
    is_target_node: bool,
) -> Result<Option<Step>, PathError> {
    if node.node_type()? != NodeType::Element {
        return Ok(None);
    }

    let id = node.id_attribute()?;
    if optimized {
        if !id.is_empty() {
            return Ok(Some(Step::new(id_selector(&id), true)));
        }
        let lower = node.node_name()?.to_ascii_lowercase();
        if lower == "body" || lower == "head" || lower == "html" {
            return Ok(Some(Step::new(node_name_in_correct_case(node)?, true)));
        }
    }

    let node_name = node_name_in_correct_case(node)?;
    if !id.is_empty() {
        return Ok(Some(Step::new(
            format!("{}{}", node_name, id_selector(&id)),
            true,
        )));
    }

    let parent = match node.parent()? {
        Some(parent) if parent.node_type()? != NodeType::Document => parent,
        // A root element (or a child of the document node) needs no siblings
        // considered: the bare tag name already resolves from here.
        _ => return Ok(Some(Step::new(node_name, true))),
    };

    let class_attr = node.class_attribute()?;
    let own_classes = class_tokens(&class_attr);
    let decision = disambiguate(node, &parent, &node_name, &own_classes)?;

    let mut result = node_name.clone();
    if is_target_node
        && node_name.eq_ignore_ascii_case("input")
        && id.is_empty()
        && class_attr.is_empty()
    {
        // Bare inputs that differ only in their type attribute look identical
        // structurally; the type predicate keeps them apart.
        if let Some(input_type) = node.attribute("type")? {
            if !input_type.is_empty() {
                result.push_str(&format!("[type=\"{}\"]", css_escape(&input_type)));
            }
        }
    }

    match decision {
        SiblingDecision::NthChild(ordinal) => {
            result.push_str(&format!(":nth-child({})", ordinal));
        }
        SiblingDecision::ClassList => {
            for token in &own_classes {
                result.push('.');
                result.push_str(&css_escape(token));
            }
        }
        SiblingDecision::Bare => {}
    }

    Ok(Some(Step::new(result, false)))
}

/// Single-pass scan over the node's element siblings.
///
/// `NthChild` dominates `ClassList`: as soon as one same-tag sibling fully
/// covers the node's class set, only the ordinal can disambiguate. The scan
/// may stop early once that holds and the node's own position is known.
fn disambiguate<N: TreeNode>(
    node: &N,
    parent: &N,
    node_name: &str,
    own_classes: &[String],
) -> Result<SiblingDecision, PathError> {
    let own_set: HashSet<&str> = own_classes.iter().map(String::as_str).collect();

    let mut needs_class_names = false;
    let mut needs_nth_child = false;
    let mut own_index: Option<usize> = None;
    let mut element_index: usize = 0;

    for sibling in parent.children()? {
        if own_index.is_some() && needs_nth_child {
            break;
        }
        if sibling.node_type()? != NodeType::Element {
            continue;
        }
        let index = element_index;
        element_index += 1;

        if sibling.is_same_node(node) {
            own_index = Some(index);
            continue;
        }
        if needs_nth_child {
            continue;
        }
        if node_name_in_correct_case(&sibling)? != node_name {
            continue;
        }

        needs_class_names = true;
        if own_set.is_empty() {
            needs_nth_child = true;
            continue;
        }
        if sibling_covers_classes(&own_set, &class_tokens(&sibling.class_attribute()?)) {
            needs_nth_child = true;
        }
    }

    if needs_nth_child {
        // A missing own index means the parent does not list this node; the
        // reference behavior still emits the (degenerate) zero ordinal.
        let ordinal = own_index.map_or_else(
            || {
                warn!("node not found among its parent's children during selector scan");
                0
            },
            |index| index + 1,
        );
        Ok(SiblingDecision::NthChild(ordinal))
    } else if needs_class_names {
        Ok(SiblingDecision::ClassList)
    } else {
        Ok(SiblingDecision::Bare)
    }
}

/// True iff the sibling's class set contains every one of the node's classes.
fn sibling_covers_classes(own: &HashSet<&str>, sibling_classes: &[String]) -> bool {
    let mut remaining = own.clone();
    for token in sibling_classes {
        remaining.remove(token.as_str());
        if remaining.is_empty() {
            return true;
        }
    }
    false
}

/// Split a `class` attribute into tokens, preserving order and duplicates.
fn class_tokens(attribute: &str) -> Vec<String> {
    attribute
        .split_ascii_whitespace()
        .map(str::to_string)
        .collect()
}

fn id_selector(id: &str) -> String {
    format!("#{}", css_escape(id))
}

/// Tag name with DOM case rules applied.
///
/// A non-empty shadow-root mode yields the literal `#shadow-root (<mode>)`
/// label. Otherwise the local name is used when it matches the raw node name
/// in length (no namespace prefix, HTML-cased tag); raw name when not.
pub(crate) fn node_name_in_correct_case<N: TreeNode>(node: &N) -> Result<String, PathError> {
    if let Some(mode) = node.shadow_root_mode()? {
        if !mode.is_empty() {
            return Ok(format!("#shadow-root ({})", mode));
        }
    }

    let local = node.local_name()?;
    let name = node.node_name()?;
    if local.is_empty() || local.len() != name.len() {
        // No local name, or a prefixed/foreign tag: case sensitive.
        return Ok(name);
    }
    Ok(local)
}

fn join_steps(steps: &[Step], separator: &str) -> String {
    steps
        .iter()
        .map(|step| step.value.as_str())
        .collect::<Vec<_>>()
        .join(separator)
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
    fn test_id_short_circuits_even_unoptimized() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "test");

        assert_eq!(css_path(&doc.handle(div), false).unwrap(), "div#test");
    }

    #[test]
    fn test_optimized_id_is_bare() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "test");

        assert_eq!(css_path(&doc.handle(div), true).unwrap(), "#test");
    }

    #[test]
    fn test_single_class() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "class", "test");
        doc.append_element(body, "div");

        assert_eq!(
            css_path(&doc.handle(div), false).unwrap(),
            "html > body > div.test"
        );
    }

    #[test]
    fn test_multiple_classes() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "class", "tst test");
        doc.append_element(body, "div");

        assert_eq!(
            css_path(&doc.handle(div), false).unwrap(),
            "html > body > div.tst.test"
        );
    }

    #[test]
    fn test_nth_child_for_classless_siblings() {
        let (mut doc, body) = page();
        let divs = [
            doc.append_element(body, "div"),
            doc.append_element(body, "div"),
            doc.append_element(body, "div"),
        ];

        for (i, div) in divs.iter().enumerate() {
            assert_eq!(
                css_path(&doc.handle(*div), false).unwrap(),
                format!("html > body > div:nth-child({})", i + 1)
            );
        }
    }

    #[test]
    fn test_nested_bare_elements() {
        let (mut doc, body) = page();
        let outer = doc.append_element(body, "div");
        let inner = doc.append_element(outer, "div");

        assert_eq!(
            css_path(&doc.handle(inner), false).unwrap(),
            "html > body > div > div"
        );
    }

    #[test]
    fn test_nested_class_only_where_needed() {
        let (mut doc, body) = page();
        let main = doc.append_element(body, "div");
        doc.set_attribute(main, "class", "main");
        let child = doc.append_element(main, "div");
        doc.set_attribute(child, "class", "child");
        doc.append_element(main, "div");

        assert_eq!(
            css_path(&doc.handle(child), false).unwrap(),
            "html > body > div > div.child"
        );
    }

    #[test]
    fn test_nth_child_dominates_shared_classes() {
        // The sibling carries a superset of the target's classes, so classes
        // cannot disambiguate and the ordinal wins.
        let (mut doc, body) = page();
        let first = doc.append_element(body, "div");
        doc.set_attribute(first, "class", "a");
        let second = doc.append_element(body, "div");
        doc.set_attribute(second, "class", "a b");

        assert_eq!(
            css_path(&doc.handle(first), false).unwrap(),
            "html > body > div:nth-child(1)"
        );
        // The superset sibling is still separable by its extra class.
        assert_eq!(
            css_path(&doc.handle(second), false).unwrap(),
            "html > body > div.a.b"
        );
    }

    #[test]
    fn test_non_element_target_is_empty() {
        let (mut doc, body) = page();
        let text = doc.append_text(body, "hello");

        assert_eq!(css_path(&doc.handle(text), false).unwrap(), "");
        assert_eq!(css_path(&doc.handle(Document::ROOT), true).unwrap(), "");
    }

    #[test]
    fn test_input_type_predicate() {
        let (mut doc, body) = page();
        let input = doc.append_element(body, "input");
        doc.set_attribute(input, "type", "text");

        assert_eq!(
            css_path(&doc.handle(input), false).unwrap(),
            "html > body > input[type=\"text\"]"
        );
    }

    #[test]
    fn test_input_type_predicate_combines_with_nth_child() {
        let (mut doc, body) = page();
        let typed = doc.append_element(body, "input");
        doc.set_attribute(typed, "type", "checkbox");
        doc.append_element(body, "input");

        assert_eq!(
            css_path(&doc.handle(typed), false).unwrap(),
            "html > body > input[type=\"checkbox\"]:nth-child(1)"
        );
    }

    #[test]
    fn test_input_with_class_skips_type_predicate() {
        let (mut doc, body) = page();
        let input = doc.append_element(body, "input");
        doc.set_attribute(input, "type", "text");
        doc.set_attribute(input, "class", "field");
        doc.append_element(body, "input");

        assert_eq!(
            css_path(&doc.handle(input), false).unwrap(),
            "html > body > input.field"
        );
    }

    #[test]
    fn test_optimized_body_shortcut() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");

        assert_eq!(css_path(&doc.handle(div), true).unwrap(), "body > div");
    }

    #[test]
    fn test_id_escaping() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "id", "my.id");

        assert_eq!(css_path(&doc.handle(div), true).unwrap(), "#my\\.id");
    }

    #[test]
    fn test_shadow_root_label() {
        let (mut doc, body) = page();
        let host = doc.append_element(body, "div");
        doc.set_shadow_root_mode(host, "open");

        assert_eq!(
            css_path(&doc.handle(host), false).unwrap(),
            "html > body > #shadow-root (open)"
        );
    }

    #[test]
    fn test_foreign_tag_uses_raw_name() {
        let (mut doc, body) = page();
        let rect = doc.append_element_ns(body, "svg:rect", "rect");

        assert_eq!(
            css_path(&doc.handle(rect), false).unwrap(),
            "html > body > svg:rect"
        );
    }

    #[test]
    fn test_determinism() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "class", "x y");
        doc.append_element(body, "div");

        for optimized in [false, true] {
            let first = css_path(&doc.handle(div), optimized).unwrap();
            let second = css_path(&doc.handle(div), optimized).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_ascent_terminates_within_depth() {
        let (mut doc, body) = page();
        let mut deep = body;
        for _ in 0..10 {
            deep = doc.append_element(deep, "section");
        }

        let path = css_path(&doc.handle(deep), false).unwrap();
        // depth from root is 12 (html, body, 10 sections)
        assert_eq!(path.split(" > ").count(), 12);
    }
}
