//! Locator re-resolution.
//!
//! A produced path is only trustworthy once it round-trips: resolving it
//! against the source tree must yield exactly the original node. This module
//! evaluates the subset of CSS and XPath grammar the builders emit, over any
//! [`TreeNode`] implementation:
//!
//! - CSS: `" > "`-chained compounds of `tag`, `#id`, `.class`,
//!   `:nth-child(n)` and `[attr="value"]`
//! - XPath: absolute `/`-joined `tag[n]` steps, plus the `//*[@id="..."]`
//!   prefix form
//!
//! Element nodes only; anything outside this grammar is rejected with
//! [`PathError::Selector`] rather than guessed at.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::PathError;
use crate::node::{NodeType, TreeNode};

/// Resolve a CSS selector against the tree under `root`.
///
/// Matches descendants of `root` (not `root` itself), in document order.
pub fn resolve_css<N: TreeNode>(root: &N, selector: &str) -> Result<Vec<N>, PathError> {
    if selector.trim().is_empty() {
        return Ok(Vec::new());
    }
    let compounds = selector
        .split(" > ")
        .map(parse_compound)
        .collect::<Result<Vec<_>, _>>()?;
    let (first, rest) = match compounds.split_first() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };

    // The first compound may sit at any depth; the rest are child-axis only.
    let mut all = Vec::new();
    descendants(root, &mut all)?;
    let mut current = Vec::new();
    for node in all {
        if matches_compound(&node, first)? {
            current.push(node);
        }
    }

    for compound in rest {
        let mut next = Vec::new();
        for node in &current {
            for child in node.children()? {
                if matches_compound(&child, compound)? {
                    next.push(child);
                }
            }
        }
        current = next;
    }
    Ok(current)
}

/// Resolve an XPath location path against the tree under `root`.
///
/// `"/"` denotes the document itself and yields no elements.
pub fn resolve_xpath<N: TreeNode>(root: &N, xpath: &str) -> Result<Vec<N>, PathError> {
    const ID_PREFIX: &str = "//*[@id=\"";

    if xpath == "/" {
        return Ok(Vec::new());
    }
    if let Some(tail) = xpath.strip_prefix(ID_PREFIX) {
        let end = tail
            .find("\"]")
            .ok_or_else(|| PathError::Selector(xpath.to_string()))?;
        let id = &tail[..end];
        let rest = &tail[end + 2..];

        let mut all = Vec::new();
        descendants(root, &mut all)?;
        let mut current = Vec::new();
        for node in all {
            if node.node_type()? == NodeType::Element && node.id_attribute()? == id {
                current.push(node);
            }
        }
        apply_steps(current, rest)
    } else if let Some(tail) = xpath.strip_prefix('/') {
        let mut parts = tail.splitn(2, '/');
        let first = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("");
        if first.is_empty() {
            return Ok(Vec::new());
        }
        let step = parse_xpath_step(first)?;
        apply_steps(filter_children(root, &step)?, rest)
    } else {
        Err(PathError::Selector(xpath.to_string()))
    }
}

fn apply_steps<N: TreeNode>(mut current: Vec<N>, rest: &str) -> Result<Vec<N>, PathError> {
    for part in rest.split('/').filter(|part| !part.is_empty()) {
        let step = parse_xpath_step(part)?;
        let mut next = Vec::new();
        for node in &current {
            next.extend(filter_children(node, &step)?);
        }
        current = next;
    }
    Ok(current)
}

/// Collect element descendants in document order (pre-order).
fn descendants<N: TreeNode>(node: &N, out: &mut Vec<N>) -> Result<(), PathError> {
    for child in node.children()? {
        let mut below = Vec::new();
        descendants(&child, &mut below)?;
        out.push(child);
        out.append(&mut below);
    }
    Ok(())
}

// ============================================================================
// CSS compound selectors
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    nth_child: Option<usize>,
    attributes: Vec<(String, String)>,
}

fn parse_compound(segment: &str) -> Result<Compound, PathError> {
    let mut chars = segment.chars().peekable();
    let mut compound = Compound::default();

    let tag = read_ident(&mut chars);
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                let id = read_ident(&mut chars);
                if id.is_empty() {
                    return Err(PathError::Selector(segment.to_string()));
                }
                compound.id = Some(id);
            }
            '.' => {
                chars.next();
                let class = read_ident(&mut chars);
                if class.is_empty() {
                    return Err(PathError::Selector(segment.to_string()));
                }
                compound.classes.push(class);
            }
            ':' => {
                chars.next();
                if read_ident(&mut chars) != "nth-child" {
                    return Err(PathError::Selector(segment.to_string()));
                }
                expect(&mut chars, '(', segment)?;
                let ordinal = read_digits(&mut chars);
                expect(&mut chars, ')', segment)?;
                let ordinal: usize = ordinal
                    .parse()
                    .map_err(|_| PathError::Selector(segment.to_string()))?;
                if ordinal == 0 {
                    return Err(PathError::Selector(segment.to_string()));
                }
                compound.nth_child = Some(ordinal);
            }
            '[' => {
                chars.next();
                let name = read_ident(&mut chars);
                expect(&mut chars, '=', segment)?;
                expect(&mut chars, '"', segment)?;
                let value = read_quoted(&mut chars, segment)?;
                expect(&mut chars, ']', segment)?;
                if name.is_empty() {
                    return Err(PathError::Selector(segment.to_string()));
                }
                compound.attributes.push((name, value));
            }
            _ => return Err(PathError::Selector(segment.to_string())),
        }
    }

    if compound == Compound::default() {
        return Err(PathError::Selector(segment.to_string()));
    }
    Ok(compound)
}

/// Read an identifier, undoing CSS escaping (`\xx ` hex forms and
/// backslash-prefixed literals).
fn read_ident(chars: &mut Peekable<Chars>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            '\\' => {
                chars.next();
                if let Some(unescaped) = read_escape(chars) {
                    out.push(unescaped);
                }
            }
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c >= '\u{80}' => {
                out.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    out
}

/// Consume the remainder of a backslash escape (backslash already taken).
fn read_escape(chars: &mut Peekable<Chars>) -> Option<char> {
    let mut hex = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_hexdigit() && hex.len() < 6 {
            hex.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if hex.is_empty() {
        return chars.next();
    }
    // Hex escapes may carry a single terminating space.
    if chars.peek() == Some(&' ') {
        chars.next();
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .or(Some('\u{FFFD}'))
}

fn read_digits(chars: &mut Peekable<Chars>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

fn read_quoted(chars: &mut Peekable<Chars>, segment: &str) -> Result<String, PathError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(out),
            Some('\\') => {
                if let Some(unescaped) = read_escape(chars) {
                    out.push(unescaped);
                }
            }
            Some(c) => out.push(c),
            None => return Err(PathError::Selector(segment.to_string())),
        }
    }
}

fn expect(chars: &mut Peekable<Chars>, wanted: char, segment: &str) -> Result<(), PathError> {
    if chars.next() == Some(wanted) {
        Ok(())
    } else {
        Err(PathError::Selector(segment.to_string()))
    }
}

fn matches_compound<N: TreeNode>(node: &N, compound: &Compound) -> Result<bool, PathError> {
    if node.node_type()? != NodeType::Element {
        return Ok(false);
    }
    if let Some(tag) = &compound.tag {
        let local = node.local_name()?;
        if !local.eq_ignore_ascii_case(tag) && node.node_name()? != *tag {
            return Ok(false);
        }
    }
    if let Some(id) = &compound.id {
        if node.id_attribute()? != *id {
            return Ok(false);
        }
    }
    if !compound.classes.is_empty() {
        let attribute = node.class_attribute()?;
        let tokens: HashSet<&str> = attribute.split_ascii_whitespace().collect();
        for class in &compound.classes {
            if !tokens.contains(class.as_str()) {
                return Ok(false);
            }
        }
    }
    for (name, value) in &compound.attributes {
        if node.attribute(name)?.as_deref() != Some(value.as_str()) {
            return Ok(false);
        }
    }
    if let Some(ordinal) = compound.nth_child {
        if element_position(node)? != Some(ordinal) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 1-based position among the parent's element children.
fn element_position<N: TreeNode>(node: &N) -> Result<Option<usize>, PathError> {
    let parent = match node.parent()? {
        Some(parent) => parent,
        None => return Ok(None),
    };
    for (i, sibling) in parent.children()?.iter().enumerate() {
        if sibling.is_same_node(node) {
            return Ok(Some(i + 1));
        }
    }
    Ok(None)
}

// ============================================================================
// XPath steps
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct XPathStep {
    name: String,
    index: Option<usize>,
}

fn parse_xpath_step(part: &str) -> Result<XPathStep, PathError> {
    if part.contains('(') {
        // text(), comment() etc: not element steps, not resolvable here.
        return Err(PathError::Selector(part.to_string()));
    }
    let (name, index) = match part.find('[') {
        Some(open) => {
            if !part.ends_with(']') {
                return Err(PathError::Selector(part.to_string()));
            }
            let ordinal: usize = part[open + 1..part.len() - 1]
                .parse()
                .map_err(|_| PathError::Selector(part.to_string()))?;
            if ordinal == 0 {
                return Err(PathError::Selector(part.to_string()));
            }
            (&part[..open], Some(ordinal))
        }
        None => (part, None),
    };
    if name.is_empty() {
        return Err(PathError::Selector(part.to_string()));
    }
    Ok(XPathStep {
        name: name.to_string(),
        index,
    })
}

/// Element children matching a step's node test, narrowed by its ordinal.
///
/// The ordinal counts among name-matching children only, mirroring how the
/// builder assigns indices among similar siblings.
fn filter_children<N: TreeNode>(node: &N, step: &XPathStep) -> Result<Vec<N>, PathError> {
    let mut matched = Vec::new();
    for child in node.children()? {
        if child.node_type()? == NodeType::Element
            && child.local_name()?.eq_ignore_ascii_case(&step.name)
        {
            matched.push(child);
        }
    }
    match step.index {
        Some(ordinal) => Ok(matched.into_iter().nth(ordinal - 1).into_iter().collect()),
        None => Ok(matched),
    }
}
