// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! String writer: serializes a fragment tree to portable markup.
//!
//! # Output Format
//!
//! - `<tag attr="value" style="property: value; ...">children</tag>`
//! - `img` and `hr` are written without a closing tag
//! - boolean attributes (empty value) are written bare, e.g. `<details open>`
//! - text is escaped (`&`, `<`, `>`)
//! - attribute values are escaped (`&`, `"`, `<`, `>`), except an image
//!   `src`, which is written exactly as the caller supplied it
//!
//! # Example
//!
//! ```
//! use chat2html::fragment::{Element, Style};
//! use chat2html::markup::to_markup;
//!
//! let node = Element::new("p")
//!     .style(Style::new().set("color", "#111111"))
//!     .text("a < b")
//!     .into();
//!
//! assert_eq!(to_markup(&node), r#"<p style="color: #111111;">a &lt; b</p>"#);
//! ```

use crate::fragment::{Element, Node, Style};

/// Serializes `node` and its subtree.
#[must_use]
pub fn to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Serializes a sequence of sibling nodes.
#[must_use]
pub fn nodes_to_markup(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() {
            continue;
        }
        out.push_str("=\"");
        if element.tag == "img" && *name == "src" {
            out.push_str(value);
        } else {
            out.push_str(&escape_attr(value));
        }
        out.push('"');
    }
    if !element.style.is_empty() {
        out.push_str(" style=\"");
        out.push_str(&escape_attr(&style_to_string(&element.style)));
        out.push('"');
    }
    out.push('>');

    if element.is_void() {
        return;
    }
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}

/// Serializes a style as `property: value;` pairs separated by spaces.
#[must_use]
pub fn style_to_string(style: &Style) -> String {
    style
        .declarations()
        .iter()
        .map(|(property, value)| format!("{property}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes text content so it can never be read as markup.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes a double-quoted attribute value.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("&quot;"),
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
