// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Live-tree writer: turns a fragment tree into a DOM-like preview tree.
//!
//! A host UI mounts a [`PreviewNode`] directly (elements with an attribute
//! list, a style property list and children; text nodes with plain text),
//! so it never has to parse the markup string. The tree serializes with
//! `serde` for hosts living outside the process.
//!
//! [`PreviewNode::outer_markup`] re-serializes the live tree the way a DOM
//! reports its outer markup. For any fragment `n`,
//! `build(&n).outer_markup() == markup::to_markup(&n)`. The serializer here
//! is written independently of [`crate::markup`] so each checks the other.

use crate::fragment::{Node, is_void_tag};
use serde::Serialize;

/// One attribute of a preview element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value; empty for boolean attributes.
    pub value: String,
}

/// One inline style property of a preview element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleProperty {
    /// CSS property name.
    pub name: String,
    /// CSS value.
    pub value: String,
}

/// An element of the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewElement {
    /// Tag name.
    pub tag: String,
    /// Attributes in document order, `style` excluded.
    pub attributes: Vec<Attribute>,
    /// Inline style properties in declaration order.
    pub style: Vec<StyleProperty>,
    /// Child nodes.
    pub children: Vec<PreviewNode>,
}

impl PreviewElement {
    /// Returns the value of a style property.
    #[must_use]
    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets a style property, replacing an existing value in place.
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.style.iter_mut().find(|p| p.name == name) {
            value.clone_into(&mut existing.value);
        } else {
            self.style.push(StyleProperty {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
    }

    /// Returns the child elements, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(PreviewNode::as_element)
    }
}

/// A node of the live tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewNode {
    /// An element.
    Element(PreviewElement),
    /// A text node holding unescaped text.
    Text {
        /// The text.
        text: String,
    },
}

impl PreviewNode {
    /// Returns the element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&PreviewElement> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text { .. } => None,
        }
    }

    /// Serializes the live tree as outer markup.
    #[must_use]
    pub fn outer_markup(&self) -> String {
        let mut out = String::new();
        self.write_outer(&mut out);
        out
    }

    fn write_outer(&self, out: &mut String) {
        match self {
            Self::Text { text } => escape_into(out, text, false),
            Self::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for attribute in &element.attributes {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    if attribute.value.is_empty() {
                        continue;
                    }
                    out.push_str("=\"");
                    if element.tag == "img" && attribute.name == "src" {
                        out.push_str(&attribute.value);
                    } else {
                        escape_into(out, &attribute.value, true);
                    }
                    out.push('"');
                }
                if !element.style.is_empty() {
                    let css_text = element
                        .style
                        .iter()
                        .map(|p| format!("{}: {};", p.name, p.value))
                        .collect::<Vec<_>>()
                        .join(" ");
                    out.push_str(" style=\"");
                    escape_into(out, &css_text, true);
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_outer(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(out: &mut String, s: &str, in_attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Builds the live tree for a fragment.
#[must_use]
pub fn build(node: &Node) -> PreviewNode {
    match node {
        Node::Text(text) => PreviewNode::Text { text: text.clone() },
        Node::Element(element) => {
            let mut live = PreviewElement {
                tag: element.tag.to_owned(),
                attributes: element
                    .attrs
                    .iter()
                    .map(|(name, value)| Attribute {
                        name: (*name).to_owned(),
                        value: value.clone(),
                    })
                    .collect(),
                style: Vec::with_capacity(element.style.declarations().len()),
                children: element.children.iter().map(build).collect(),
            };
            for (name, value) in element.style.declarations() {
                live.set_style_property(name, value);
            }
            PreviewNode::Element(live)
        }
    }
}
