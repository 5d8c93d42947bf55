// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! The abstract fragment tree shared by both output forms.
//!
//! Every builder in the pipeline produces [`Node`]s. The tree is then handed
//! to one of two writers:
//!
//! - [`crate::markup`] serializes it to a portable markup string
//! - [`crate::preview`] turns it into a live, DOM-like tree for on-screen use
//!
//! Text nodes hold *unescaped* user text. Turning user text into a
//! [`Node::Text`] is what makes it literal: no writer ever interprets its
//! contents as markup.

/// An inline `style` attribute as an ordered list of declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: Vec<(&'static str, String)>,
}

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Appends a declaration, or replaces the value in place if `property`
    /// is already declared.
    #[must_use]
    pub fn set(mut self, property: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
        self
    }

    /// Appends a declaration only when `condition` holds.
    #[must_use]
    pub fn set_if(self, condition: bool, property: &'static str, value: impl Into<String>) -> Self {
        if condition {
            self.set(property, value)
        } else {
            self
        }
    }

    /// Returns the declarations in insertion order.
    #[must_use]
    pub fn declarations(&self) -> &[(&'static str, String)] {
        &self.declarations
    }

    /// Returns the declared value for `property`, if any.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if there are no declarations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// A styled element with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, e.g. `div`.
    pub tag: &'static str,
    /// Attributes other than `style`, in insertion order.
    pub attrs: Vec<(&'static str, String)>,
    /// The inline style.
    pub style: Style,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes, style or children.
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            style: Style::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute. An empty value marks a boolean attribute.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Replaces the inline style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends several children.
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Appends a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Returns the value of attribute `name`, if set.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` for elements that never have children or a closing tag.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_tag(self.tag)
    }
}

/// Returns `true` for tags written without a closing tag.
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    matches!(tag, "img" | "hr" | "br")
}

/// A node in the fragment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A styled element.
    Element(Element),
    /// Literal text.
    Text(String),
}

impl Node {
    /// Returns the element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenates all text in this subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Visits this node and all descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        if let Self::Element(element) = self {
            for child in &element.children {
                child.walk(visit);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}
