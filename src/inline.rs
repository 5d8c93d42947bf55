// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Inline markup resolution: images, bold, italic and quotes.
//!
//! # Algorithm
//!
//! A line payload is resolved in a fixed order of passes:
//!
//! 1. `<img src="URL">` references are pulled out and replaced by slots
//! 2. the remaining text becomes literal text, escaped on output
//! 3. `**bold**`
//! 4. `*italic*` (no `*` inside)
//! 5. dialogue: `"..."` and `“...”` ([`Mode::Full`] only)
//! 6. secondary quotes: `'...'` and `‘...’` ([`Mode::Full`] only)
//! 7. every slot is spliced back in
//!
//! Each pass replaces a match by a *slot*: an opaque reference into an
//! ordered side table holding the finished fragment. Slots are not text, so
//! user input can never collide with them, and a later pass cannot match
//! inside a fragment an earlier pass produced. When a span's content
//! contains slots, their fragments become the span's children, which nests
//! a bold word inside a dialogue span correctly.
//!
//! Unterminated delimiters stay literal; spans never cross lines.
//!
//! # Example
//!
//! ```
//! use chat2html::config::Config;
//! use chat2html::inline::{resolve_markup, Mode};
//!
//! let config = Config::default();
//! let html = resolve_markup("a **b** <c>", Mode::BubbleReduced, &config);
//! assert_eq!(html, r#"a <strong style="font-weight: bold;">b</strong> &lt;c&gt;"#);
//! ```

use crate::config::{Config, ImageAlign};
use crate::css;
use crate::fragment::{Element, Node, Style};
use crate::markup;
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\s+src="([^"]+)"\s*/?>"#).expect("image pattern is valid")
});

/// Which inline grammar to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Narration and headings: colored bold/italic plus quote highlighting.
    Full,
    /// Chat bubbles: unstyled bold/italic, quotes left as plain text.
    BubbleReduced,
}

/// Returns `true` if `text` contains at least one image reference.
#[must_use]
pub fn contains_image(text: &str) -> bool {
    IMAGE_RE.is_match(text)
}

/// Returns the image URL if `text` is exactly one image reference.
#[must_use]
pub fn standalone_image(text: &str) -> Option<&str> {
    let text = text.trim();
    let captures = IMAGE_RE.captures(text)?;
    let whole = captures.get(0)?;
    if whole.start() == 0 && whole.end() == text.len() {
        captures.get(1).map(|m| m.as_str())
    } else {
        None
    }
}

/// Builds the themed fragment for an image.
///
/// Inline images (inside a paragraph or bubble) use a block-level `span`;
/// a line holding nothing but an image uses a `div` with paragraph spacing.
/// `src` is used exactly as given.
#[must_use]
pub fn image_fragment(src: &str, config: &Config, standalone: bool) -> Node {
    let align = match config.image_align {
        ImageAlign::Center => "center",
        ImageAlign::Left => "left",
        ImageAlign::Right => "right",
    };

    let image_style = Style::new()
        .set("max-width", css::percent(config.image_max_width))
        .set("height", "auto")
        .set("border-radius", css::px(config.image_radius))
        .set_if(
            config.image_border_width > 0.0,
            "border",
            format!(
                "{} solid {}",
                css::px(config.image_border_width),
                config.image_border_color
            ),
        )
        .set_if(
            config.image_shadow,
            "box-shadow",
            "0 2px 12px rgba(0, 0, 0, 0.15)",
        )
        .set("vertical-align", "middle");
    let image = Element::new("img").attr("src", src).style(image_style);

    let wrapper = if standalone {
        Element::new("div").style(
            Style::new()
                .set("text-align", align)
                .set("margin", format!("0 0 {} 0", css::em(config.paragraph_spacing))),
        )
    } else {
        Element::new("span").style(
            Style::new()
                .set("display", "block")
                .set("text-align", align)
                .set("margin", "0.5em 0"),
        )
    };

    wrapper.child(image).into()
}

/// Resolves inline markup in `text` into a list of sibling fragments.
///
/// `config` should already be normalized; the composer takes care of that.
#[must_use]
pub fn resolve(text: &str, mode: Mode, config: &Config) -> Vec<Node> {
    let mut resolver = Resolver {
        config,
        mode,
        slots: Vec::new(),
    };

    let atoms = resolver.extract_images(text);
    let atoms = resolver.bold(&atoms);
    let atoms = resolver.italic(&atoms);
    let atoms = match mode {
        Mode::Full => {
            let atoms = resolver.dialogue(&atoms);
            resolver.secondary(&atoms)
        }
        Mode::BubbleReduced => atoms,
    };

    trace!(slots = resolver.slots.len(), ?mode, "resolved inline markup");
    resolver.restore(&atoms)
}

/// Resolves inline markup and serializes the result.
#[must_use]
pub fn resolve_markup(text: &str, mode: Mode, config: &Config) -> String {
    markup::nodes_to_markup(&resolve(text, mode, config))
}

/// A unit of the working sequence: a literal character or a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    Char(char),
    Slot(usize),
}

/// Describes one delimited span pattern.
struct Pair {
    open: &'static [char],
    close: &'static [char],
    /// A character the content may not contain.
    forbid: Option<char>,
    /// Whether the delimiters stay visible inside the span.
    keep_delimiters: bool,
}

struct Resolver<'a> {
    config: &'a Config,
    mode: Mode,
    slots: Vec<Option<Node>>,
}

impl Resolver<'_> {
    fn push_slot(&mut self, node: Node) -> Atom {
        self.slots.push(Some(node));
        Atom::Slot(self.slots.len() - 1)
    }

    /// Steps 1 and 2: images become slots, everything else literal text.
    fn extract_images(&mut self, text: &str) -> Vec<Atom> {
        let mut atoms = Vec::with_capacity(text.len());
        let mut last = 0;
        for captures in IMAGE_RE.captures_iter(text) {
            let (Some(whole), Some(src)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            atoms.extend(literal(&text[last..whole.start()]));
            let node = image_fragment(src.as_str(), self.config, false);
            atoms.push(self.push_slot(node));
            last = whole.end();
        }
        atoms.extend(literal(&text[last..]));
        atoms
    }

    fn bold(&mut self, atoms: &[Atom]) -> Vec<Atom> {
        let style = match self.mode {
            Mode::Full => Style::new()
                .set("font-weight", "bold")
                .set("color", self.config.bold_color.clone()),
            Mode::BubbleReduced => Style::new().set("font-weight", "bold"),
        };
        let pair = Pair {
            open: &['*', '*'],
            close: &['*', '*'],
            forbid: None,
            keep_delimiters: false,
        };
        self.replace_pairs(atoms, &pair, "strong", &style)
    }

    fn italic(&mut self, atoms: &[Atom]) -> Vec<Atom> {
        let style = match self.mode {
            Mode::Full => Style::new()
                .set("font-style", "italic")
                .set("color", self.config.italic_color.clone()),
            Mode::BubbleReduced => Style::new().set("font-style", "italic"),
        };
        let pair = Pair {
            open: &['*'],
            close: &['*'],
            forbid: Some('*'),
            keep_delimiters: false,
        };
        self.replace_pairs(atoms, &pair, "em", &style)
    }

    fn dialogue(&mut self, atoms: &[Atom]) -> Vec<Atom> {
        let style = Style::new()
            .set("color", self.config.dialogue_color.clone())
            .set("background", self.config.dialogue_bg_color.clone())
            .set("padding", "0.1em 0.4em")
            .set("border-radius", "4px");
        let straight = Pair {
            open: &['"'],
            close: &['"'],
            forbid: Some('"'),
            keep_delimiters: true,
        };
        let curly = Pair {
            open: &['\u{201C}'],
            close: &['\u{201D}'],
            forbid: Some('\u{201D}'),
            keep_delimiters: true,
        };
        let atoms = self.replace_pairs(atoms, &straight, "span", &style);
        self.replace_pairs(&atoms, &curly, "span", &style)
    }

    fn secondary(&mut self, atoms: &[Atom]) -> Vec<Atom> {
        let style = Style::new()
            .set("color", self.config.quote_color.clone())
            .set("background", self.config.quote_bg_color.clone())
            .set("font-style", "italic")
            .set("padding", "0.1em 0.3em")
            .set("border-radius", "4px");
        let straight = Pair {
            open: &['\''],
            close: &['\''],
            forbid: Some('\''),
            keep_delimiters: true,
        };
        let curly = Pair {
            open: &['\u{2018}'],
            close: &['\u{2019}'],
            forbid: Some('\u{2019}'),
            keep_delimiters: true,
        };
        let atoms = self.replace_pairs(atoms, &straight, "span", &style);
        self.replace_pairs(&atoms, &curly, "span", &style)
    }

    /// Replaces every leftmost, non-overlapping match of `pair` with a slot
    /// holding a `tag` element styled with `style`.
    fn replace_pairs(
        &mut self,
        atoms: &[Atom],
        pair: &Pair,
        tag: &'static str,
        style: &Style,
    ) -> Vec<Atom> {
        let mut out = Vec::with_capacity(atoms.len());
        let mut i = 0;
        while i < atoms.len() {
            if starts_with(atoms, i, pair.open) {
                let start = i + pair.open.len();
                if let Some(end) = find_close(atoms, start, pair) {
                    let inner = if pair.keep_delimiters {
                        &atoms[i..end + pair.close.len()]
                    } else {
                        &atoms[start..end]
                    };
                    let children = self.restore(inner);
                    let node = Element::new(tag).style(style.clone()).children(children);
                    out.push(self.push_slot(node.into()));
                    i = end + pair.close.len();
                    continue;
                }
            }
            out.push(atoms[i]);
            i += 1;
        }
        out
    }

    /// Step 7: turns atoms into nodes, moving each slot's fragment into place.
    fn restore(&mut self, atoms: &[Atom]) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut text = String::new();
        for atom in atoms {
            match *atom {
                Atom::Char(c) => text.push(c),
                Atom::Slot(index) => {
                    if !text.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut text)));
                    }
                    if let Some(node) = self.slots.get_mut(index).and_then(Option::take) {
                        nodes.push(node);
                    }
                }
            }
        }
        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        nodes
    }
}

/// Literal text: from here on these characters are content, never markup.
fn literal(text: &str) -> impl Iterator<Item = Atom> + '_ {
    text.chars().map(Atom::Char)
}

fn starts_with(atoms: &[Atom], at: usize, delimiter: &[char]) -> bool {
    atoms.len() >= at + delimiter.len()
        && delimiter
            .iter()
            .zip(&atoms[at..])
            .all(|(&d, &atom)| atom == Atom::Char(d))
}

/// Finds the closing delimiter for content starting at `start`.
///
/// The content must be non-empty; the first closing delimiter wins, and the
/// search stops at a forbidden character.
fn find_close(atoms: &[Atom], start: usize, pair: &Pair) -> Option<usize> {
    for k in start..atoms.len() {
        if k > start && starts_with(atoms, k, pair.close) {
            return Some(k);
        }
        if pair.forbid.is_some_and(|f| atoms[k] == Atom::Char(f)) {
            return None;
        }
    }
    None
}
