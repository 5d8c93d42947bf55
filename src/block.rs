// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Block renderer: turns classified lines into styled fragments.
//!
//! Each line renders on its own; the only context carried between lines is
//! the kind of the previous line, which decides whether a bubble or heading
//! gets the `separationGap` top margin. A bubble that follows another bubble
//! (or a divider) sits flush, while one that follows prose or a heading is
//! set apart.

use crate::classify::{ClassifiedLine, classify};
use crate::color;
use crate::config::{BubbleBorder, Config};
use crate::css;
use crate::fragment::{Element, Node, Style};
use crate::inline::{self, Mode};
use crate::transcript::ContentBlock;

/// The kind of fragment a line rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A horizontal rule.
    Divider,
    /// A heading paragraph.
    Heading,
    /// A right-aligned user bubble.
    User,
    /// A left-aligned AI bubble.
    Ai,
    /// A narration paragraph.
    Narration,
    /// A line holding a single image.
    Image,
}

impl LineKind {
    /// Returns `true` if a bubble or heading after this kind needs the
    /// separation gap.
    #[must_use]
    pub const fn separates_next(self) -> bool {
        matches!(self, Self::Narration | Self::Heading | Self::Image)
    }
}

/// Renders every line of `block`, threading the previous line kind.
#[must_use]
pub fn render_block(block: &ContentBlock, config: &Config) -> Vec<Node> {
    let mut prev = None;
    block
        .lines()
        .map(|raw| {
            let (node, kind) = render_line(&classify(raw), prev, config);
            prev = Some(kind);
            node
        })
        .collect()
}

/// Renders one classified line.
///
/// `config` should already be normalized.
#[must_use]
pub fn render_line(
    line: &ClassifiedLine,
    prev: Option<LineKind>,
    config: &Config,
) -> (Node, LineKind) {
    let gap = if prev.is_some_and(LineKind::separates_next) {
        config.separation_gap
    } else {
        0.0
    };

    match line {
        ClassifiedLine::Divider => (divider(config), LineKind::Divider),
        ClassifiedLine::Heading { level, text } => {
            (heading(*level, text, gap, config), LineKind::Heading)
        }
        ClassifiedLine::UserTurn(text) => (bubble(Speaker::User, text, gap, config), LineKind::User),
        ClassifiedLine::AiTurn(text) => (bubble(Speaker::Ai, text, gap, config), LineKind::Ai),
        ClassifiedLine::Narration(text) => match inline::standalone_image(text) {
            Some(src) => (inline::image_fragment(src, config, true), LineKind::Image),
            None => (narration(text, config), LineKind::Narration),
        },
    }
}

fn divider(config: &Config) -> Node {
    Element::new("hr")
        .style(
            Style::new()
                .set("border", "none")
                .set(
                    "border-top",
                    format!(
                        "{} {} {}",
                        css::px(config.divider_width),
                        config.divider_style,
                        config.divider_color
                    ),
                )
                .set("margin", format!("{} 0", css::em(config.divider_spacing))),
        )
        .into()
}

fn heading(level: u8, text: &str, gap: f64, config: &Config) -> Node {
    let (size, weight, bottom) = match level {
        1 => (1.5, "800", 0.75),
        2 => (1.25, "700", 0.6),
        _ => (1.1, "600", 0.5),
    };
    Element::new("p")
        .style(
            Style::new()
                .set("margin", format!("{} 0 {} 0", css::em(gap), css::em(bottom)))
                .set("font-size", css::em(size))
                .set("font-weight", weight)
                .set("color", config.heading_color.clone())
                .set("line-height", "1.4"),
        )
        .children(inline::resolve(text, Mode::Full, config))
        .into()
}

fn narration(text: &str, config: &Config) -> Node {
    Element::new("p")
        .style(
            Style::new()
                .set("margin", format!("0 0 {} 0", css::em(config.paragraph_spacing)))
                .set("text-align", config.text_align.as_str())
                .set("word-break", config.word_break.as_str()),
        )
        .children(inline::resolve(text, Mode::Full, config))
        .into()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Speaker {
    User,
    Ai,
}

fn bubble(speaker: Speaker, text: &str, gap: f64, config: &Config) -> Node {
    let (base, gradient_stop, side, name) = match speaker {
        Speaker::User => (
            &config.user_bubble_color,
            &config.user_bubble_gradient_color,
            "right",
            non_empty_or(&config.user_name, "User"),
        ),
        Speaker::Ai => (
            &config.ai_bubble_color,
            &config.ai_bubble_gradient_color,
            "left",
            non_empty_or(&config.char_name, "AI"),
        ),
    };

    let opacity = config.bubble_opacity / 100.0;
    let background = if config.bubble_gradient {
        color::linear_gradient(
            config.bubble_gradient_angle,
            &color::apply_opacity(base, opacity),
            &color::apply_opacity(gradient_stop, opacity),
        )
    } else {
        color::apply_opacity(base, opacity)
    };

    let radius = css::px(config.bubble_radius);
    // top-left, top-right, bottom-right, bottom-left
    let corners = match speaker {
        Speaker::User => format!("{radius} {radius} 0.25em {radius}"),
        Speaker::Ai => format!("{radius} {radius} {radius} 0.25em"),
    };

    let outline = format!(
        "{} solid {}",
        css::px(config.bubble_border_width),
        config.bubble_border_color
    );
    let has_outline = config.bubble_border_width > 0.0;

    let mut style = Style::new()
        .set("display", "inline-block")
        .set("max-width", css::percent(config.bubble_max_width))
        .set(
            "padding",
            format!(
                "{} {}",
                css::em(config.bubble_padding),
                css::em(config.bubble_padding * 1.25)
            ),
        )
        .set("border-radius", corners)
        .set("background", background)
        .set("color", color::contrast_text_color(base))
        .set("text-align", "left")
        .set("word-break", config.word_break.as_str())
        .set("box-sizing", "border-box");
    style = match config.bubble_border {
        BubbleBorder::None => style,
        BubbleBorder::Full => style.set_if(has_outline, "border", outline),
        BubbleBorder::Side if speaker == Speaker::User => {
            style.set_if(has_outline, "border-right", outline)
        }
        BubbleBorder::Side => style.set_if(has_outline, "border-left", outline),
    };

    let mut body = Element::new("div").style(style);
    if config.show_nametag {
        body = body.child(nametag(name, speaker, config));
    }
    let body = body.children(inline::resolve(text, Mode::BubbleReduced, config));

    Element::new("div")
        .style(
            Style::new()
                .set("text-align", side)
                .set(
                    "margin",
                    format!("{} 0 {} 0", css::em(gap), css::em(config.bubble_spacing)),
                ),
        )
        .child(body)
        .into()
}

fn nametag(name: &str, speaker: Speaker, config: &Config) -> Element {
    Element::new("span")
        .style(
            Style::new()
                .set("display", "block")
                .set("margin-bottom", "0.375em")
                .set("font-size", css::em(config.nametag_size))
                .set("font-weight", "600")
                .set("opacity", "0.7")
                .set_if(speaker == Speaker::User, "text-align", "right"),
        )
        .text(name)
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { fallback } else { value }
}
