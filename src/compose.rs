// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Document composer: assembles blocks into one styled container.
//!
//! # Document Structure
//!
//! ```text
//! container div
//! ├── header panel            (only when a header field is set)
//! │   ├── character badge     (only with both title and character name)
//! │   ├── title
//! │   └── badges              (model, prompt, sub-model)
//! └── per contentful block:
//!     ├── details/summary     (collapsible blocks)
//!     ├── labeled section     (several blocks)
//!     └── bare line fragments (a single plain block)
//! ```
//!
//! Composition works on a normalized copy of the configuration, so callers
//! may pass values straight from a settings form.

use crate::block;
use crate::color;
use crate::config::{BackgroundMode, BadgeShape, BadgeStyle, Config};
use crate::css;
use crate::fragment::{Element, Node, Style};
use crate::markup;
use crate::preview::{self, PreviewNode};
use crate::transcript::ContentBlock;
use tracing::debug;

/// Composes `blocks` into the root container fragment.
///
/// Returns `None` when no block is contentful. Blocks that are skipped stay
/// untouched in the caller's list.
#[must_use]
pub fn compose(blocks: &[ContentBlock], config: &Config) -> Option<Node> {
    let config = config.normalized();
    let contentful: Vec<&ContentBlock> = blocks.iter().filter(|b| b.is_contentful()).collect();

    debug!(
        blocks = blocks.len(),
        contentful = contentful.len(),
        header = config.has_header(),
        "composing document"
    );

    if contentful.is_empty() {
        return None;
    }

    let mut root = Element::new("div").style(container_style(&config));
    if config.has_header() {
        root = root.child(header(&config));
    }

    let sectioned = contentful.len() > 1;
    for (index, content_block) in contentful.into_iter().enumerate() {
        let lines = block::render_block(content_block, &config);
        if content_block.collapsible {
            root = root.child(collapsible_section(content_block, index, lines, &config));
        } else if sectioned {
            root = root.child(labeled_section(content_block, index, lines, &config));
        } else {
            root = root.children(lines);
        }
    }

    Some(root.into())
}

/// Composes `blocks` and serializes the result; empty when nothing renders.
#[must_use]
pub fn render_markup(blocks: &[ContentBlock], config: &Config) -> String {
    compose(blocks, config)
        .map(|node| markup::to_markup(&node))
        .unwrap_or_default()
}

/// Composes `blocks` into a live preview tree.
#[must_use]
pub fn render_preview(blocks: &[ContentBlock], config: &Config) -> Option<PreviewNode> {
    compose(blocks, config).map(|node| preview::build(&node))
}

fn container_style(config: &Config) -> Style {
    let background = match config.bg_mode {
        BackgroundMode::Solid => config.bg_color.clone(),
        BackgroundMode::Linear => color::linear_gradient(
            config.bg_gradient_angle,
            &config.bg_color,
            &config.bg_gradient_color,
        ),
        BackgroundMode::Radial => {
            color::radial_gradient(&config.bg_color, &config.bg_gradient_color)
        }
    };
    let shadow = config.box_shadow && config.shadow_intensity > 0.0;

    Style::new()
        .set("max-width", css::px(config.container_width))
        .set("margin", format!("{} auto", css::em(config.container_margin)))
        .set("padding", css::em(config.container_padding))
        .set("background", background)
        .set("color", config.text_color.clone())
        .set("font-family", font_stack(&config.font_family))
        .set("font-size", css::px(config.font_size))
        .set("line-height", css::num(config.line_height))
        .set("letter-spacing", css::em(config.letter_spacing))
        .set("border-radius", css::px(config.border_radius))
        .set("box-sizing", "border-box")
        .set_if(
            config.border_width > 0.0,
            "border",
            format!(
                "{} {} {}",
                css::px(config.border_width),
                config.border_style,
                config.border_color
            ),
        )
        .set_if(
            shadow,
            "box-shadow",
            format!(
                "0 {} {} {}",
                css::px(config.shadow_offset_y),
                css::px(config.shadow_blur),
                color::hex_to_rgba("#000000", config.shadow_intensity / 100.0)
            ),
        )
}

/// Keeps a font stack from closing the declaration it sits in.
fn font_stack(family: &str) -> String {
    let cleaned: String = family
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "sans-serif".to_owned()
    } else {
        cleaned.to_owned()
    }
}

fn header(config: &Config) -> Node {
    let title = config.title.trim();
    let char_name = config.char_name.trim();

    let mut panel = Element::new("div").style(
        Style::new()
            .set("margin-bottom", "1.5em")
            .set("padding", "1.5em")
            .set(
                "background",
                color::linear_gradient(
                    135.0,
                    &color::adjust_color(&config.bg_color, 12),
                    &color::adjust_color(&config.bg_color, 6),
                ),
            )
            .set("border-radius", css::px(config.header_radius))
            .set(
                "border",
                format!(
                    "1px solid {}",
                    color::hex_to_rgba(&color::adjust_color(&config.bg_color, 25), 0.25)
                ),
            ),
    );

    // With a title the character name becomes a badge; without one it is
    // promoted to the title.
    let heading = if title.is_empty() { char_name } else { title };
    if !title.is_empty() && !char_name.is_empty() {
        panel = panel.child(
            Element::new("div")
                .style(Style::new().set("margin-bottom", "0.5em"))
                .child(badge(char_name, &config.char_color, config)),
        );
    }
    if !heading.is_empty() {
        panel = panel.child(title_element(heading, config));
    }

    let badges: Vec<Node> = [
        (&config.ai_model, &config.badge_model_color),
        (&config.prompt_name, &config.badge_prompt_color),
        (&config.sub_model, &config.badge_sub_color),
    ]
    .into_iter()
    .filter(|(text, _)| !text.trim().is_empty())
    .map(|(text, badge_color)| badge(text.trim(), badge_color, config))
    .collect();

    if !badges.is_empty() {
        panel = panel.child(
            Element::new("div")
                .style(Style::new().set_if(!heading.is_empty(), "margin-top", "1em"))
                .children(badges),
        );
    }

    panel.into()
}

fn title_element(text: &str, config: &Config) -> Element {
    let title = Element::new("div").style(
        Style::new()
            .set("margin", "0")
            .set("font-size", css::em(config.title_size))
            .set("font-weight", "800")
            .set("color", config.char_color.clone())
            .set("letter-spacing", "-0.02em")
            .set("line-height", "1.3"),
    );

    let link = config.char_link.trim();
    if link.is_empty() {
        title.text(text)
    } else {
        title.child(
            Element::new("a")
                .attr("href", link)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .style(
                    Style::new()
                        .set("color", "inherit")
                        .set("text-decoration", "none"),
                )
                .text(text),
        )
    }
}

fn badge(text: &str, badge_color: &str, config: &Config) -> Node {
    let scale = config.badge_scale / 100.0;
    let radius = match config.badge_shape {
        BadgeShape::Pill => "999px",
        BadgeShape::Rounded => "6px",
        BadgeShape::Square => "0",
    };

    let style = Style::new()
        .set("display", "inline-block")
        .set("margin", "0 8px 8px 0")
        .set(
            "padding",
            format!("{} {}", css::px(6.0 * scale), css::px(12.0 * scale)),
        )
        .set("border-radius", radius)
        .set("font-size", css::em(0.75 * scale))
        .set("font-weight", "600")
        .set("line-height", "1.2")
        .set("text-align", "center")
        .set("box-sizing", "border-box");

    let style = match config.badge_style {
        BadgeStyle::Filled => style
            .set("background", badge_color)
            .set("color", color::contrast_text_color(badge_color))
            .set("border", format!("1px solid {badge_color}")),
        BadgeStyle::Outline => style
            .set("background", "transparent")
            .set("color", badge_color)
            .set("border", format!("1px solid {badge_color}")),
        BadgeStyle::Ghost => style
            .set("background", color::hex_to_rgba(badge_color, 0.15))
            .set("color", badge_color)
            .set("border", "1px solid transparent"),
    };

    Element::new("span").style(style).text(text).into()
}

fn collapsible_section(
    content_block: &ContentBlock,
    index: usize,
    lines: Vec<Node>,
    config: &Config,
) -> Node {
    let top = if index > 0 { "1.5em" } else { "0" };
    let prefix = config.summary_prefix.trim();
    let summary_text = if prefix.is_empty() {
        content_block.title.clone()
    } else {
        format!("{prefix} {}", content_block.title)
    };

    let mut details = Element::new("details");
    if !content_block.collapsed {
        details = details.attr("open", "");
    }

    details
        .style(
            Style::new()
                .set("margin", format!("{top} 0"))
                .set(
                    "border",
                    format!("1px solid {}", color::adjust_color(&config.bg_color, 30)),
                )
                .set("border-radius", css::px(config.section_radius))
                .set("overflow", "hidden"),
        )
        .child(
            Element::new("summary")
                .style(
                    Style::new()
                        .set("padding", "1em 1.25em")
                        .set("background", color::adjust_color(&config.bg_color, 10))
                        .set("cursor", "pointer")
                        .set("font-weight", "600")
                        .set("font-size", "1.1em")
                        .set("color", config.char_color.clone())
                        .set("list-style", "none")
                        .set("display", "flex")
                        .set("align-items", "center")
                        .set("gap", "0.5em"),
                )
                .text(summary_text),
        )
        .child(
            Element::new("div")
                .style(Style::new().set("padding", "1.25em"))
                .children(lines),
        )
        .into()
}

fn labeled_section(
    content_block: &ContentBlock,
    index: usize,
    lines: Vec<Node>,
    config: &Config,
) -> Node {
    let follows = index > 0;
    Element::new("div")
        .style(
            Style::new()
                .set("margin", if follows { "2em 0 0 0" } else { "0" })
                .set_if(follows, "padding-top", "1.5em")
                .set_if(
                    follows,
                    "border-top",
                    format!("1px solid {}", color::adjust_color(&config.bg_color, 25)),
                ),
        )
        .child(
            Element::new("p")
                .style(
                    Style::new()
                        .set("margin", "0 0 1em 0")
                        .set("font-size", "0.75em")
                        .set("font-weight", "600")
                        .set("text-transform", "uppercase")
                        .set("letter-spacing", "0.1em")
                        .set("color", config.label_color.clone()),
                )
                .text(content_block.title.clone()),
        )
        .children(lines)
        .into()
}
