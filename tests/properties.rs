// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Property-based invariant tests for the rendering pipeline.
//!
//! Verifies:
//! 1. Escaping: every `<` in the output opens a tag the pipeline emits, and
//!    every `&` starts an entity
//! 2. Idempotence: the same input always renders to the same bytes
//! 3. Classification is total and its payload comes from the input line
//! 4. The string writer and the live tree agree for any input and config
//! 5. Normalizing a configuration twice changes nothing

use chat2html::classify::{ClassifiedLine, classify};
use chat2html::config::{BadgeStyle, BubbleBorder};
use chat2html::{Config, ContentBlock, render_markup, render_preview};
use proptest::prelude::*;

const EMITTED_TAGS: &[&str] = &[
    "div", "p", "span", "strong", "em", "hr", "img", "details", "summary", "a",
];

const ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&quot;"];

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{1,8}",
        Just("**".to_owned()),
        Just("*".to_owned()),
        Just("\"".to_owned()),
        Just("'".to_owned()),
        Just("\u{201C}".to_owned()),
        Just("\u{201D}".to_owned()),
        Just("\u{2018}".to_owned()),
        Just("\u{2019}".to_owned()),
        Just("<".to_owned()),
        Just(">".to_owned()),
        Just("&".to_owned()),
        Just("<b>x</b>".to_owned()),
        Just("&amp;".to_owned()),
    ]
}

fn arb_line() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just(""),
            Just(">> "),
            Just("<< "),
            Just("# "),
            Just("## "),
            Just("### "),
            Just("---"),
        ],
        prop::collection::vec(arb_fragment(), 0..8),
    )
        .prop_map(|(prefix, parts)| format!("{prefix}{}", parts.concat()))
}

fn arb_transcript() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_line(), 0..8).prop_map(|lines| lines.join("\n"))
}

fn arb_blocks() -> impl Strategy<Value = Vec<ContentBlock>> {
    prop::collection::vec((arb_transcript(), any::<bool>(), any::<bool>()), 1..4).prop_map(
        |blocks| {
            blocks
                .into_iter()
                .zip(0u64..)
                .map(|((content, collapsible, collapsed), id)| ContentBlock {
                    collapsible,
                    collapsed,
                    ..ContentBlock::new(id, format!("Block <{id}>"), content)
                })
                .collect()
        },
    )
}

fn arb_config() -> impl Strategy<Value = Config> {
    (
        "[a-zA-Z<>&\" ]{0,12}",
        prop_oneof![
            Just(BubbleBorder::None),
            Just(BubbleBorder::Full),
            Just(BubbleBorder::Side),
        ],
        prop_oneof![
            Just(BadgeStyle::Filled),
            Just(BadgeStyle::Outline),
            Just(BadgeStyle::Ghost),
        ],
        any::<bool>(),
        -50.0f64..200.0,
        "#[0-9a-f]{6}|[a-z;]{0,6}",
    )
        .prop_map(
            |(title, bubble_border, badge_style, bubble_gradient, bubble_opacity, bg_color)| {
                Config {
                    ai_model: title.clone(),
                    title,
                    bubble_border,
                    badge_style,
                    bubble_gradient,
                    bubble_opacity,
                    bg_color,
                    ..Config::default()
                }
            },
        )
}

fn is_emitted_tag(rest: &str) -> bool {
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    EMITTED_TAGS.iter().any(|tag| {
        rest.strip_prefix(tag)
            .is_some_and(|after| after.starts_with([' ', '>']))
    })
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn user_text_never_becomes_markup(blocks in arb_blocks(), config in arb_config()) {
        let html = render_markup(&blocks, &config);
        for (index, _) in html.match_indices('<') {
            prop_assert!(
                is_emitted_tag(&html[index + 1..]),
                "unexpected markup at {index}: {}",
                html[index..].chars().take(24).collect::<String>()
            );
        }
        for (index, _) in html.match_indices('&') {
            prop_assert!(
                ENTITIES.iter().any(|entity| html[index..].starts_with(entity)),
                "bare ampersand at {index}"
            );
        }
    }

    #[test]
    fn rendering_is_idempotent(blocks in arb_blocks(), config in arb_config()) {
        let before = blocks.clone();
        let first = render_markup(&blocks, &config);
        let second = render_markup(&blocks, &config);
        prop_assert_eq!(first, second);
        prop_assert_eq!(blocks, before);
    }

    #[test]
    fn classification_is_total(line in any::<String>()) {
        let classified = classify(&line);
        let trimmed = line.trim();
        match &classified {
            ClassifiedLine::Divider => prop_assert!(trimmed.len() >= 3),
            ClassifiedLine::Narration(text) => prop_assert_eq!(text.as_str(), trimmed),
            other => prop_assert!(trimmed.contains(other.text())),
        }
    }

    #[test]
    fn classification_of_generated_lines(line in arb_line()) {
        let classified = classify(&line);
        if line.starts_with(">> ") {
            prop_assert!(matches!(classified, ClassifiedLine::AiTurn(_)));
        } else if line.starts_with("<< ") {
            prop_assert!(matches!(classified, ClassifiedLine::UserTurn(_)));
        }
    }

    #[test]
    fn writers_agree(blocks in arb_blocks(), config in arb_config()) {
        let markup = render_markup(&blocks, &config);
        let live = render_preview(&blocks, &config).map(|tree| tree.outer_markup());
        prop_assert_eq!(live.unwrap_or_default(), markup);
    }

    #[test]
    fn normalization_is_stable(
        font_size in any::<f64>(),
        bubble_opacity in any::<f64>(),
        angle in any::<f64>(),
        color in "[#0-9a-fA-Fxyz]{0,8}",
    ) {
        let config = Config {
            font_size,
            bubble_opacity,
            bg_gradient_angle: angle,
            bold_color: color,
            ..Config::default()
        };
        let once = config.normalized();
        prop_assert!((10.0..=32.0).contains(&once.font_size));
        prop_assert!((0.0..=100.0).contains(&once.bubble_opacity));
        prop_assert!((0.0..360.0).contains(&once.bg_gradient_angle));
        prop_assert_eq!(once.normalized(), once);
    }
}
