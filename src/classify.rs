// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Line classification for marker-annotated transcripts.
//!
//! Each non-blank physical line is one of five kinds, tested in this order
//! (first match wins):
//!
//! | Input line     | Classified as                      |
//! |----------------|------------------------------------|
//! | `---`          | [`ClassifiedLine::Divider`]        |
//! | `## Title`     | [`ClassifiedLine::Heading`], level 2 |
//! | `<< hello`     | [`ClassifiedLine::UserTurn`]       |
//! | `>> hi there`  | [`ClassifiedLine::AiTurn`]         |
//! | `just text`    | [`ClassifiedLine::Narration`]      |
//!
//! Classification is total: every string maps to exactly one variant.

use tracing::trace;

/// One classified transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// Three or more `-`, `=` or `*` alone on the line.
    Divider,
    /// `#`, `##` or `###` followed by whitespace.
    Heading {
        /// Number of leading `#` characters (1-3).
        level: u8,
        /// Heading text.
        text: String,
    },
    /// A line starting with `<<`.
    UserTurn(String),
    /// A line starting with `>>`.
    AiTurn(String),
    /// Any other line.
    Narration(String),
}

impl ClassifiedLine {
    /// Returns the payload text; empty for dividers.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Divider => "",
            Self::Heading { text, .. } => text,
            Self::UserTurn(text) | Self::AiTurn(text) | Self::Narration(text) => text,
        }
    }
}

/// Classifies one raw line.
///
/// # Example
///
/// ```
/// use chat2html::classify::{classify, ClassifiedLine};
///
/// assert_eq!(classify("<< hello"), ClassifiedLine::UserTurn("hello".into()));
/// assert_eq!(
///     classify("## Title"),
///     ClassifiedLine::Heading { level: 2, text: "Title".into() }
/// );
/// ```
#[must_use]
pub fn classify(raw: &str) -> ClassifiedLine {
    let line = raw.trim();

    let classified = if is_divider(line) {
        ClassifiedLine::Divider
    } else if let Some((level, text)) = heading(line) {
        ClassifiedLine::Heading {
            level,
            text: text.to_owned(),
        }
    } else if let Some(rest) = line.strip_prefix("<<") {
        ClassifiedLine::UserTurn(rest.trim_start().to_owned())
    } else if let Some(rest) = line.strip_prefix(">>") {
        ClassifiedLine::AiTurn(rest.trim_start().to_owned())
    } else {
        ClassifiedLine::Narration(line.to_owned())
    };

    trace!(?classified, "classified line");
    classified
}

/// Returns `true` for three or more repetitions of one of `-`, `=`, `*`.
fn is_divider(line: &str) -> bool {
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '=' | '*') && line.len() >= 3 && chars.all(|c| c == first)
}

/// Splits a heading into its level and trimmed text.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let level = u8::try_from(hashes).ok()?;
    Some((level, rest.trim()))
}
