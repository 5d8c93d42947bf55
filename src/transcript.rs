// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Content blocks and the readers that produce them.
//!
//! A transcript is an ordered list of [`ContentBlock`]s. Hosts usually keep
//! that list as JSON; a plain transcript file becomes a single block.
//!
//! # Block List Format
//!
//! Either a bare array or an object with a `blocks` array. Only `content` is
//! required:
//!
//! ```
//! use chat2html::transcript::parse_blocks;
//!
//! let json = r#"[
//!     { "id": 7, "title": "Prologue", "content": ">> Hello", "collapsible": true },
//!     { "content": "<< Hi" }
//! ]"#;
//!
//! let blocks = parse_blocks(json).unwrap();
//! assert_eq!(blocks[0].id, 7);
//! assert!(blocks[0].collapsible);
//! assert_eq!(blocks[1].title, "Block 2");
//! ```

use crate::inline;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Error type for block-list parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// One independently titled, orderable unit of transcript content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    /// Unique, monotonic identifier.
    pub id: u64,

    /// Title used for section labels and collapsible summaries.
    pub title: String,

    /// Raw transcript text, one logical line per newline-delimited segment.
    pub content: String,

    /// Whether the block renders as a disclosure section.
    pub collapsible: bool,

    /// Whether a collapsible block starts closed.
    pub collapsed: bool,
}

impl ContentBlock {
    /// Creates a plain (non-collapsible) block.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            collapsible: false,
            collapsed: false,
        }
    }

    /// Returns `true` if the block has anything to render.
    ///
    /// Blocks that are blank and hold no image reference are skipped by the
    /// composer but stay in the caller's list.
    #[must_use]
    pub fn is_contentful(&self) -> bool {
        !self.content.trim().is_empty() || inline::contains_image(&self.content)
    }

    /// Iterates over the non-blank lines of the block, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: Option<u64>,
    title: Option<String>,
    content: String,
    #[serde(default)]
    collapsible: bool,
    #[serde(default)]
    collapsed: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BlockList {
    Bare(Vec<RawBlock>),
    Wrapped { blocks: Vec<RawBlock> },
}

/// Parses a JSON block list.
///
/// Missing ids default to the block's position and missing titles to
/// `Block N` (1-based).
///
/// # Errors
///
/// Returns an error if the JSON is malformed, is neither an array nor an
/// object with a `blocks` array, or a block lacks a string `content`.
pub fn parse_blocks(json_str: &str) -> Result<Vec<ContentBlock>, ParseError> {
    let list: BlockList = serde_json::from_str(json_str).context(JsonSnafu)?;
    let raw = match list {
        BlockList::Bare(blocks) | BlockList::Wrapped { blocks } => blocks,
    };

    Ok(raw
        .into_iter()
        .zip(0u64..)
        .map(|(block, index)| ContentBlock {
            id: block.id.unwrap_or(index),
            title: block
                .title
                .unwrap_or_else(|| format!("Block {}", index + 1)),
            content: block.content,
            collapsible: block.collapsible,
            collapsed: block.collapsed,
        })
        .collect())
}

/// Wraps a plain transcript as a single block titled `title`.
#[must_use]
pub fn block_from_text(title: &str, text: &str) -> ContentBlock {
    ContentBlock::new(0, title, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let blocks = parse_blocks(r#"[{"content": "a"}, {"content": "b"}]"#).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, 0);
        assert_eq!(blocks[1].id, 1);
        assert_eq!(blocks[0].title, "Block 1");
    }

    #[test]
    fn parses_wrapped_object() {
        let blocks = parse_blocks(r#"{"blocks": [{"content": "x", "collapsed": true}]}"#).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].collapsed);
        assert!(!blocks[0].collapsible);
    }

    #[test]
    fn keeps_explicit_ids_and_titles() {
        let blocks = parse_blocks(r#"[{"id": 41, "title": "Ch. 1", "content": ""}]"#).unwrap();
        assert_eq!(blocks[0].id, 41);
        assert_eq!(blocks[0].title, "Ch. 1");
    }

    #[test]
    fn returns_error_for_missing_content() {
        assert!(parse_blocks(r#"[{"title": "x"}]"#).is_err());
    }

    #[test]
    fn returns_error_for_invalid_json() {
        assert!(parse_blocks("not valid json").is_err());
    }

    #[test]
    fn blank_block_is_not_contentful() {
        assert!(!ContentBlock::new(0, "t", "  \n\t\n").is_contentful());
        assert!(ContentBlock::new(0, "t", "x").is_contentful());
    }

    #[test]
    fn image_only_block_is_contentful() {
        let block = ContentBlock::new(0, "t", r#"<img src="a.png">"#);
        assert!(block.is_contentful());
    }

    #[test]
    fn lines_skip_blank_and_strip_carriage_returns() {
        let block = ContentBlock::new(0, "t", "one\r\n\r\n  \ntwo\n");
        assert_eq!(block.lines().collect::<Vec<_>>(), ["one", "two"]);
    }

    #[test]
    fn wraps_plain_text() {
        let block = block_from_text("chat", ">> hi");
        assert_eq!(block.title, "chat");
        assert_eq!(block.content, ">> hi");
        assert!(!block.collapsible);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ContentBlock::new(3, "t", "c")).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["collapsible"], false);
    }
}
