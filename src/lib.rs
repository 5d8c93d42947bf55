// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Render marker-annotated chat transcripts as self-contained, inline-styled
//! HTML.
//!
//! The output carries every style inline, so it survives being pasted into
//! hosts that strip `<style>` sheets and classes (blogs, forums, rich-text
//! editors).
//!
//! # Overview
//!
//! A transcript is a list of [`ContentBlock`]s. Each line of a block is
//! classified by its leading marker, rendered to a styled fragment, and the
//! fragments are assembled into one container:
//!
//! 1. [`classify`] sorts each line into divider, heading, user turn, AI turn
//!    or narration
//! 2. [`inline`] resolves bold, italic, quotes and images inside a line
//! 3. [`block`] renders a line as a paragraph, heading, rule or chat bubble
//! 4. [`compose`](mod@compose) adds the header and per-block sections and wraps
//!    everything in the themed container
//!
//! The result is a [`fragment::Node`] tree with two writers: [`markup`]
//! produces the portable string and [`preview`] a live, DOM-like tree for
//! on-screen use.
//!
//! # Example
//!
//! ```
//! use chat2html::{Config, ContentBlock, render_markup};
//!
//! let blocks = [ContentBlock::new(0, "Chat", ">> Hi there\n<< Hi!")];
//! let config = Config {
//!     char_name: "Mira".into(),
//!     ..Config::default()
//! };
//!
//! let html = render_markup(&blocks, &config);
//! assert!(html.starts_with("<div style=\"max-width: 800px;"));
//! assert!(html.contains(">Mira</span>Hi there</div>"));
//! ```
//!
//! # Modules
//!
//! - [`transcript`]: content blocks and the JSON block-list reader
//! - [`config`]: the configuration record and its normalization
//! - [`classify`], [`inline`], [`block`], [`compose`](mod@compose): the pipeline stages
//! - [`fragment`], [`markup`], [`preview`]: the output tree and its writers
//! - [`color`], [`css`]: color math and CSS value formatting

#![deny(missing_docs)]

pub mod block;
pub mod classify;
pub mod color;
pub mod compose;
pub mod config;
pub mod css;
pub mod fragment;
pub mod inline;
pub mod markup;
pub mod preview;
pub mod transcript;

pub use compose::{compose, render_markup, render_preview};
pub use config::Config;
pub use transcript::ContentBlock;
