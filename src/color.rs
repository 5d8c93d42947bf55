// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Hex color arithmetic used to derive tints, legible text colors,
//! translucent fills and gradients from user-chosen base colors.
//!
//! All functions are pure. Inputs that are not valid hex colors never cause
//! a panic; see each function for its fallback.

use crate::css;

/// Text color used on light backgrounds.
pub const DARK_TEXT: &str = "#1a1a1a";

/// Text color used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#f5f5f5";

/// Parses `#rgb` or `#rrggbb` (the `#` is optional, case-insensitive).
///
/// # Example
///
/// ```
/// use chat2html::color::parse_hex;
///
/// assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
/// assert_eq!(parse_hex("#f80"), Some((255, 136, 0)));
/// assert_eq!(parse_hex("red"), None);
/// ```
#[must_use]
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some((
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        )),
        3 => Some((
            u8::from_str_radix(&digits[0..1], 16).ok()? * 17,
            u8::from_str_radix(&digits[1..2], 16).ok()? * 17,
            u8::from_str_radix(&digits[2..3], 16).ok()? * 17,
        )),
        _ => None,
    }
}

/// Formats an RGB triple as lowercase `#rrggbb`.
#[must_use]
pub fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Returns `value` as canonical `#rrggbb`, or `fallback` if it does not parse.
#[must_use]
pub fn sanitize_hex(value: &str, fallback: &str) -> String {
    parse_hex(value).map_or_else(|| fallback.to_owned(), to_hex)
}

/// Shifts each channel of `hex` by `amount`, clamped to `[0, 255]`.
///
/// Unparsable input is treated as black.
///
/// # Example
///
/// ```
/// use chat2html::color::adjust_color;
///
/// assert_eq!(adjust_color("#101010", 16), "#202020");
/// assert_eq!(adjust_color("#ffffff", 12), "#ffffff");
/// assert_eq!(adjust_color("#050505", -10), "#000000");
/// ```
#[must_use]
pub fn adjust_color(hex: &str, amount: i32) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let shift = |channel: u8| -> u8 {
        u8::try_from(i32::from(channel).saturating_add(amount).clamp(0, 255)).unwrap_or(u8::MAX)
    };
    to_hex((shift(r), shift(g), shift(b)))
}

/// Perceptual luma `(299R + 587G + 114B) / 1000` of a hex color.
#[must_use]
pub fn luma(hex: &str) -> f64 {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    (299.0 * f64::from(r) + 587.0 * f64::from(g) + 114.0 * f64::from(b)) / 1000.0
}

/// Picks a legible text color for the given background.
///
/// Luma strictly above 128 selects [`DARK_TEXT`]; everything else, including
/// a luma of exactly 128, selects [`LIGHT_TEXT`].
///
/// # Example
///
/// ```
/// use chat2html::color::{contrast_text_color, DARK_TEXT, LIGHT_TEXT};
///
/// assert_eq!(contrast_text_color("#ffffff"), DARK_TEXT);
/// assert_eq!(contrast_text_color("#000000"), LIGHT_TEXT);
/// ```
#[must_use]
pub fn contrast_text_color(hex: &str) -> &'static str {
    if luma(hex) > 128.0 { DARK_TEXT } else { LIGHT_TEXT }
}

/// Converts a hex color to `rgba(r, g, b, alpha)`.
///
/// `alpha` is clamped to `[0, 1]`; unparsable colors are treated as black.
#[must_use]
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let alpha = css::clamp_number(alpha, 0.0, 1.0);
    format!("rgba({r}, {g}, {b}, {})", css::num(alpha))
}

/// Applies `opacity` (0-1) to a solid color.
///
/// At full opacity the color is returned unchanged, keeping `rgba()` noise
/// out of the output.
#[must_use]
pub fn apply_opacity(color: &str, opacity: f64) -> String {
    if opacity.is_finite() && opacity >= 1.0 {
        color.to_owned()
    } else {
        hex_to_rgba(color, opacity)
    }
}

/// Builds a two-stop linear gradient; `angle` is normalized into `[0, 360)`.
#[must_use]
pub fn linear_gradient(angle: f64, from: &str, to: &str) -> String {
    format!(
        "linear-gradient({}deg, {from} 0%, {to} 100%)",
        css::num(css::normalize_angle(angle, 0.0))
    )
}

/// Builds a two-stop circular radial gradient.
#[must_use]
pub fn radial_gradient(from: &str, to: &str) -> String {
    format!("radial-gradient(circle, {from} 0%, {to} 100%)")
}
