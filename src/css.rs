// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Numeric coercion and CSS value formatting.
//!
//! Every number that ends up inside a `style` attribute passes through this
//! module, so a `NaN` or an out-of-range slider value can never leak into the
//! generated markup.

/// Clamps `value` into `[min, max]`.
///
/// Non-finite input (`NaN`, infinities) falls back to `min`.
///
/// # Example
///
/// ```
/// use chat2html::css::clamp_number;
///
/// assert_eq!(clamp_number(150.0, 0.0, 100.0), 100.0);
/// assert_eq!(clamp_number(f64::NAN, 0.0, 100.0), 0.0);
/// ```
#[must_use]
pub fn clamp_number(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

/// Normalizes an angle in degrees into `[0, 360)`.
///
/// Non-finite input yields `fallback` (itself normalized).
#[must_use]
pub fn normalize_angle(value: f64, fallback: f64) -> f64 {
    let angle = if value.is_finite() { value } else { fallback };
    if !angle.is_finite() {
        return 0.0;
    }
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Formats a number for use in CSS.
///
/// Rounds to three decimals and drops trailing zeros, so `16.0` becomes
/// `16` and `1.250` becomes `1.25`.
#[must_use]
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    if rounded.abs() < f64::EPSILON {
        return "0".to_owned();
    }
    format!("{rounded}")
}

/// Formats `value` followed by `unit`, e.g. `px(16.0)` is `16px`.
///
/// Zero lengths are written bare (`0`).
#[must_use]
pub fn px(value: f64) -> String {
    with_unit(value, "px")
}

/// Formats `value` in `em`.
#[must_use]
pub fn em(value: f64) -> String {
    with_unit(value, "em")
}

/// Formats `value` as a percentage.
#[must_use]
pub fn percent(value: f64) -> String {
    with_unit(value, "%")
}

fn with_unit(value: f64, unit: &str) -> String {
    let number = num(value);
    if number == "0" {
        number
    } else {
        format!("{number}{unit}")
    }
}
