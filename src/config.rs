// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! The configuration record: every style parameter the pipeline reads.
//!
//! Settings UIs, presets and persistence layers read and write this record
//! as a whole; the pipeline only ever reads it. Decoding is lenient:
//!
//! - unknown keys are ignored and missing keys take their default
//! - numbers accept numeric strings; anything else becomes non-numeric and
//!   is clamped to the range minimum by [`Config::normalized`]
//! - flags accept `true`/`false`, `"true"`/`"false"`, `"on"`/`"off"` and
//!   numbers
//! - keyword settings (alignment, styles, shapes) accept any string and fall
//!   back to their default on unknown values
//!
//! # Example
//!
//! ```
//! use chat2html::config::{BackgroundMode, Config};
//!
//! let config = Config::from_json(r#"{
//!     "bgMode": "linear",
//!     "shadowIntensity": "250",
//!     "bgColor": "not a color",
//!     "someFutureKey": 1
//! }"#).unwrap();
//!
//! let config = config.normalized();
//! assert_eq!(config.bg_mode, BackgroundMode::Linear);
//! assert_eq!(config.shadow_intensity, 100.0);
//! assert_eq!(config.bg_color, "#ffffff");
//! ```

use crate::{color, css};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::prelude::*;
use std::fmt;
use tracing::debug;

/// Error type for configuration decoding failures.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// The configuration is not valid JSON.
    #[snafu(display("failed to parse configuration JSON: {source}"))]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The configuration root is not a JSON object.
    #[snafu(display("configuration must be a JSON object, found {found}"))]
    NotAnObject {
        /// The kind of JSON value that was found instead.
        found: &'static str,
    },
}

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $keyword:literal, )+
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Returns the keyword as written in configuration and CSS.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $keyword, )+
                }
            }

            /// Parses a keyword, ignoring case and surrounding whitespace.
            #[must_use]
            pub fn from_keyword(keyword: &str) -> Option<Self> {
                let keyword = keyword.trim();
                $(
                    if keyword.eq_ignore_ascii_case($keyword) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = serde_json::Value::deserialize(deserializer)?;
                Ok(value
                    .as_str()
                    .and_then(Self::from_keyword)
                    .unwrap_or_default())
            }
        }
    };
}

keyword_enum! {
    /// Paragraph text alignment.
    TextAlign {
        /// Justified text.
        Justify => "justify",
        /// Left-aligned text.
        Left => "left",
        /// Centered text.
        Center => "center",
        /// Right-aligned text.
        Right => "right",
    }
    default = Justify
}

keyword_enum! {
    /// Line-breaking policy for paragraphs and bubbles.
    WordBreak {
        /// Never break inside words (suits CJK text).
        KeepAll => "keep-all",
        /// Browser default.
        Normal => "normal",
        /// Break anywhere.
        BreakAll => "break-all",
    }
    default = KeepAll
}

keyword_enum! {
    /// CSS border style for the container and dividers.
    BorderStyle {
        /// Solid line.
        Solid => "solid",
        /// Dashed line.
        Dashed => "dashed",
        /// Dotted line.
        Dotted => "dotted",
        /// Double line.
        Double => "double",
    }
    default = Solid
}

keyword_enum! {
    /// Container background painting.
    BackgroundMode {
        /// Flat `bgColor`.
        Solid => "solid",
        /// Two-stop linear gradient at `bgGradientAngle`.
        Linear => "linear",
        /// Two-stop circular radial gradient.
        Radial => "radial",
    }
    default = Solid
}

keyword_enum! {
    /// Visual style of header badges.
    BadgeStyle {
        /// Solid fill with contrasting text.
        Filled => "filled",
        /// Transparent fill with a colored outline.
        Outline => "outline",
        /// Tinted translucent fill with colored text.
        Ghost => "ghost",
    }
    default = Filled
}

keyword_enum! {
    /// Corner shape of header badges.
    BadgeShape {
        /// Fully rounded ends.
        Pill => "pill",
        /// Slightly rounded corners.
        Rounded => "rounded",
        /// Square corners.
        Square => "square",
    }
    default = Pill
}

keyword_enum! {
    /// Bubble outline.
    BubbleBorder {
        /// No outline.
        None => "none",
        /// Outline on all four sides.
        Full => "full",
        /// A single rule on the tail side.
        Side => "side",
    }
    default = None
}

keyword_enum! {
    /// Horizontal placement of embedded images.
    ImageAlign {
        /// Centered.
        Center => "center",
        /// Flush left.
        Left => "left",
        /// Flush right.
        Right => "right",
    }
    default = Center
}

/// The full set of style parameters.
///
/// Field names map to camelCase JSON keys (`bg_color` is `bgColor`). Colors
/// are `#rrggbb` strings; sizes are plain numbers in the unit noted on each
/// field. Call [`Config::normalized`] before rendering; the composer does
/// this itself.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    // Header text
    /// Document title shown in the header.
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    /// Character name: a badge above the title, or the title itself.
    #[serde(deserialize_with = "lenient::text")]
    pub char_name: String,
    /// Optional link for the header title.
    #[serde(deserialize_with = "lenient::text")]
    pub char_link: String,
    /// Name tag for user bubbles (defaults to "User" when empty).
    #[serde(deserialize_with = "lenient::text")]
    pub user_name: String,
    /// Model badge text.
    #[serde(deserialize_with = "lenient::text")]
    pub ai_model: String,
    /// Prompt badge text.
    #[serde(deserialize_with = "lenient::text")]
    pub prompt_name: String,
    /// Sub-model badge text.
    #[serde(deserialize_with = "lenient::text")]
    pub sub_model: String,

    // Base colors
    /// Container background.
    #[serde(deserialize_with = "lenient::text")]
    pub bg_color: String,
    /// Body text.
    #[serde(deserialize_with = "lenient::text")]
    pub text_color: String,
    /// Header title and collapsible summaries.
    #[serde(deserialize_with = "lenient::text")]
    pub char_color: String,
    /// Transcript headings.
    #[serde(deserialize_with = "lenient::text")]
    pub heading_color: String,
    /// Bold spans in narration.
    #[serde(deserialize_with = "lenient::text")]
    pub bold_color: String,
    /// Italic spans in narration.
    #[serde(deserialize_with = "lenient::text")]
    pub italic_color: String,
    /// Dialogue span text.
    #[serde(deserialize_with = "lenient::text")]
    pub dialogue_color: String,
    /// Dialogue span background.
    #[serde(deserialize_with = "lenient::text")]
    pub dialogue_bg_color: String,
    /// Secondary quote span text.
    #[serde(deserialize_with = "lenient::text")]
    pub quote_color: String,
    /// Secondary quote span background.
    #[serde(deserialize_with = "lenient::text")]
    pub quote_bg_color: String,
    /// Divider rules.
    #[serde(deserialize_with = "lenient::text")]
    pub divider_color: String,
    /// Per-block section labels.
    #[serde(deserialize_with = "lenient::text")]
    pub label_color: String,

    // Typography
    /// CSS font stack.
    #[serde(deserialize_with = "lenient::text")]
    pub font_family: String,
    /// Base font size, px (10-32).
    #[serde(deserialize_with = "lenient::number")]
    pub font_size: f64,
    /// Unitless line height (1-3).
    #[serde(deserialize_with = "lenient::number")]
    pub line_height: f64,
    /// Letter spacing, em (-0.1-0.5).
    #[serde(deserialize_with = "lenient::number")]
    pub letter_spacing: f64,
    /// Narration alignment.
    pub text_align: TextAlign,
    /// Line-breaking policy.
    pub word_break: WordBreak,
    /// Space below paragraphs, em (0-4).
    #[serde(deserialize_with = "lenient::number")]
    pub paragraph_spacing: f64,

    // Container
    /// Maximum width, px (320-1600).
    #[serde(deserialize_with = "lenient::number")]
    pub container_width: f64,
    /// Inner padding, em (0-6).
    #[serde(deserialize_with = "lenient::number")]
    pub container_padding: f64,
    /// Vertical outer margin, em (0-6).
    #[serde(deserialize_with = "lenient::number")]
    pub container_margin: f64,
    /// Corner radius, px (0-64).
    #[serde(deserialize_with = "lenient::number")]
    pub border_radius: f64,
    /// Border width, px (0-12); 0 disables the border.
    #[serde(deserialize_with = "lenient::number")]
    pub border_width: f64,
    /// Border line style.
    pub border_style: BorderStyle,
    /// Border color.
    #[serde(deserialize_with = "lenient::text")]
    pub border_color: String,
    /// Whether to draw a drop shadow.
    #[serde(deserialize_with = "lenient::flag")]
    pub box_shadow: bool,
    /// Shadow opacity, percent (0-100); 0 omits the shadow.
    #[serde(deserialize_with = "lenient::number")]
    pub shadow_intensity: f64,
    /// Shadow blur radius, px (0-96).
    #[serde(deserialize_with = "lenient::number")]
    pub shadow_blur: f64,
    /// Shadow vertical offset, px (-48-48).
    #[serde(deserialize_with = "lenient::number")]
    pub shadow_offset_y: f64,
    /// Background painting mode.
    pub bg_mode: BackgroundMode,
    /// Second gradient stop.
    #[serde(deserialize_with = "lenient::text")]
    pub bg_gradient_color: String,
    /// Linear gradient angle, degrees.
    #[serde(deserialize_with = "lenient::number")]
    pub bg_gradient_angle: f64,

    // Header
    /// Header panel corner radius, px (0-64).
    #[serde(deserialize_with = "lenient::number")]
    pub header_radius: f64,
    /// Header title size, em (0.8-4).
    #[serde(deserialize_with = "lenient::number")]
    pub title_size: f64,
    /// Badge visual style.
    pub badge_style: BadgeStyle,
    /// Badge corner shape.
    pub badge_shape: BadgeShape,
    /// Badge size, percent (50-200); scales padding and font size together.
    #[serde(deserialize_with = "lenient::number")]
    pub badge_scale: f64,
    /// Model badge color.
    #[serde(deserialize_with = "lenient::text")]
    pub badge_model_color: String,
    /// Prompt badge color.
    #[serde(deserialize_with = "lenient::text")]
    pub badge_prompt_color: String,
    /// Sub-model badge color.
    #[serde(deserialize_with = "lenient::text")]
    pub badge_sub_color: String,

    // Bubbles
    /// AI bubble base color.
    #[serde(deserialize_with = "lenient::text")]
    pub ai_bubble_color: String,
    /// User bubble base color.
    #[serde(deserialize_with = "lenient::text")]
    pub user_bubble_color: String,
    /// AI bubble second gradient stop.
    #[serde(deserialize_with = "lenient::text")]
    pub ai_bubble_gradient_color: String,
    /// User bubble second gradient stop.
    #[serde(deserialize_with = "lenient::text")]
    pub user_bubble_gradient_color: String,
    /// Whether bubbles use a gradient fill.
    #[serde(deserialize_with = "lenient::flag")]
    pub bubble_gradient: bool,
    /// Bubble gradient angle, degrees.
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_gradient_angle: f64,
    /// Bubble fill opacity, percent (0-100).
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_opacity: f64,
    /// Bubble corner radius, px (0-48).
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_radius: f64,
    /// Bubble vertical padding, em (0.25-3); horizontal is 1.25x.
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_padding: f64,
    /// Bubble maximum width, percent (30-100).
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_max_width: f64,
    /// Space below each bubble, em (0-3).
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_spacing: f64,
    /// Bubble outline mode.
    pub bubble_border: BubbleBorder,
    /// Bubble outline width, px (0-8).
    #[serde(deserialize_with = "lenient::number")]
    pub bubble_border_width: f64,
    /// Bubble outline color.
    #[serde(deserialize_with = "lenient::text")]
    pub bubble_border_color: String,
    /// Whether bubbles carry a speaker name tag.
    #[serde(deserialize_with = "lenient::flag")]
    pub show_nametag: bool,
    /// Name tag size, em (0.5-1.5).
    #[serde(deserialize_with = "lenient::number")]
    pub nametag_size: f64,
    /// Extra top margin separating bubbles and headings from prose, em (0-4).
    #[serde(deserialize_with = "lenient::number")]
    pub separation_gap: f64,

    // Dividers
    /// Divider line style.
    pub divider_style: BorderStyle,
    /// Divider thickness, px (1-8).
    #[serde(deserialize_with = "lenient::number")]
    pub divider_width: f64,
    /// Space above and below dividers, em (0-4).
    #[serde(deserialize_with = "lenient::number")]
    pub divider_spacing: f64,

    // Images
    /// Image placement.
    pub image_align: ImageAlign,
    /// Image maximum width, percent (10-100).
    #[serde(deserialize_with = "lenient::number")]
    pub image_max_width: f64,
    /// Image corner radius, px (0-48).
    #[serde(deserialize_with = "lenient::number")]
    pub image_radius: f64,
    /// Image border width, px (0-8).
    #[serde(deserialize_with = "lenient::number")]
    pub image_border_width: f64,
    /// Image border color.
    #[serde(deserialize_with = "lenient::text")]
    pub image_border_color: String,
    /// Whether images get a soft shadow.
    #[serde(deserialize_with = "lenient::flag")]
    pub image_shadow: bool,

    // Blocks
    /// Collapsible section corner radius, px (0-48).
    #[serde(deserialize_with = "lenient::number")]
    pub section_radius: f64,
    /// Marker written before collapsible section titles.
    #[serde(deserialize_with = "lenient::text")]
    pub summary_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            char_name: String::new(),
            char_link: String::new(),
            user_name: String::new(),
            ai_model: String::new(),
            prompt_name: String::new(),
            sub_model: String::new(),

            bg_color: "#ffffff".into(),
            text_color: "#18181b".into(),
            char_color: "#18181b".into(),
            heading_color: "#18181b".into(),
            bold_color: "#dc2626".into(),
            italic_color: "#6366f1".into(),
            dialogue_color: "#059669".into(),
            dialogue_bg_color: "#ecfdf5".into(),
            quote_color: "#7c3aed".into(),
            quote_bg_color: "#f5f3ff".into(),
            divider_color: "#e4e4e7".into(),
            label_color: "#71717a".into(),

            font_family: "Pretendard, sans-serif".into(),
            font_size: 16.0,
            line_height: 1.8,
            letter_spacing: 0.0,
            text_align: TextAlign::Justify,
            word_break: WordBreak::KeepAll,
            paragraph_spacing: 1.2,

            container_width: 800.0,
            container_padding: 2.0,
            container_margin: 0.0,
            border_radius: 16.0,
            border_width: 0.0,
            border_style: BorderStyle::Solid,
            border_color: "#e4e4e7".into(),
            box_shadow: true,
            shadow_intensity: 30.0,
            shadow_blur: 24.0,
            shadow_offset_y: 4.0,
            bg_mode: BackgroundMode::Solid,
            bg_gradient_color: "#f4f4f5".into(),
            bg_gradient_angle: 135.0,

            header_radius: 16.0,
            title_size: 1.5,
            badge_style: BadgeStyle::Filled,
            badge_shape: BadgeShape::Pill,
            badge_scale: 100.0,
            badge_model_color: "#18181b".into(),
            badge_prompt_color: "#71717a".into(),
            badge_sub_color: "#a1a1aa".into(),

            ai_bubble_color: "#f4f4f5".into(),
            user_bubble_color: "#dbeafe".into(),
            ai_bubble_gradient_color: "#e4e4e7".into(),
            user_bubble_gradient_color: "#bfdbfe".into(),
            bubble_gradient: false,
            bubble_gradient_angle: 135.0,
            bubble_opacity: 100.0,
            bubble_radius: 16.0,
            bubble_padding: 1.0,
            bubble_max_width: 85.0,
            bubble_spacing: 0.5,
            bubble_border: BubbleBorder::None,
            bubble_border_width: 1.0,
            bubble_border_color: "#d4d4d8".into(),
            show_nametag: true,
            nametag_size: 0.75,
            separation_gap: 1.5,

            divider_style: BorderStyle::Solid,
            divider_width: 1.0,
            divider_spacing: 1.5,

            image_align: ImageAlign::Center,
            image_max_width: 100.0,
            image_radius: 8.0,
            image_border_width: 0.0,
            image_border_color: "#e4e4e7".into(),
            image_shadow: false,

            section_radius: 12.0,
            summary_prefix: "▼".into(),
        }
    }
}

impl Config {
    /// Decodes a configuration record from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is malformed or its root is not an object.
    /// Individual values never cause an error; see the module docs.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json).context(JsonSnafu)?;
        ensure!(
            value.is_object(),
            NotAnObjectSnafu {
                found: json_kind(&value)
            }
        );
        serde_json::from_value(value).context(JsonSnafu)
    }

    /// Returns a copy that is safe to embed in generated markup.
    ///
    /// Colors that are not valid hex are replaced by the key's default and
    /// written as lowercase `#rrggbb`; sizes, percentages and opacities are
    /// clamped to their declared ranges; angles are normalized into
    /// `[0, 360)`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();

        macro_rules! colors {
            ($($field:ident),+ $(,)?) => {$(
                out.$field = color::sanitize_hex(&self.$field, &defaults.$field);
                if out.$field != self.$field.trim() {
                    debug!(key = stringify!($field), value = %self.$field, "coerced color");
                }
            )+};
        }

        macro_rules! ranges {
            ($($field:ident: $min:expr, $max:expr);+ $(;)?) => {$(
                out.$field = css::clamp_number(self.$field, $min, $max);
                if out.$field.to_bits() != self.$field.to_bits() {
                    debug!(key = stringify!($field), value = self.$field, "clamped value");
                }
            )+};
        }

        colors!(
            bg_color,
            text_color,
            char_color,
            heading_color,
            bold_color,
            italic_color,
            dialogue_color,
            dialogue_bg_color,
            quote_color,
            quote_bg_color,
            divider_color,
            label_color,
            border_color,
            bg_gradient_color,
            badge_model_color,
            badge_prompt_color,
            badge_sub_color,
            ai_bubble_color,
            user_bubble_color,
            ai_bubble_gradient_color,
            user_bubble_gradient_color,
            bubble_border_color,
            image_border_color,
        );

        ranges!(
            font_size: 10.0, 32.0;
            line_height: 1.0, 3.0;
            letter_spacing: -0.1, 0.5;
            paragraph_spacing: 0.0, 4.0;
            container_width: 320.0, 1600.0;
            container_padding: 0.0, 6.0;
            container_margin: 0.0, 6.0;
            border_radius: 0.0, 64.0;
            border_width: 0.0, 12.0;
            shadow_intensity: 0.0, 100.0;
            shadow_blur: 0.0, 96.0;
            shadow_offset_y: -48.0, 48.0;
            header_radius: 0.0, 64.0;
            title_size: 0.8, 4.0;
            badge_scale: 50.0, 200.0;
            bubble_opacity: 0.0, 100.0;
            bubble_radius: 0.0, 48.0;
            bubble_padding: 0.25, 3.0;
            bubble_max_width: 30.0, 100.0;
            bubble_spacing: 0.0, 3.0;
            bubble_border_width: 0.0, 8.0;
            nametag_size: 0.5, 1.5;
            separation_gap: 0.0, 4.0;
            divider_width: 1.0, 8.0;
            divider_spacing: 0.0, 4.0;
            image_max_width: 10.0, 100.0;
            image_radius: 0.0, 48.0;
            image_border_width: 0.0, 8.0;
            section_radius: 0.0, 48.0;
        );

        out.bg_gradient_angle = css::normalize_angle(self.bg_gradient_angle, defaults.bg_gradient_angle);
        out.bubble_gradient_angle =
            css::normalize_angle(self.bubble_gradient_angle, defaults.bubble_gradient_angle);

        out
    }

    /// Returns `true` if any header field has text.
    #[must_use]
    pub fn has_header(&self) -> bool {
        [
            &self.title,
            &self.char_name,
            &self.ai_model,
            &self.prompt_name,
            &self.sub_model,
        ]
        .iter()
        .any(|field| !field.trim().is_empty())
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Field decoders that accept loosely typed values instead of failing.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "1"
            ),
            _ => false,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_camel_case_keys() {
        let config = Config::from_json(
            r##"{"charName": "Mira", "aiBubbleColor": "#222222", "fontSize": 18}"##,
        )
        .unwrap();
        assert_eq!(config.char_name, "Mira");
        assert_eq!(config.ai_bubble_color, "#222222");
        assert!((config.font_size - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ignores_unknown_keys() {
        let config = Config::from_json(r#"{"presetName": "dark-space"}"#).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn accepts_numeric_strings() {
        let config = Config::from_json(r#"{"containerWidth": " 640 "}"#).unwrap();
        assert!((config.container_width - 640.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_values_clamp_to_minimum() {
        let config = Config::from_json(r#"{"shadowIntensity": "lots", "fontSize": null}"#)
            .unwrap()
            .normalized();
        assert!(config.shadow_intensity.abs() < f64::EPSILON);
        assert!((config.font_size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_keywords_fall_back_to_default() {
        let config =
            Config::from_json(r#"{"textAlign": "sideways", "badgeStyle": 3, "bgMode": "RADIAL"}"#)
                .unwrap();
        assert_eq!(config.text_align, TextAlign::Justify);
        assert_eq!(config.badge_style, BadgeStyle::Filled);
        assert_eq!(config.bg_mode, BackgroundMode::Radial);
    }

    #[test]
    fn decodes_loose_flags() {
        let config =
            Config::from_json(r#"{"boxShadow": "off", "showNametag": 0, "imageShadow": "yes"}"#)
                .unwrap();
        assert!(!config.box_shadow);
        assert!(!config.show_nametag);
        assert!(config.image_shadow);
    }

    #[test]
    fn stringifies_numeric_text() {
        let config = Config::from_json(r#"{"aiModel": 4, "title": ["x"]}"#).unwrap();
        assert_eq!(config.ai_model, "4");
        assert_eq!(config.title, "");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Config::from_json("{"),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = Config::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { found: "an array" }));
        assert_eq!(
            err.to_string(),
            "configuration must be a JSON object, found an array"
        );
    }

    #[test]
    fn normalization_coerces_invalid_colors_to_key_default() {
        let config = Config {
            bold_color: "javascript:alert(1)".into(),
            user_bubble_color: "#ABC".into(),
            ..Config::default()
        }
        .normalized();
        assert_eq!(config.bold_color, "#dc2626");
        assert_eq!(config.user_bubble_color, "#aabbcc");
    }

    #[test]
    fn normalization_clamps_ranges_and_angles() {
        let config = Config {
            bubble_opacity: 140.0,
            badge_scale: 10.0,
            bg_gradient_angle: -45.0,
            bubble_gradient_angle: f64::NAN,
            ..Config::default()
        }
        .normalized();
        assert!((config.bubble_opacity - 100.0).abs() < f64::EPSILON);
        assert!((config.badge_scale - 50.0).abs() < f64::EPSILON);
        assert!((config.bg_gradient_angle - 315.0).abs() < f64::EPSILON);
        assert!((config.bubble_gradient_angle - 135.0).abs() < f64::EPSILON);
    }

    #[test]
    fn defaults_are_already_normal() {
        assert_eq!(Config::default().normalized(), Config::default());
    }

    #[test]
    fn serializes_keywords_as_strings() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["textAlign"], "justify");
        assert_eq!(json["wordBreak"], "keep-all");
        assert_eq!(json["bubbleBorder"], "none");
    }

    #[test]
    fn detects_header_fields() {
        assert!(!Config::default().has_header());
        let config = Config {
            sub_model: "  flash ".into(),
            ..Config::default()
        };
        assert!(config.has_header());
        let config = Config {
            char_link: "https://x.test".into(),
            user_name: "Me".into(),
            ..Config::default()
        };
        assert!(!config.has_header());
    }
}
