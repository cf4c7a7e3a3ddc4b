//! Decoration styling derived from configuration.
//!
//! The host renders each flagged range as inline-after text: the configured
//! decoration string in the configured color, over a 20%-alpha background
//! derived from the same color. This module only computes the style values;
//! rendering belongs to the host.

use serde::Serialize;

use crate::analysis::Highlight;
use crate::config::Config;

/// Alpha applied to the background tint.
const BACKGROUND_ALPHA: f32 = 0.2;

/// An RGB triple parsed from a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse `#abc` or `#aabbcc` (case-insensitive, leading `#` optional).
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String;
    let digits = match digits.len() {
        3 => {
            expanded = digits
                .chars()
                .flat_map(|c| [c, c])
                .collect();
            &expanded
        }
        6 => digits,
        _ => return None,
    };

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Rgb { r, g, b })
}

/// Visual style for rendered decorations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecorationStyle {
    /// Literal text rendered after the flagged range.
    pub text: String,
    /// Foreground color of the decoration text (hex).
    pub color: String,
    /// Background tint behind the decoration text (`rgba(...)`).
    pub background: String,
}

impl DecorationStyle {
    /// Derive the style from a config, applying the silent color fallback.
    pub fn from_config(config: &Config) -> Self {
        let color = config.effective_color();
        // effective_color only returns validated hex, so this cannot miss.
        let rgb = hex_to_rgb(color).unwrap_or(Rgb { r: 255, g: 136, b: 0 });
        Self {
            text: config.decoration.clone(),
            color: color.to_string(),
            background: format!(
                "rgba({}, {}, {}, {})",
                rgb.r, rgb.g, rgb.b, BACKGROUND_ALPHA
            ),
        }
    }
}

/// One pass's worth of decorations for a document: the style plus the ranges
/// it applies to. Owned by the session; replaced whole on each pass.
#[derive(Debug, Clone)]
pub struct DecorationSet {
    /// The analyzed document this set belongs to.
    pub path: String,
    pub style: DecorationStyle,
    pub highlights: Vec<Highlight>,
}

impl DecorationSet {
    pub fn new(path: String, style: DecorationStyle, highlights: Vec<Highlight>) -> Self {
        Self {
            path,
            style,
            highlights,
        }
    }
}
