//! Color representation and upstream color string handling
//!
//! Provides:
//! - The 8-bit sRGB color type shared by every estimator
//! - Hex color representation (`#rrggbb`)
//! - Parsing of computed-style strings: `rgb(r, g, b)`, `rgba(r, g, b, a)`, `#RRGGBB`

use crate::{AnalysisError, Result};
use image::Rgb;
use log::warn;
use once_cell::sync::Lazy;
use palette::Srgb;
use regex::Regex;

/// 8-bit sRGB color, each channel in [0, 255]
pub type ColorRgb = Srgb<u8>;

/// Black, the fallback for unparseable foreground colors
pub const BLACK: ColorRgb = Srgb::new(0, 0, 0);

static CSS_RGB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*[\d.]+\s*)?\)$")
        .expect("static rgb() pattern is valid")
});

static CSS_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{6})$").expect("static hex pattern is valid"));

/// Channels of a color as an array
#[inline]
pub fn to_array(color: ColorRgb) -> [u8; 3] {
    [color.red, color.green, color.blue]
}

/// Color from an image pixel
#[inline]
pub fn from_pixel(pixel: &Rgb<u8>) -> ColorRgb {
    Srgb::new(pixel[0], pixel[1], pixel[2])
}

/// Round float channels to the nearest integer color, clamped to [0, 255]
pub fn from_f64_channels(channels: [f64; 3]) -> ColorRgb {
    let [r, g, b] = channels.map(|c| c.round().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

/// Float accumulation error absorbed before truncating
const TRUNCATION_EPSILON: f64 = 1e-9;

/// Truncate float channels toward zero, clamped to [0, 255]
///
/// Used for averaged and median colors, so 200.5 becomes 200.
pub fn truncate_f64_channels(channels: [f64; 3]) -> ColorRgb {
    let [r, g, b] = channels.map(|c| (c + TRUNCATION_EPSILON).trunc().clamp(0.0, 255.0) as u8);
    Srgb::new(r, g, b)
}

/// Convert a color to its lowercase hexadecimal representation
///
/// # Returns
///
/// Hex color string (e.g., "#e3e0e0")
pub fn to_hex(color: ColorRgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parse a `#RRGGBB` hex string
///
/// # Errors
///
/// Returns `AnalysisError::ColorParseFailure` unless the input is exactly a
/// `#` followed by six hex digits.
pub fn parse_hex(hex: &str) -> Result<ColorRgb> {
    let trimmed = hex.trim();
    let caps = CSS_HEX
        .captures(trimmed)
        .ok_or_else(|| parse_failure(hex))?;
    let digits = &caps[1];

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| parse_failure(hex))
    };

    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse a computed-style color string
///
/// Accepts `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha is ignored) and
/// `#RRGGBB`. Components above 255 are rejected.
pub fn parse_css_color(input: &str) -> Result<ColorRgb> {
    let trimmed = input.trim();

    if let Some(caps) = CSS_RGB.captures(trimmed) {
        let channel = |i: usize| caps[i].parse::<u8>().map_err(|_| parse_failure(input));
        return Ok(Srgb::new(channel(1)?, channel(2)?, channel(3)?));
    }

    parse_hex(trimmed).map_err(|_| parse_failure(input))
}

/// Parse a computed-style color string, resolving failures to black
pub fn parse_css_color_or_black(input: &str) -> ColorRgb {
    parse_css_color(input).unwrap_or_else(|e| {
        warn!("{}; using black", e);
        BLACK
    })
}

fn parse_failure(input: &str) -> AnalysisError {
    AnalysisError::ColorParseFailure {
        input: input.to_string(),
    }
}
