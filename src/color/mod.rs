//! Color representation and pixel classification
//!
//! This module handles the sRGB color type, upstream color string parsing,
//! hex formatting, and the distance-based text mask used by every estimator.

pub mod conversion;
pub mod distance;

pub use conversion::{parse_css_color, parse_css_color_or_black, parse_hex, to_hex, ColorRgb};
pub use distance::{color_distance, distance, is_background, is_foreground, TextMask};
