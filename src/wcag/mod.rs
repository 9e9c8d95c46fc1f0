//! Luminance, contrast ratio and WCAG compliance
//!
//! This module turns a foreground/background color pair and the font
//! metrics of the text into a compliance verdict.

pub mod compliance;
pub mod luminance;

pub use compliance::{classify, is_large_text, ComplianceVerdict, FontMetrics, Situation};
pub use luminance::{contrast_ratio, contrast_ratio_between, linearize, relative_luminance};

use crate::color::conversion::parse_css_color_or_black;

/// Assess the colors a page declares for a text element
///
/// Both strings are computed-style values; unparseable values resolve to
/// black. The declared background is often transparent or wrong for text
/// over images, which is what the estimators are for.
pub fn assess_declared_colors(
    foreground: &str,
    background: &str,
    metrics: &FontMetrics,
) -> ComplianceVerdict {
    let ratio = contrast_ratio_between(
        parse_css_color_or_black(foreground),
        parse_css_color_or_black(background),
    );
    classify(metrics, ratio)
}
