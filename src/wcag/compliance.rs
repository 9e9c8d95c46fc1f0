//! WCAG 1.4.3 compliance classification
//!
//! Text is "large" at 18pt bold or 14pt regular; large text needs a 3.0
//! contrast ratio (situation B), everything else 4.5 (situation A).

use crate::constants::wcag::{
    LARGE_TEXT_BOLD_PT, LARGE_TEXT_RATIO, LARGE_TEXT_REGULAR_PT, NORMAL_TEXT_RATIO, PX_TO_PT,
};
use serde::{Deserialize, Serialize};

/// Font properties of the captured text, as computed by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Computed font size in CSS px
    pub font_size_px: f64,
    /// Weight is `bold`, `bolder` or >= 700
    pub is_bold: bool,
    /// Declared language tag (e.g. `en`, `ja-JP`)
    pub language: String,
}

impl FontMetrics {
    pub fn new(font_size_px: f64, is_bold: bool, language: impl Into<String>) -> Self {
        Self {
            font_size_px,
            is_bold,
            language: language.into(),
        }
    }

    /// Font size in points
    pub fn font_size_pt(&self) -> f64 {
        self.font_size_px * PX_TO_PT
    }

    /// Whether the language tag is Japanese (`ja`, `ja-JP`, ...)
    pub fn is_japanese(&self) -> bool {
        self.language
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("ja"))
    }
}

/// WCAG requirement category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Situation {
    /// Normal text, 4.5:1
    A,
    /// Large text, 3:1
    B,
}

impl Situation {
    pub fn required_ratio(&self) -> f64 {
        match self {
            Situation::A => NORMAL_TEXT_RATIO,
            Situation::B => LARGE_TEXT_RATIO,
        }
    }
}

/// Compliance verdict for one text fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub is_compliant: bool,
    pub required_ratio: f64,
    pub actual_ratio: f64,
    pub situation: Situation,
    pub is_large_text: bool,
    pub font_size_pt: f64,
}

/// Point sizes at which (bold, regular) text becomes large
#[allow(clippy::if_same_then_else)]
fn large_text_limits(metrics: &FontMetrics) -> (f64, f64) {
    if metrics.is_japanese() {
        // TODO: switch to JIS X 8341-3 sizing once its limits are confirmed; same as default for now
        (LARGE_TEXT_BOLD_PT, LARGE_TEXT_REGULAR_PT)
    } else {
        (LARGE_TEXT_BOLD_PT, LARGE_TEXT_REGULAR_PT)
    }
}

/// Whether the text counts as large
pub fn is_large_text(metrics: &FontMetrics) -> bool {
    let (bold_limit, regular_limit) = large_text_limits(metrics);
    let size_pt = metrics.font_size_pt();
    if metrics.is_bold {
        size_pt >= bold_limit
    } else {
        size_pt >= regular_limit
    }
}

/// Classify a measured contrast ratio for the given font
pub fn classify(metrics: &FontMetrics, actual_ratio: f64) -> ComplianceVerdict {
    let is_large_text = is_large_text(metrics);
    let situation = if is_large_text { Situation::B } else { Situation::A };
    let required_ratio = situation.required_ratio();

    ComplianceVerdict {
        is_compliant: actual_ratio >= required_ratio,
        required_ratio,
        actual_ratio,
        situation,
        is_large_text,
        font_size_pt: metrics.font_size_pt(),
    }
}
