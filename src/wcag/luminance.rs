//! WCAG relative luminance and contrast ratio
//!
//! Uses the WCAG 2.x formulation, including its 0.03928 linearisation knee.

use crate::color::conversion::ColorRgb;
use crate::constants::wcag::{
    BLUE_COEFFICIENT, FLARE, GREEN_COEFFICIENT, LINEAR_KNEE, RED_COEFFICIENT,
};

/// Linearise one gamma-encoded sRGB component in [0, 1]
#[inline]
pub fn linearize(component: f64) -> f64 {
    if component <= LINEAR_KNEE {
        component / 12.92
    } else {
        ((component + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, in [0, 1]
pub fn relative_luminance(color: ColorRgb) -> f64 {
    let scaled = color.into_format::<f64>();
    RED_COEFFICIENT * linearize(scaled.red)
        + GREEN_COEFFICIENT * linearize(scaled.green)
        + BLUE_COEFFICIENT * linearize(scaled.blue)
}

/// Contrast ratio between two luminances
///
/// Symmetric in its arguments and always in [1, 21] for luminances in [0, 1].
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + FLARE) / (darker + FLARE)
}

/// Contrast ratio between two colors
pub fn contrast_ratio_between(a: ColorRgb, b: ColorRgb) -> f64 {
    contrast_ratio(relative_luminance(a), relative_luminance(b))
}
