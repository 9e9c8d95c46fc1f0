//! # Contrast Scan
//!
//! Background color estimation and WCAG contrast checking for captures of
//! rendered text.
//!
//! When text sits on an image, gradient or overlay, the background color a
//! page declares says little about what a reader actually sees. This library
//! estimates the perceived background from a screenshot of the text by:
//! - Masking out pixels close to the known foreground color
//! - Running five independent estimators over what remains
//! - Arbitrating between refinement levels with a pixel-support confidence
//! - Computing the WCAG 2.x contrast ratio and compliance verdict
//!
//! ## Example
//!
//! ```rust,no_run
//! use contrast_scan::{check_contrast, image_loader, Estimator, EstimatorConfig, FontMetrics};
//! use palette::Srgb;
//! use std::path::Path;
//!
//! let image = image_loader::load_image(Path::new("capture.png"))?;
//! let metrics = FontMetrics::new(16.0, false, "en");
//! let report = check_contrast(
//!     &image,
//!     Srgb::new(0, 0, 0),
//!     &metrics,
//!     Estimator::Hierarchical,
//!     &EstimatorConfig::default(),
//! )?;
//! println!("{} -> {:.2}:1", report.background.hex, report.contrast_ratio);
//! # Ok::<(), contrast_scan::AnalysisError>(())
//! ```

use image::RgbImage;
use log::info;
use serde::{Deserialize, Serialize};

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimation;
pub mod image_loader;
pub mod wcag;

pub use color::{parse_css_color, to_hex, ColorRgb};
pub use config::EstimatorConfig;
pub use error::{AnalysisError, EstimationError, EstimationResult, Result};
pub use estimation::{
    evaluate_all, rank_by_reference, rank_outcomes, BackgroundEstimate, Estimator, MethodOutcome,
    RankedOutcome,
};
pub use wcag::{classify, contrast_ratio_between, ComplianceVerdict, FontMetrics};

/// Contrast check of one text capture against one estimated background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastReport {
    /// Estimated background and the method that produced it
    pub background: BackgroundEstimate,
    /// Known text color
    pub foreground: ColorRgb,
    /// WCAG contrast ratio, in [1, 21]
    pub contrast_ratio: f64,
    pub verdict: ComplianceVerdict,
}

/// Estimate the background of a capture and check it against WCAG 1.4.3
///
/// # Arguments
///
/// * `image` - Capture of the text element
/// * `foreground` - Computed text color
/// * `metrics` - Font size, weight and language of the text
/// * `estimator` - Background estimation method to use
/// * `config` - Estimator parameters
///
/// # Errors
///
/// Returns `AnalysisError::Estimation` when the chosen estimator cannot
/// produce a color for this capture.
pub fn check_contrast(
    image: &RgbImage,
    foreground: ColorRgb,
    metrics: &FontMetrics,
    estimator: Estimator,
    config: &EstimatorConfig,
) -> Result<ContrastReport> {
    let background = estimator.run(image, foreground, config)?;
    let contrast_ratio = contrast_ratio_between(foreground, background.rgb);
    let verdict = classify(metrics, contrast_ratio);

    info!(
        "{}: background {} vs foreground {}, ratio {:.2} (requires {:.1})",
        estimator,
        background.hex,
        to_hex(foreground),
        contrast_ratio,
        verdict.required_ratio
    );

    Ok(ContrastReport {
        background,
        foreground,
        contrast_ratio,
        verdict,
    })
}
