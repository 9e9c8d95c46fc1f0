//! Edge-excluding core region estimation
//!
//! The background is sampled only where it is least likely to be
//! contaminated:
//! - Canny edges on the grayscale capture mark glyph outlines and borders
//! - Edges are dilated with a square structuring element to swallow
//!   anti-aliased fringes
//! - Text pixels are masked by distance to the foreground color
//!
//! What remains is the core region; its per-channel median is the estimate.
//!
//! `imageproc`'s Canny smooths with a Gaussian (sigma 1.4) before the Sobel
//! step. Edge maps of 1 px glyph strokes are therefore wider and weaker than
//! those of an unsmoothed Canny, and can differ from OpenCV's output.

use crate::color::conversion::ColorRgb;
use crate::color::distance::TextMask;
use crate::config::CoreRegionConfig;
use crate::error::{EstimationError, EstimationResult};
use crate::estimation::stats::channel_median;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::map::map_colors;
use imageproc::morphology::dilate;
use log::debug;

/// Estimator taking the median of pixels that are neither edge nor text
#[derive(Debug, Clone, PartialEq)]
pub struct CoreRegionEstimator {
    config: CoreRegionConfig,
}

impl Default for CoreRegionEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreRegionEstimator {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::with_config(CoreRegionConfig::default())
    }

    /// Create an estimator from its configuration section
    pub fn with_config(config: CoreRegionConfig) -> Self {
        Self { config }
    }

    /// Estimate the background color
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` for a zero-area image
    /// - `EmptyCoreRegion` when dilated edges and text cover every pixel
    pub fn estimate(&self, image: &RgbImage, foreground: ColorRgb) -> EstimationResult<ColorRgb> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EstimationError::DegenerateGeometry { width, height });
        }

        let edges = self.dilated_edges(image);
        let text = TextMask::new(image, foreground, self.config.text_threshold);

        let core: Vec<[u8; 3]> = image
            .enumerate_pixels()
            .filter(|(x, y, _)| edges.get_pixel(*x, *y)[0] == 0 && !text.is_text(*x, *y))
            .map(|(_, _, pixel)| pixel.0)
            .collect();

        debug!(
            "core region: {} of {} px ({} text)",
            core.len(),
            width as usize * height as usize,
            text.text_count()
        );

        channel_median(&core).ok_or(EstimationError::EmptyCoreRegion)
    }

    /// Canny edge map dilated by the configured square kernel
    ///
    /// Non-zero pixels are edge or edge-adjacent.
    pub fn dilated_edges(&self, image: &RgbImage) -> GrayImage {
        let gray = to_grayscale(image);
        let mut edges = canny(
            &gray,
            self.config.canny_low_threshold,
            self.config.canny_high_threshold,
        );

        // A (2r+1)x(2r+1) square is the L-infinity ball of radius r
        let radius = self.config.dilation_kernel_size / 2;
        for _ in 0..self.config.dilation_iterations {
            edges = dilate(&edges, Norm::LInf, radius);
        }
        edges
    }
}

/// ITU-R BT.601 luma, matching the usual RGB to gray conversion
fn to_grayscale(image: &RgbImage) -> GrayImage {
    map_colors(image, |Rgb([r, g, b])| {
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}
