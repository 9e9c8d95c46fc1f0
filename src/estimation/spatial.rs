//! Center-weighted background average
//!
//! Background pixels are averaged with a Gaussian weight that falls off with
//! distance from the image center, `w = exp(-2 (d / d_max)^2)`, where `d_max`
//! is the distance from the center to the top-left corner.

use crate::color::conversion::{truncate_f64_channels, ColorRgb};
use crate::color::distance::is_background;
use crate::config::SpatialWeightedConfig;
use crate::error::{EstimationError, EstimationResult};
use image::RgbImage;

/// Estimator favouring pixels near the center of the capture
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialWeightedEstimator {
    config: SpatialWeightedConfig,
}

impl Default for SpatialWeightedEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialWeightedEstimator {
    pub fn new() -> Self {
        Self::with_config(SpatialWeightedConfig::default())
    }

    pub fn with_config(config: SpatialWeightedConfig) -> Self {
        Self { config }
    }

    /// Weighted average of background pixels
    ///
    /// A zero `d_max` (1x1 captures) falls back to uniform weights.
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` for a zero-area image
    /// - `InsufficientBackgroundPixels` when every pixel is text
    pub fn estimate(&self, image: &RgbImage, foreground: ColorRgb) -> EstimationResult<ColorRgb> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EstimationError::DegenerateGeometry { width, height });
        }

        let center_x = (width / 2) as f64;
        let center_y = (height / 2) as f64;
        let max_distance = (center_x * center_x + center_y * center_y).sqrt();

        let mut sums = [0.0f64; 3];
        let mut total_weight = 0.0;
        let mut count = 0usize;

        for (x, y, pixel) in image.enumerate_pixels() {
            if !is_background(pixel, foreground, self.config.text_threshold) {
                continue;
            }

            let weight = if max_distance > 0.0 {
                let d = ((x as f64 - center_x).powi(2) + (y as f64 - center_y).powi(2)).sqrt();
                (-2.0 * (d / max_distance).powi(2)).exp()
            } else {
                1.0
            };

            for c in 0..3 {
                sums[c] += pixel[c] as f64 * weight;
            }
            total_weight += weight;
            count += 1;
        }

        if count == 0 {
            return Err(EstimationError::InsufficientBackgroundPixels {
                found: 0,
                required: 1,
            });
        }

        Ok(truncate_f64_channels(sums.map(|s| s / total_weight)))
    }
}
