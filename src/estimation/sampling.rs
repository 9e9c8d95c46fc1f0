//! Multi-pass sampling estimation
//!
//! Three sampling passes over the central half of the capture are pooled:
//! 1. A regular grid with step `dimension / 8`
//! 2. Seeded uniform random points
//! 3. Points evenly spaced over [0, 2π] on a circle of radius `min(w, h) / 4`
//!    around the center, both ends included
//!
//! Samples failing the background test are dropped; the pooled per-channel
//! median is the estimate.

use crate::color::conversion::ColorRgb;
use crate::color::distance::is_background;
use crate::config::MultiSamplingConfig;
use crate::error::{EstimationError, EstimationResult};
use crate::estimation::stats::channel_median;
use image::RgbImage;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::ops::Range;

/// Estimator pooling grid, random and circular samples
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSamplingEstimator {
    config: MultiSamplingConfig,
}

impl Default for MultiSamplingEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiSamplingEstimator {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::with_config(MultiSamplingConfig::default())
    }

    /// Create an estimator from its configuration section
    pub fn with_config(config: MultiSamplingConfig) -> Self {
        Self { config }
    }

    /// Replace the random pass seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Estimate the background color
    ///
    /// Output depends only on the image, the foreground color and the seed.
    ///
    /// # Errors
    ///
    /// - `DegenerateGeometry` for a zero-area image
    /// - `InsufficientBackgroundPixels` when no sample passes the background test
    pub fn estimate(&self, image: &RgbImage, foreground: ColorRgb) -> EstimationResult<ColorRgb> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EstimationError::DegenerateGeometry { width, height });
        }

        let points = self.sample_points(width, height);
        let samples: Vec<[u8; 3]> = points
            .into_iter()
            .map(|(x, y)| image.get_pixel(x, y))
            .filter(|pixel| is_background(pixel, foreground, self.config.text_threshold))
            .map(|pixel| pixel.0)
            .collect();

        debug!("multi sampling: {} background samples kept", samples.len());

        channel_median(&samples).ok_or(EstimationError::InsufficientBackgroundPixels {
            found: 0,
            required: 1,
        })
    }

    /// All sample coordinates in pass order: grid, random, circle
    ///
    /// Coordinates are always inside the image; points may repeat.
    pub fn sample_points(&self, width: u32, height: u32) -> Vec<(u32, u32)> {
        let mut points = Vec::new();
        if width == 0 || height == 0 {
            return points;
        }

        let rows = central_half(height);
        let cols = central_half(width);

        // Grid pass
        let divisions = self.config.grid_divisions.max(1);
        let step_y = (height / divisions).max(1) as usize;
        let step_x = (width / divisions).max(1) as usize;
        for y in rows.clone().step_by(step_y) {
            for x in cols.clone().step_by(step_x) {
                points.push((x, y));
            }
        }

        // Random pass; tiny captures with an empty central band draw from the full axis
        let random_rows = if rows.is_empty() { 0..height } else { rows };
        let random_cols = if cols.is_empty() { 0..width } else { cols };
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        for _ in 0..self.config.random_samples {
            let y = rng.gen_range(random_rows.clone());
            let x = rng.gen_range(random_cols.clone());
            points.push((x, y));
        }

        // Circular pass
        let center_y = (height / 2) as f64;
        let center_x = (width / 2) as f64;
        let radius = (width.min(height) / 4) as f64;
        if radius > 0.0 && self.config.circle_points > 0 {
            // Angles span [0, 2π] inclusive; the last point closes the circle
            let intervals = self.config.circle_points.saturating_sub(1).max(1) as f64;
            for i in 0..self.config.circle_points {
                let angle = TAU * i as f64 / intervals;
                let y = (center_y + radius * angle.sin()).trunc();
                let x = (center_x + radius * angle.cos()).trunc();
                if (0.0..height as f64).contains(&y) && (0.0..width as f64).contains(&x) {
                    points.push((x as u32, y as u32));
                }
            }
        }

        points
    }
}

/// `[n/4, 3n/4)`
fn central_half(n: u32) -> Range<u32> {
    let n = n as u64;
    (n / 4) as u32..(3 * n / 4) as u32
}
