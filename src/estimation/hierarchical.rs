//! Hierarchical background estimation with confidence arbitration
//!
//! Three levels of refinement are computed, each falling back to the one
//! below it:
//! - Coarse: center of the most populated bin of a joint RGB histogram over
//!   every pixel, no masking
//! - Medium: mean of the text-masked pixels when enough remain, else coarse
//! - Fine: the core-region estimate, else medium
//!
//! The level whose color is supported by the largest fraction of pixels wins;
//! ties prefer fine over medium over coarse.

use crate::color::conversion::ColorRgb;
use crate::color::distance::TextMask;
use crate::config::{ConfidenceConfig, CoreRegionConfig, EstimatorConfig, HierarchicalConfig};
use crate::error::{EstimationError, EstimationResult};
use crate::estimation::confidence::{ConfidenceScore, ConfidenceScorer};
use crate::estimation::core_region::CoreRegionEstimator;
use crate::estimation::stats::channel_mean;
use image::RgbImage;
use log::debug;
use palette::Srgb;
use serde::Serialize;

/// Refinement level of a hierarchical candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Fine,
    Medium,
    Coarse,
}

/// Candidate colors, their confidences and the arbitration result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchicalAnalysis {
    pub fine: ColorRgb,
    pub medium: ColorRgb,
    pub coarse: ColorRgb,
    /// Whether the fine level came from the core region (false: fell back to medium)
    pub fine_from_core_region: bool,
    /// Whether the medium level came from masked pixels (false: fell back to coarse)
    pub medium_from_mask: bool,
    /// Confidences in fine, medium, coarse order
    pub confidences: [ConfidenceScore; 3],
    pub selected: Level,
}

impl HierarchicalAnalysis {
    /// Color of the selected level
    pub fn selected_color(&self) -> ColorRgb {
        self.color(self.selected)
    }

    /// Confidence of the selected level
    pub fn selected_confidence(&self) -> ConfidenceScore {
        self.confidences[level_index(self.selected)]
    }

    /// Color of the given level
    pub fn color(&self, level: Level) -> ColorRgb {
        match level {
            Level::Fine => self.fine,
            Level::Medium => self.medium,
            Level::Coarse => self.coarse,
        }
    }
}

/// Three-level estimator with confidence-based arbitration
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalEstimator {
    config: HierarchicalConfig,
    core_region: CoreRegionEstimator,
    scorer: ConfidenceScorer,
}

impl Default for HierarchicalEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchicalEstimator {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::with_params(
            HierarchicalConfig::default(),
            CoreRegionConfig::default(),
            &ConfidenceConfig::default(),
        )
    }

    /// Create an estimator from explicit sections
    pub fn with_params(
        config: HierarchicalConfig,
        core_region: CoreRegionConfig,
        confidence: &ConfidenceConfig,
    ) -> Self {
        Self {
            config,
            core_region: CoreRegionEstimator::with_config(core_region),
            scorer: ConfidenceScorer::with_config(confidence),
        }
    }

    /// Create an estimator from the full configuration
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::with_params(
            config.hierarchical.clone(),
            config.core_region.clone(),
            &config.confidence,
        )
    }

    /// Estimate the background color
    pub fn estimate(&self, image: &RgbImage, foreground: ColorRgb) -> EstimationResult<ColorRgb> {
        self.analyze(image, foreground)
            .map(|analysis| analysis.selected_color())
    }

    /// Run all three levels and arbitrate between them
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` for a zero-area image; otherwise the
    /// fallback chain always yields a color.
    pub fn analyze(
        &self,
        image: &RgbImage,
        foreground: ColorRgb,
    ) -> EstimationResult<HierarchicalAnalysis> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EstimationError::DegenerateGeometry { width, height });
        }

        let coarse = self.coarse_level(image);

        let mask = TextMask::new(image, foreground, self.config.medium_threshold);
        let background = mask.background_pixels(image);
        let (medium, medium_from_mask) = if background.len() > self.config.medium_min_pixels {
            match channel_mean(&background) {
                Some(mean) => (mean, true),
                None => (coarse, false),
            }
        } else {
            (coarse, false)
        };

        let (fine, fine_from_core_region) = match self.core_region.estimate(image, foreground) {
            Ok(color) => (color, true),
            Err(e) => {
                debug!("hierarchical: fine level unavailable ({}), using medium", e);
                (medium, false)
            }
        };

        let confidences = [
            self.scorer.score(Some(fine), image),
            self.scorer.score(Some(medium), image),
            self.scorer.score(Some(coarse), image),
        ];

        // First maximum wins, so ties keep the finer level
        let mut best = 0;
        for (i, &score) in confidences.iter().enumerate().skip(1) {
            if score > confidences[best] {
                best = i;
            }
        }
        let selected = [Level::Fine, Level::Medium, Level::Coarse][best];

        debug!(
            "hierarchical: confidences fine={:.3} medium={:.3} coarse={:.3}, selected {:?}",
            confidences[0], confidences[1], confidences[2], selected
        );

        Ok(HierarchicalAnalysis {
            fine,
            medium,
            coarse,
            fine_from_core_region,
            medium_from_mask,
            confidences,
            selected,
        })
    }

    /// Center of the most populated joint RGB histogram bin
    ///
    /// Bins split [0, 255] into equal-width intervals, the last one closed.
    /// Ties go to the lowest (r, g, b) bin index.
    pub fn coarse_level(&self, image: &RgbImage) -> ColorRgb {
        let bins = self.config.histogram_bins.max(1);
        let bin_of = |v: u8| (v as usize * bins / 255).min(bins - 1);

        let mut histogram = vec![0usize; bins * bins * bins];
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0.map(bin_of);
            histogram[(r * bins + g) * bins + b] += 1;
        }

        let mut best = 0;
        for (i, &count) in histogram.iter().enumerate() {
            if count > histogram[best] {
                best = i;
            }
        }

        let width = 255.0 / bins as f64;
        let center = |index: usize| ((index as f64 + 0.5) * width) as u8;
        Srgb::new(
            center(best / (bins * bins)),
            center((best / bins) % bins),
            center(best % bins),
        )
    }
}

fn level_index(level: Level) -> usize {
    match level {
        Level::Fine => 0,
        Level::Medium => 1,
        Level::Coarse => 2,
    }
}
