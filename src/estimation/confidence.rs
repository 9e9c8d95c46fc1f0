//! Candidate confidence scoring
//!
//! The confidence of a candidate background color is the fraction of all
//! image pixels lying strictly within the similarity radius of it.

use crate::color::conversion::{to_array, ColorRgb};
use crate::color::distance::distance;
use crate::config::ConfidenceConfig;
use image::RgbImage;

/// Fraction of pixels supporting a candidate, in [0, 1]
pub type ConfidenceScore = f64;

/// Scores candidate colors against the full image
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScorer {
    similarity_radius: f64,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceScorer {
    /// Create a scorer with the default similarity radius
    pub fn new() -> Self {
        Self::with_config(&ConfidenceConfig::default())
    }

    /// Create a scorer from its configuration section
    pub fn with_config(config: &ConfidenceConfig) -> Self {
        Self {
            similarity_radius: config.similarity_radius,
        }
    }

    /// Score a candidate
    ///
    /// Absent candidates and zero-area images score 0.0.
    pub fn score(&self, candidate: Option<ColorRgb>, image: &RgbImage) -> ConfidenceScore {
        let Some(candidate) = candidate else {
            return 0.0;
        };

        let total = image.width() as usize * image.height() as usize;
        if total == 0 {
            return 0.0;
        }

        let target = to_array(candidate);
        let similar = image
            .pixels()
            .filter(|pixel| distance(pixel.0, target) < self.similarity_radius)
            .count();

        similar as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use palette::Srgb;

    #[test]
    fn test_absent_candidate_scores_zero() {
        let image = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        assert_eq!(ConfidenceScorer::new().score(None, &image), 0.0);
    }

    #[test]
    fn test_fraction_of_similar_pixels() {
        let mut image = RgbImage::from_pixel(4, 1, Rgb([200, 200, 200]));
        image.put_pixel(0, 0, Rgb([0, 0, 0]));

        let scorer = ConfidenceScorer::new();
        let score = scorer.score(Some(Srgb::new(190, 200, 200)), &image);
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_radius_is_strict() {
        let image = RgbImage::from_pixel(2, 2, Rgb([30, 0, 0]));
        let scorer = ConfidenceScorer::new();
        // Distance exactly 30 does not count
        assert_eq!(scorer.score(Some(Srgb::new(0, 0, 0)), &image), 0.0);
        assert_eq!(scorer.score(Some(Srgb::new(1, 0, 0)), &image), 1.0);
    }

    #[test]
    fn test_zero_area_scores_zero() {
        let image = RgbImage::new(0, 0);
        assert_eq!(ConfidenceScorer::new().score(Some(Srgb::new(0, 0, 0)), &image), 0.0);
    }
}
