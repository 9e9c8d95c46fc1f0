//! Dominant-cluster background estimation
//!
//! Background pixels (text masked out) are grouped with k-means and the
//! centroid of the most populous group is taken as the background color:
//! - Pixels are compressed to distinct colors with counts, so clustering
//!   cost depends on palette size rather than image area
//! - Centroids are initialised with weighted k-means++ from a caller seed
//! - Several restarts run from the same seeded stream; the lowest-inertia
//!   partition wins

use crate::color::conversion::{from_f64_channels, ColorRgb};
use crate::color::distance::TextMask;
use crate::config::DominantClusterConfig;
use crate::error::{EstimationError, EstimationResult};
use image::RgbImage;
use log::debug;
use palette::Srgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// A distinct background color and how many pixels carry it
#[derive(Debug, Clone, Copy)]
struct WeightedPoint {
    color: [f64; 3],
    weight: f64,
}

/// Outcome of one k-means run
#[derive(Debug, Clone)]
struct Partition {
    centroids: Vec<[f64; 3]>,
    /// Pixel count per centroid
    sizes: Vec<f64>,
    inertia: f64,
}

/// Estimator picking the centroid of the largest background cluster
#[derive(Debug, Clone, PartialEq)]
pub struct DominantClusterEstimator {
    config: DominantClusterConfig,
}

impl Default for DominantClusterEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl DominantClusterEstimator {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::with_config(DominantClusterConfig::default())
    }

    /// Create an estimator from its configuration section
    pub fn with_config(config: DominantClusterConfig) -> Self {
        Self { config }
    }

    /// Replace the initialisation seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Estimate the background color
    ///
    /// # Errors
    ///
    /// Returns `EstimationError::InsufficientBackgroundPixels` when fewer than
    /// `min_background_pixels` pixels remain after text masking.
    pub fn estimate(&self, image: &RgbImage, foreground: ColorRgb) -> EstimationResult<ColorRgb> {
        let mask = TextMask::new(image, foreground, self.config.text_threshold);
        let background = mask.background_pixels(image);

        if background.is_empty() || background.len() < self.config.min_background_pixels {
            return Err(EstimationError::InsufficientBackgroundPixels {
                found: background.len(),
                required: self.config.min_background_pixels.max(1),
            });
        }

        // BTreeMap keeps the point order independent of hashing
        let mut histogram: BTreeMap<[u8; 3], usize> = BTreeMap::new();
        for pixel in &background {
            *histogram.entry(*pixel).or_insert(0) += 1;
        }

        if histogram.len() == 1 {
            let [r, g, b] = background[0];
            return Ok(Srgb::new(r, g, b));
        }

        let points: Vec<WeightedPoint> = histogram
            .iter()
            .map(|(color, &count)| WeightedPoint {
                color: color.map(f64::from),
                weight: count as f64,
            })
            .collect();

        let k = self
            .config
            .max_clusters
            .min(points.len())
            .min(background.len())
            .max(1);

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut best: Option<Partition> = None;
        for _ in 0..self.config.restarts.max(1) {
            let run = self.run_kmeans(&points, k, &mut rng);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let partition = best.ok_or(EstimationError::InsufficientBackgroundPixels {
            found: background.len(),
            required: self.config.min_background_pixels,
        })?;

        let mut largest = 0;
        for (i, &size) in partition.sizes.iter().enumerate() {
            if size > partition.sizes[largest] {
                largest = i;
            }
        }

        debug!(
            "dominant cluster: k={} over {} distinct colors, largest holds {} px",
            k,
            points.len(),
            partition.sizes[largest]
        );
        Ok(from_f64_channels(partition.centroids[largest]))
    }

    /// One Lloyd run from a weighted k-means++ initialisation
    fn run_kmeans(&self, points: &[WeightedPoint], k: usize, rng: &mut StdRng) -> Partition {
        let mut centroids = init_plus_plus(points, k, rng);
        let mut labels = vec![0usize; points.len()];

        for _ in 0..self.config.max_iterations {
            for (label, point) in labels.iter_mut().zip(points) {
                *label = nearest(&centroids, &point.color).0;
            }

            let mut sums = vec![[0.0f64; 3]; k];
            let mut weights = vec![0.0f64; k];
            for (&label, point) in labels.iter().zip(points) {
                for c in 0..3 {
                    sums[label][c] += point.color[c] * point.weight;
                }
                weights[label] += point.weight;
            }

            let mut shift = 0.0;
            for (j, centroid) in centroids.iter_mut().enumerate() {
                // Empty clusters keep their previous centroid
                if weights[j] == 0.0 {
                    continue;
                }
                let updated = sums[j].map(|s| s / weights[j]);
                shift += squared_distance(centroid, &updated);
                *centroid = updated;
            }

            if shift <= crate::constants::clustering::TOLERANCE {
                break;
            }
        }

        let mut sizes = vec![0.0f64; k];
        let mut inertia = 0.0;
        for point in points {
            let (label, d2) = nearest(&centroids, &point.color);
            sizes[label] += point.weight;
            inertia += d2 * point.weight;
        }

        Partition {
            centroids,
            sizes,
            inertia,
        }
    }
}

/// Weighted k-means++ seeding: each new centroid is drawn with probability
/// proportional to `count * D(x)^2`
fn init_plus_plus(points: &[WeightedPoint], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[pick_weighted(points.iter().map(|p| p.weight), rng)].color);

    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(&p.color, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let scores = points.iter().zip(&closest).map(|(p, d2)| p.weight * d2);
        let chosen = points[pick_weighted(scores, rng)].color;

        for (d2, point) in closest.iter_mut().zip(points) {
            *d2 = d2.min(squared_distance(&point.color, &chosen));
        }
        centroids.push(chosen);
    }

    centroids
}

/// Index drawn proportionally to the given non-negative weights
fn pick_weighted(weights: impl Iterator<Item = f64> + Clone, rng: &mut StdRng) -> usize {
    let total: f64 = weights.clone().sum();
    let count = weights.clone().count();
    if total <= 0.0 {
        return rng.gen_range(0..count);
    }

    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, w) in weights.enumerate() {
        if w > 0.0 {
            last_positive = i;
        }
        cumulative += w;
        if cumulative > target && w > 0.0 {
            return i;
        }
    }
    last_positive
}

/// Index of and squared distance to the nearest centroid; ties go to the lower index
fn nearest(centroids: &[[f64; 3]], color: &[f64; 3]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, centroid) in centroids.iter().enumerate() {
        let d2 = squared_distance(centroid, color);
        if d2 < best.1 {
            best = (i, d2);
        }
    }
    best
}

#[inline]
fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (0..3).map(|c| (a[c] - b[c]).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn black() -> ColorRgb {
        Srgb::new(0, 0, 0)
    }

    #[test]
    fn test_uniform_background_returned_directly() {
        let image = RgbImage::from_pixel(20, 10, Rgb([227, 224, 224]));
        let color = DominantClusterEstimator::new().estimate(&image, black()).unwrap();
        assert_eq!(color, Srgb::new(227, 224, 224));
    }

    #[test]
    fn test_insufficient_background() {
        // Everything within 50 of black except 5 pixels
        let mut image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        for x in 0..5 {
            image.put_pixel(x, 0, Rgb([255, 255, 255]));
        }

        let result = DominantClusterEstimator::new().estimate(&image, black());
        assert_eq!(
            result,
            Err(EstimationError::InsufficientBackgroundPixels { found: 5, required: 10 })
        );
    }

    #[test]
    fn test_zero_minimum_still_rejects_all_text() {
        let config = DominantClusterConfig {
            min_background_pixels: 0,
            ..DominantClusterConfig::default()
        };
        let image = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        let result = DominantClusterEstimator::with_config(config).estimate(&image, black());
        assert_eq!(
            result,
            Err(EstimationError::InsufficientBackgroundPixels {
                found: 0,
                required: 1
            })
        );
    }

    #[test]
    fn test_zero_max_clusters_still_clusters() {
        let config = DominantClusterConfig {
            max_clusters: 0,
            ..DominantClusterConfig::default()
        };
        let image = RgbImage::from_fn(8, 8, |x, _| {
            if x < 6 {
                Rgb([240, 240, 240])
            } else {
                Rgb([120, 120, 200])
            }
        });
        let result = DominantClusterEstimator::with_config(config).estimate(&image, black());
        assert!(result.is_ok());
    }

    #[test]
    fn test_largest_cluster_wins() {
        // 70% light gray, 20% blue band, 10% red accent, plus black text
        let mut image = RgbImage::from_pixel(10, 10, Rgb([240, 240, 240]));
        for x in 0..10 {
            image.put_pixel(x, 0, Rgb([30, 60, 200]));
            image.put_pixel(x, 1, Rgb([30, 60, 200]));
            image.put_pixel(x, 2, Rgb([220, 20, 20]));
        }
        image.put_pixel(5, 5, Rgb([0, 0, 0]));

        let color = DominantClusterEstimator::new().estimate(&image, black()).unwrap();
        assert_eq!(color, Srgb::new(240, 240, 240));
    }

    #[test]
    fn test_centroid_is_rounded_mean_of_cluster() {
        // Two near-identical shades form one cluster against a distant minority
        let mut image = RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]));
        for x in 0..10 {
            image.put_pixel(x, 0, Rgb([201, 201, 201]));
        }
        for x in 0..3 {
            image.put_pixel(x, 9, Rgb([20, 120, 250]));
        }

        let estimator = DominantClusterEstimator::with_config(DominantClusterConfig {
            max_clusters: 2,
            ..DominantClusterConfig::default()
        });
        let color = estimator.estimate(&image, black()).unwrap();
        assert_eq!(color, Srgb::new(200, 200, 200));
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let image = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        });
        let estimator = DominantClusterEstimator::new().with_seed(7);
        let first = estimator.estimate(&image, Srgb::new(255, 255, 255));
        let second = estimator.estimate(&image, Srgb::new(255, 255, 255));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_weighted_skips_zero_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let idx = pick_weighted([0.0, 3.0, 0.0, 1.0].into_iter(), &mut rng);
            assert!(idx == 1 || idx == 3);
        }
    }
}
