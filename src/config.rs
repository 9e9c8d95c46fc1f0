//! Configuration structures for the background estimators.
//!
//! Every tunable parameter of the five estimators and the confidence scorer
//! lives here, one section per estimator. `Default` reproduces the reference
//! values from [`crate::constants`].
//!
//! # Configuration Loading
//!
//! ```no_run
//! use contrast_scan::EstimatorConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EstimatorConfig::from_json_file(Path::new("estimators.json"))?;
//!
//! // Or use defaults
//! let config = EstimatorConfig::default();
//! # Ok::<(), contrast_scan::AnalysisError>(())
//! ```

use crate::constants::hierarchy::MAX_HISTOGRAM_BINS;
use crate::constants::{clustering, confidence, edges, hierarchy, masking, sampling};
use crate::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration for the estimator set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub dominant_cluster: DominantClusterConfig,
    pub spatial_weighted: SpatialWeightedConfig,
    pub core_region: CoreRegionConfig,
    pub multi_sampling: MultiSamplingConfig,
    pub hierarchical: HierarchicalConfig,
    pub confidence: ConfidenceConfig,
}

/// Dominant-cluster (k-means) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominantClusterConfig {
    /// Text masking threshold
    pub text_threshold: f64,

    /// Upper bound on cluster count
    pub max_clusters: usize,

    /// Independent restarts
    pub restarts: usize,

    /// Lloyd iterations per restart
    pub max_iterations: usize,

    /// Minimum background pixels required
    pub min_background_pixels: usize,

    /// Initialisation seed
    pub seed: u64,
}

/// Spatially weighted average parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialWeightedConfig {
    /// Text masking threshold
    pub text_threshold: f64,
}

/// Core-region (edge exclusion) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreRegionConfig {
    /// Text masking threshold
    pub text_threshold: f64,

    /// Canny edge detection low threshold
    pub canny_low_threshold: f32,

    /// Canny edge detection high threshold
    pub canny_high_threshold: f32,

    /// Square dilation kernel side (must be odd)
    pub dilation_kernel_size: u8,

    /// Number of dilation passes
    pub dilation_iterations: usize,
}

/// Multi-sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSamplingConfig {
    /// Background test threshold
    pub text_threshold: f64,

    /// Grid step is dimension / grid_divisions
    pub grid_divisions: u32,

    /// Random pass sample count
    pub random_samples: usize,

    /// Circular pass point count
    pub circle_points: usize,

    /// Random pass seed
    pub seed: u64,
}

/// Hierarchical estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalConfig {
    /// Text masking threshold for the medium level
    pub medium_threshold: f64,

    /// Coarse histogram bins per channel
    pub histogram_bins: usize,

    /// Medium level requires strictly more background pixels than this
    pub medium_min_pixels: usize,
}

/// Confidence scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Pixels strictly closer than this count toward a candidate
    pub similarity_radius: f64,
}

impl Default for DominantClusterConfig {
    fn default() -> Self {
        Self {
            text_threshold: masking::DOMINANT_CLUSTER_THRESHOLD,
            max_clusters: clustering::MAX_CLUSTERS,
            restarts: clustering::RESTARTS,
            max_iterations: clustering::MAX_ITERATIONS,
            min_background_pixels: clustering::MIN_BACKGROUND_PIXELS,
            seed: clustering::SEED,
        }
    }
}

impl Default for SpatialWeightedConfig {
    fn default() -> Self {
        Self {
            text_threshold: masking::SPATIAL_WEIGHTED_THRESHOLD,
        }
    }
}

impl Default for CoreRegionConfig {
    fn default() -> Self {
        Self {
            text_threshold: masking::CORE_REGION_THRESHOLD,
            canny_low_threshold: edges::CANNY_LOW_THRESHOLD,
            canny_high_threshold: edges::CANNY_HIGH_THRESHOLD,
            dilation_kernel_size: edges::DILATION_KERNEL_SIZE,
            dilation_iterations: edges::DILATION_ITERATIONS,
        }
    }
}

impl Default for MultiSamplingConfig {
    fn default() -> Self {
        Self {
            text_threshold: masking::MULTI_SAMPLING_THRESHOLD,
            grid_divisions: sampling::GRID_DIVISIONS,
            random_samples: sampling::RANDOM_SAMPLES,
            circle_points: sampling::CIRCLE_POINTS,
            seed: sampling::SEED,
        }
    }
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            medium_threshold: masking::HIERARCHICAL_MEDIUM_THRESHOLD,
            histogram_bins: hierarchy::HISTOGRAM_BINS,
            medium_min_pixels: hierarchy::MEDIUM_MIN_PIXELS,
        }
    }
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            similarity_radius: confidence::SIMILARITY_RADIUS,
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from JSON file
    ///
    /// Missing sections and fields fall back to their defaults. The loaded
    /// configuration is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Check every parameter for a usable value
    pub fn validate(&self) -> Result<()> {
        check_threshold("dominant_cluster.text_threshold", self.dominant_cluster.text_threshold)?;
        check_threshold("spatial_weighted.text_threshold", self.spatial_weighted.text_threshold)?;
        check_threshold("core_region.text_threshold", self.core_region.text_threshold)?;
        check_threshold("multi_sampling.text_threshold", self.multi_sampling.text_threshold)?;
        check_threshold("hierarchical.medium_threshold", self.hierarchical.medium_threshold)?;
        check_threshold("confidence.similarity_radius", self.confidence.similarity_radius)?;

        check_nonzero("dominant_cluster.max_clusters", self.dominant_cluster.max_clusters)?;
        check_nonzero("dominant_cluster.restarts", self.dominant_cluster.restarts)?;
        check_nonzero("dominant_cluster.max_iterations", self.dominant_cluster.max_iterations)?;
        check_nonzero(
            "dominant_cluster.min_background_pixels",
            self.dominant_cluster.min_background_pixels,
        )?;
        check_nonzero("multi_sampling.grid_divisions", self.multi_sampling.grid_divisions as usize)?;
        check_nonzero("hierarchical.histogram_bins", self.hierarchical.histogram_bins)?;
        if self.hierarchical.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(AnalysisError::invalid_parameter(
                "hierarchical.histogram_bins",
                self.hierarchical.histogram_bins,
            ));
        }

        let core = &self.core_region;
        if !(core.canny_low_threshold.is_finite()
            && core.canny_high_threshold.is_finite()
            && 0.0 <= core.canny_low_threshold
            && core.canny_low_threshold <= core.canny_high_threshold)
        {
            return Err(AnalysisError::invalid_parameter(
                "core_region.canny_thresholds",
                format!("{}/{}", core.canny_low_threshold, core.canny_high_threshold),
            ));
        }
        if core.dilation_kernel_size % 2 == 0 {
            return Err(AnalysisError::invalid_parameter(
                "core_region.dilation_kernel_size",
                core.dilation_kernel_size,
            ));
        }

        Ok(())
    }
}

fn check_threshold(parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid_parameter(parameter, value))
    }
}

fn check_nonzero(parameter: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid_parameter(parameter, value))
    }
}
