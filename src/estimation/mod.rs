//! Background color estimation
//!
//! Five independent strategies estimate the background behind a text
//! capture. They are modelled as the closed set [`Estimator`], so batch
//! evaluation and ranking iterate over them uniformly:
//! 1. [`DominantClusterEstimator`]: largest k-means cluster of background pixels
//! 2. [`SpatialWeightedEstimator`]: center-weighted background average
//! 3. [`CoreRegionEstimator`]: median away from edges and text
//! 4. [`MultiSamplingEstimator`]: pooled grid/random/circle samples
//! 5. [`HierarchicalEstimator`]: confidence arbitration over coarse/medium/fine levels
//!
//! Each estimator contains its own failure as an [`EstimationError`]; a failed
//! method never prevents the others from running.

pub mod confidence;
pub mod core_region;
pub mod dominant;
pub mod hierarchical;
pub mod sampling;
pub mod spatial;
mod stats;

pub use confidence::{ConfidenceScore, ConfidenceScorer};
pub use core_region::CoreRegionEstimator;
pub use dominant::DominantClusterEstimator;
pub use hierarchical::{HierarchicalAnalysis, HierarchicalEstimator, Level};
pub use sampling::MultiSamplingEstimator;
pub use spatial::SpatialWeightedEstimator;

use crate::color::conversion::{to_hex, ColorRgb};
use crate::color::distance::color_distance;
use crate::config::EstimatorConfig;
use crate::error::{EstimationError, EstimationResult};
use crate::AnalysisError;
use image::RgbImage;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of background estimation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    DominantCluster,
    SpatialWeighted,
    CoreRegion,
    MultiSampling,
    Hierarchical,
}

impl Estimator {
    /// Every estimator, in canonical order
    pub const ALL: [Estimator; 5] = [
        Estimator::DominantCluster,
        Estimator::SpatialWeighted,
        Estimator::CoreRegion,
        Estimator::MultiSampling,
        Estimator::Hierarchical,
    ];

    /// Stable machine identifier
    pub fn id(&self) -> &'static str {
        match self {
            Estimator::DominantCluster => "dominant_cluster",
            Estimator::SpatialWeighted => "spatial_weighted",
            Estimator::CoreRegion => "core_region",
            Estimator::MultiSampling => "multi_sampling",
            Estimator::Hierarchical => "hierarchical",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Estimator::DominantCluster => "Dominant clustering",
            Estimator::SpatialWeighted => "Spatially weighted",
            Estimator::CoreRegion => "Edge-excluded core region",
            Estimator::MultiSampling => "Multi-sampling",
            Estimator::Hierarchical => "Hierarchical",
        }
    }

    /// Run this estimator with the given configuration
    pub fn estimate(
        &self,
        image: &RgbImage,
        foreground: ColorRgb,
        config: &EstimatorConfig,
    ) -> EstimationResult<ColorRgb> {
        match self {
            Estimator::DominantCluster => {
                DominantClusterEstimator::with_config(config.dominant_cluster.clone())
                    .estimate(image, foreground)
            }
            Estimator::SpatialWeighted => {
                SpatialWeightedEstimator::with_config(config.spatial_weighted.clone())
                    .estimate(image, foreground)
            }
            Estimator::CoreRegion => CoreRegionEstimator::with_config(config.core_region.clone())
                .estimate(image, foreground),
            Estimator::MultiSampling => {
                MultiSamplingEstimator::with_config(config.multi_sampling.clone())
                    .estimate(image, foreground)
            }
            Estimator::Hierarchical => {
                HierarchicalEstimator::from_config(config).estimate(image, foreground)
            }
        }
    }

    /// Run this estimator and wrap the color with its identity
    pub fn run(
        &self,
        image: &RgbImage,
        foreground: ColorRgb,
        config: &EstimatorConfig,
    ) -> EstimationResult<BackgroundEstimate> {
        self.estimate(image, foreground, config)
            .map(|rgb| BackgroundEstimate::new(rgb, *self))
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Estimator {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Estimator::ALL
            .into_iter()
            .find(|e| e.id() == s)
            .ok_or_else(|| AnalysisError::invalid_parameter("estimator", s))
    }
}

/// A background color produced by a specific estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundEstimate {
    pub rgb: ColorRgb,
    /// Lowercase `#rrggbb`
    pub hex: String,
    pub estimator: Estimator,
}

/// A candidate color tagged with the estimator that produced it
pub type CandidateColor = BackgroundEstimate;

impl BackgroundEstimate {
    pub fn new(rgb: ColorRgb, estimator: Estimator) -> Self {
        Self {
            rgb,
            hex: to_hex(rgb),
            estimator,
        }
    }
}

/// Result of one estimator within a batch
#[derive(Debug, Clone, PartialEq)]
pub struct MethodOutcome {
    pub estimator: Estimator,
    pub result: EstimationResult<BackgroundEstimate>,
}

impl MethodOutcome {
    /// The estimate, if the method produced one
    pub fn estimate(&self) -> Option<&BackgroundEstimate> {
        self.result.as_ref().ok()
    }

    /// The contained failure, if any
    pub fn error(&self) -> Option<EstimationError> {
        self.result.as_ref().err().copied()
    }
}

/// A batch outcome placed against a reference color
#[derive(Debug, Clone, PartialEq)]
pub struct RankedOutcome {
    pub outcome: MethodOutcome,
    /// Euclidean distance to the reference; infinite for failed methods
    pub distance: f64,
}

/// Run every estimator against the same image in parallel
///
/// Results come back in canonical [`Estimator::ALL`] order. Failures are
/// recorded per method and never abort the batch.
pub fn evaluate_all(
    image: &RgbImage,
    foreground: ColorRgb,
    config: &EstimatorConfig,
) -> Vec<MethodOutcome> {
    Estimator::ALL
        .par_iter()
        .map(|&estimator| evaluate_one(estimator, image, foreground, config))
        .collect()
}

/// Sequential counterpart of [`evaluate_all`]; produces identical output
pub fn evaluate_all_sequential(
    image: &RgbImage,
    foreground: ColorRgb,
    config: &EstimatorConfig,
) -> Vec<MethodOutcome> {
    Estimator::ALL
        .iter()
        .map(|&estimator| evaluate_one(estimator, image, foreground, config))
        .collect()
}

fn evaluate_one(
    estimator: Estimator,
    image: &RgbImage,
    foreground: ColorRgb,
    config: &EstimatorConfig,
) -> MethodOutcome {
    let result = estimator.run(image, foreground, config);
    match &result {
        Ok(estimate) => debug!("{}: {}", estimator, estimate.hex),
        Err(e) => warn!("{}: no estimate ({})", estimator, e),
    }
    MethodOutcome { estimator, result }
}

/// Sort estimates ascending by distance to a reference color
///
/// The sort is stable: equally distant estimates keep their input order.
pub fn rank_by_reference(
    mut estimates: Vec<BackgroundEstimate>,
    reference: ColorRgb,
) -> Vec<BackgroundEstimate> {
    estimates.sort_by(|a, b| {
        color_distance(a.rgb, reference).total_cmp(&color_distance(b.rgb, reference))
    });
    estimates
}

/// Rank batch outcomes against a reference, failed methods last
pub fn rank_outcomes(outcomes: Vec<MethodOutcome>, reference: ColorRgb) -> Vec<RankedOutcome> {
    let mut ranked: Vec<RankedOutcome> = outcomes
        .into_iter()
        .map(|outcome| {
            let distance = outcome
                .estimate()
                .map_or(f64::INFINITY, |e| color_distance(e.rgb, reference));
            RankedOutcome { outcome, distance }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}
