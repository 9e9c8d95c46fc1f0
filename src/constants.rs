//! Estimation thresholds and WCAG reference values
//!
//! Compile-time constants shared by the estimators and the compliance
//! classifier. Masking thresholds are per-estimator.

/// Text masking thresholds (Euclidean RGB distance to the foreground color)
pub mod masking {
    /// Dominant-cluster estimator
    pub const DOMINANT_CLUSTER_THRESHOLD: f64 = 50.0;

    /// Spatially weighted estimator
    pub const SPATIAL_WEIGHTED_THRESHOLD: f64 = 45.0;

    /// Core-region estimator
    pub const CORE_REGION_THRESHOLD: f64 = 45.0;

    /// Multi-sampling background test
    pub const MULTI_SAMPLING_THRESHOLD: f64 = 45.0;

    /// Hierarchical medium level
    pub const HIERARCHICAL_MEDIUM_THRESHOLD: f64 = 40.0;
}

/// Clustering parameters for the dominant-cluster estimator
pub mod clustering {
    /// Upper bound on the number of clusters
    pub const MAX_CLUSTERS: usize = 4;

    /// Independent k-means restarts; the lowest-inertia run wins
    pub const RESTARTS: usize = 10;

    /// Lloyd iterations per restart
    pub const MAX_ITERATIONS: usize = 300;

    /// Centroid shift (squared) below which a run is considered converged
    pub const TOLERANCE: f64 = 1e-4;

    /// Minimum background pixels required before clustering
    pub const MIN_BACKGROUND_PIXELS: usize = 10;

    /// Seed for centroid initialisation
    pub const SEED: u64 = 42;
}

/// Edge detection and morphology for the core-region estimator
pub mod edges {
    /// Canny hysteresis thresholds
    pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
    pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

    /// Side of the square structuring element used for edge dilation
    pub const DILATION_KERNEL_SIZE: u8 = 5;

    /// Number of dilation passes
    pub const DILATION_ITERATIONS: usize = 2;
}

/// Sampling pattern for the multi-sampling estimator
pub mod sampling {
    /// Grid step is `dimension / GRID_DIVISIONS` (at least 1)
    pub const GRID_DIVISIONS: u32 = 8;

    /// Number of seeded random samples
    pub const RANDOM_SAMPLES: usize = 100;

    /// Number of points on the central circle
    pub const CIRCLE_POINTS: usize = 16;

    /// Seed for the random pass
    pub const SEED: u64 = 42;
}

/// Hierarchical estimator levels
pub mod hierarchy {
    /// Bins per channel of the coarse RGB histogram
    pub const HISTOGRAM_BINS: usize = 16;

    /// Upper bound on `HISTOGRAM_BINS` overrides; one bin per 8-bit level
    pub const MAX_HISTOGRAM_BINS: usize = 256;

    /// Medium level uses the mean only above this many background pixels
    pub const MEDIUM_MIN_PIXELS: usize = 100;
}

/// Confidence scoring
pub mod confidence {
    /// Pixels strictly closer than this distance count as supporting a candidate
    pub const SIMILARITY_RADIUS: f64 = 30.0;
}

/// WCAG 2.x relative luminance and contrast thresholds
pub mod wcag {
    /// sRGB linearisation knee as published in WCAG 2.x
    pub const LINEAR_KNEE: f64 = 0.03928;

    /// Rec. 709 luminance coefficients
    pub const RED_COEFFICIENT: f64 = 0.2126;
    pub const GREEN_COEFFICIENT: f64 = 0.7152;
    pub const BLUE_COEFFICIENT: f64 = 0.0722;

    /// Flare term added to both luminances
    pub const FLARE: f64 = 0.05;

    /// CSS px to pt
    pub const PX_TO_PT: f64 = 0.75;

    /// Large text size limits in points
    pub const LARGE_TEXT_BOLD_PT: f64 = 18.0;
    pub const LARGE_TEXT_REGULAR_PT: f64 = 14.0;

    /// Required ratios (situation A: normal text, situation B: large text)
    pub const NORMAL_TEXT_RATIO: f64 = 4.5;
    pub const LARGE_TEXT_RATIO: f64 = 3.0;
}
