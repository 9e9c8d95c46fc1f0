//! Error types for the contrast_scan library
//!
//! Two layers are kept apart:
//! - [`EstimationError`] is a contained, per-estimator outcome ("no estimate").
//!   Callers choose their own fallback order; it never aborts a batch.
//! - [`AnalysisError`] covers the conditions that halt evaluation entirely
//!   (undecodable input, invalid configuration) plus upstream parse failures.

use thiserror::Error;

/// Result type alias for contrast_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Result type alias for a single background estimator
pub type EstimationResult<T> = std::result::Result<T, EstimationError>;

/// Reasons a background estimator produced no estimate
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationError {
    /// Too few pixels survived text masking
    #[error("Insufficient background pixels: {found} found (minimum {required})")]
    InsufficientBackgroundPixels { found: usize, required: usize },

    /// Dilated edges and text together cover the whole image
    #[error("Core region is empty: edges and text cover the entire image")]
    EmptyCoreRegion,

    /// Image has zero area
    #[error("Degenerate image geometry: {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },
}

/// Errors that stop an analysis run or reject caller input
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upstream color string was not `rgb()`, `rgba()` or `#RRGGBB`
    #[error("Could not parse color: {input:?}")]
    ColorParseFailure { input: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single estimator failed where the caller required a value
    #[error("Estimation failed: {0}")]
    Estimation(#[from] EstimationError),
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Parse failures resolve to black upstream and estimator failures have
    /// fallbacks; image and configuration failures do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::ColorParseFailure { .. } | AnalysisError::Estimation(_)
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the captured image. Please check the file and try again.".to_string()
            }
            AnalysisError::ColorParseFailure { input } => {
                format!("The color value {:?} is not a recognised rgb(), rgba() or hex color.", input)
            }
            AnalysisError::Estimation(EstimationError::InsufficientBackgroundPixels { .. }) => {
                "Too little background is visible around the text to estimate its color.".to_string()
            }
            AnalysisError::Estimation(EstimationError::EmptyCoreRegion) => {
                "The capture contains no clean background region away from edges and text.".to_string()
            }
            _ => "Background analysis failed. Please try with a different capture.".to_string(),
        }
    }
}
