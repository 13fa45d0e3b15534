//! Unified error handling for the workout-analytics library.
//!
//! The analyses themselves are total and never fail. Errors only come from the
//! checked surfaces: configuration validation and strict trace validation.

use thiserror::Error;

/// Unified error type for workout-analytics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Trace has insufficient points for the requested check
    #[error("Trace has {point_count} points, minimum {minimum_required} required")]
    InsufficientPoints {
        point_count: usize,
        minimum_required: usize,
    },
    /// A sample has unusable coordinates
    #[error("Sample {index} has invalid coordinates: {message}")]
    InvalidCoordinates { index: usize, message: String },
    /// A sample has a NaN or infinite timestamp
    #[error("Sample {index} has invalid timestamp {timestamp}")]
    InvalidTimestamp { index: usize, timestamp: f64 },
    /// Samples are not in trace order
    #[error("Sample {index} goes back in time ({current} < {previous})")]
    NonMonotonicTimestamp {
        index: usize,
        previous: f64,
        current: f64,
    },
    /// Configuration error
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },
}

impl AnalyticsError {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        AnalyticsError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for workout-analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Extension trait for converting Option to AnalyticsError.
pub trait OptionExt<T> {
    /// Convert Option to Result with insufficient points error.
    fn ok_or_insufficient_points(self, point_count: usize, minimum: usize) -> Result<T>;

    /// Convert Option to Result with a configuration error.
    fn ok_or_invalid_config(self, field: &str, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(self, point_count: usize, minimum: usize) -> Result<T> {
        self.ok_or(AnalyticsError::InsufficientPoints {
            point_count,
            minimum_required: minimum,
        })
    }

    fn ok_or_invalid_config(self, field: &str, message: &str) -> Result<T> {
        self.ok_or_else(|| AnalyticsError::config(field, message))
    }
}
