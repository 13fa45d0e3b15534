//! # Workout Analytics
//!
//! Turns a recorded workout (an ordered GPS trace plus an independent heart-rate
//! stream) into the analytics shown after a session.
//!
//! This library provides:
//! - Per-kilometer (or per-mile) splits with pace and pace deltas
//! - Elevation gain/loss and a decimated elevation profile
//! - Pace-colored route segments for map rendering
//! - Route smoothing filters (Douglas-Peucker, moving average, Catmull-Rom)
//!
//! ## Features
//!
//! - **`parallel`** - Run the independent trace analyses concurrently with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use workout_analytics::{calculate_workout_statistics, LocationSample};
//!
//! let trace: Vec<LocationSample> = (0..30)
//!     .map(|i| LocationSample::new(i as f64 * 10.0, 51.5 + i as f64 * 0.0003, -0.12, 20.0))
//!     .collect();
//!
//! let stats = calculate_workout_statistics(&trace, &[], 290.0, 960.0);
//! println!("{} splits, avg pace {:.0}s/km", stats.splits.len(), stats.average_pace);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{AnalyticsError, OptionExt, Result};

// Geographic utilities (distance, perpendicular distance)
pub mod geo_utils;

// Route smoothing filters
pub mod smoothing;
pub use smoothing::{catmull_rom, douglas_peucker, moving_average, smooth_route, SmoothingConfig};

// Distance-unit splits
pub mod splits;
pub use splits::{
    calculate_splits, calculate_splits_with, format_pace, pace_data_from_splits, KilometerSplit,
    PaceDataPoint, SplitConfig,
};

// Elevation gain/loss and profile
pub mod elevation;
pub use elevation::{build_elevation_profile, ElevationPoint, ElevationProfile};

// Pace-colored route segments
pub mod segments;
pub use segments::{calculate_route_segments, calculate_route_segments_with, RouteSegment};

// Heart-rate summary
pub mod heart_rate;
pub use heart_rate::{summarize_heart_rate, HeartRateSummary};

// Trace filtering and validation
pub mod quality;
pub use quality::{filter_by_accuracy, validate_trace};

// Aggregation into a single result
pub mod statistics;
pub use statistics::{
    calculate_workout_statistics, AnalyticsConfig, StatisticsAggregator, WorkoutStatistics,
};

// Algorithm toolbox - modular access to all algorithms
// Use workout_analytics::algorithms::{...} for standalone algorithm access
pub mod algorithms;

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("WorkoutAnalyticsRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use workout_analytics::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One fix of the recorded trace.
///
/// Samples are produced by the recording subsystem and are only read here.
/// Negative `speed` or accuracy values mean the receiver did not report them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LocationSample {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
    /// Horizontal accuracy radius in meters
    pub horizontal_accuracy: f64,
    /// Vertical accuracy in meters
    pub vertical_accuracy: f64,
    /// Instantaneous speed in m/s (negative when unavailable)
    pub speed: f64,
}

impl LocationSample {
    /// Create a sample with unknown accuracy and speed.
    pub fn new(timestamp: f64, latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            altitude,
            horizontal_accuracy: -1.0,
            vertical_accuracy: -1.0,
            speed: -1.0,
        }
    }

    /// Builder-style setter for the reported speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Builder-style setter for both accuracy fields.
    pub fn with_accuracy(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_accuracy = horizontal;
        self.vertical_accuracy = vertical;
        self
    }

    /// The latitude/longitude of this sample.
    pub fn coordinate(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }

    /// Reported speed, if the receiver provided a usable one.
    pub fn valid_speed(&self) -> Option<f64> {
        (self.speed.is_finite() && self.speed >= 0.0).then_some(self.speed)
    }
}

/// A single heart-rate reading, independent of the location trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct HeartRateSample {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    /// Beats per minute
    pub bpm: f64,
}

impl HeartRateSample {
    pub fn new(timestamp: f64, bpm: f64) -> Self {
        Self { timestamp, bpm }
    }
}

// ============================================================================
// Tests
// ============================================================================
