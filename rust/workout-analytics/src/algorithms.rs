//! # Algorithm Toolbox
//!
//! Direct access to every analysis in this crate, for callers that want a
//! single algorithm without running the full statistics pipeline.
//!
//! ## Trace Analyses
//!
//! - **Splits**: Per-unit duration, pace and pace deltas
//! - **Elevation**: Gain/loss and a decimated chart series
//! - **Route Segments**: Pace-colored polyline pieces
//! - **Heart Rate**: Mean/min/max summary
//!
//! ## Geometry and Smoothing
//!
//! - **Haversine Distance**: Great-circle distance between GPS points
//! - **Perpendicular Distance**: Point-to-line distance for simplification
//! - **Douglas-Peucker / Moving Average / Catmull-Rom**: Display smoothing
//!
//! # Example
//!
//! ```rust
//! use workout_analytics::algorithms::{haversine_distance, format_pace, GpsPoint};
//!
//! let london = GpsPoint::new(51.5074, -0.1278);
//! let paris = GpsPoint::new(48.8566, 2.3522);
//! let distance = haversine_distance(&london, &paris);
//! println!("London to Paris: {:.0} km", distance / 1000.0);
//!
//! assert_eq!(format_pace(330.0), "5'30\"");
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{GpsPoint, HeartRateSample, LocationSample};

// =============================================================================
// Geographic Utilities
// =============================================================================

pub use crate::geo_utils::{
    haversine_distance, perpendicular_distance, planar_distance_degrees, polyline_length,
    sample_distance, METERS_PER_DEGREE,
};

// =============================================================================
// Splits
// =============================================================================

pub use crate::splits::{
    calculate_splits, calculate_splits_with, format_pace, pace_data_from_splits, KilometerSplit,
    PaceDataPoint, SplitConfig, KILOMETER, MAX_SPLITS, MILE,
};

// =============================================================================
// Elevation
// =============================================================================

pub use crate::elevation::{
    build_elevation_profile, build_elevation_profile_with, ElevationPoint, ElevationProfile,
    DEFAULT_SAMPLE_INTERVAL,
};

// =============================================================================
// Route Segments
// =============================================================================

pub use crate::segments::{
    calculate_route_segments, calculate_route_segments_with, RouteSegment, DEFAULT_SEGMENT_SIZE,
};

// =============================================================================
// Heart Rate
// =============================================================================

pub use crate::heart_rate::{summarize_heart_rate, HeartRateSummary};

// =============================================================================
// Smoothing
// =============================================================================

pub use crate::smoothing::{
    catmull_rom, douglas_peucker, moving_average, smooth_route, SmoothingConfig, DEFAULT_ALPHA,
};

// =============================================================================
// Trace Quality
// =============================================================================

pub use crate::quality::{filter_by_accuracy, validate_trace, DEFAULT_MAX_HORIZONTAL_ACCURACY};
