//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose Rust functionality
//! to Kotlin and Swift. All FFI functions are prefixed with `ffi_` to avoid
//! naming conflicts with the internal API.

use crate::{
    format_pace, init_logging, smooth_route, AnalyticsConfig, HeartRateSample, LocationSample,
    SmoothingConfig, StatisticsAggregator, WorkoutStatistics,
};
use log::{info, warn};

// ============================================================================
// Statistics
// ============================================================================

/// Compute all post-workout statistics with the default configuration.
#[uniffi::export]
pub fn ffi_calculate_workout_statistics(
    locations: Vec<LocationSample>,
    heart_rate_samples: Vec<HeartRateSample>,
    total_duration: f64,
    total_distance: f64,
) -> WorkoutStatistics {
    init_logging();
    info!(
        "[WorkoutAnalyticsRust] calculate_workout_statistics: {} locations, {} HR samples",
        locations.len(),
        heart_rate_samples.len()
    );

    let start = std::time::Instant::now();
    let stats = StatisticsAggregator::default().calculate(
        &locations,
        &heart_rate_samples,
        total_duration,
        total_distance,
    );

    info!(
        "[WorkoutAnalyticsRust] {} splits, {} segments in {:?}",
        stats.splits.len(),
        stats.route_segments.len(),
        start.elapsed()
    );
    stats
}

/// Compute statistics with a custom configuration.
///
/// Returns `None` if the configuration is rejected.
#[uniffi::export]
pub fn ffi_calculate_workout_statistics_with_config(
    locations: Vec<LocationSample>,
    heart_rate_samples: Vec<HeartRateSample>,
    total_duration: f64,
    total_distance: f64,
    config: AnalyticsConfig,
) -> Option<WorkoutStatistics> {
    init_logging();
    info!(
        "[WorkoutAnalyticsRust] calculate_with_config: {} locations, split {:.0}m",
        locations.len(),
        config.splits.split_distance
    );

    match StatisticsAggregator::try_new(config) {
        Ok(aggregator) => Some(aggregator.calculate(
            &locations,
            &heart_rate_samples,
            total_duration,
            total_distance,
        )),
        Err(e) => {
            warn!("[WorkoutAnalyticsRust] Rejected config: {}", e);
            None
        }
    }
}

/// Get default analytics configuration.
#[uniffi::export]
pub fn ffi_default_analytics_config() -> AnalyticsConfig {
    init_logging();
    info!("[WorkoutAnalyticsRust] default_analytics_config called - Rust is active!");
    AnalyticsConfig::default()
}

// ============================================================================
// Route Display
// ============================================================================

/// Smooth a trace for map display.
#[uniffi::export]
pub fn ffi_smooth_route(
    points: Vec<LocationSample>,
    config: SmoothingConfig,
) -> Vec<LocationSample> {
    init_logging();
    let smoothed = smooth_route(&points, &config);
    info!(
        "[WorkoutAnalyticsRust] smooth_route: {} -> {} points",
        points.len(),
        smoothed.len()
    );
    smoothed
}

/// Get default smoothing configuration.
#[uniffi::export]
pub fn ffi_default_smoothing_config() -> SmoothingConfig {
    SmoothingConfig::default()
}

/// Format a pace in seconds per kilometer as `M'SS"`.
#[uniffi::export]
pub fn ffi_format_pace(seconds_per_km: f64) -> String {
    format_pace(seconds_per_km)
}
