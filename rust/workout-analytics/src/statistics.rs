//! Aggregation of all trace analyses into one [`WorkoutStatistics`].
//!
//! ## Pipeline
//! 1. Optionally drop fixes with poor horizontal accuracy
//! 2. Optionally smooth the trace (off by default; statistics use raw fixes)
//! 3. Splits, elevation profile and route segments over the prepared trace
//! 4. Heart-rate summary, average pace and max speed
//!
//! Every call is a pure function of its inputs. With the `parallel` feature
//! the three trace analyses of step 3 run concurrently.

use std::num::NonZeroU32;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elevation::{
    build_elevation_profile_with, ElevationPoint, ElevationProfile, DEFAULT_SAMPLE_INTERVAL,
};
use crate::error::{AnalyticsError, OptionExt, Result};
use crate::heart_rate::summarize_heart_rate;
use crate::quality::filter_by_accuracy;
use crate::segments::{calculate_route_segments_with, RouteSegment, DEFAULT_SEGMENT_SIZE};
use crate::smoothing::{smooth_route, SmoothingConfig};
use crate::splits::{
    calculate_splits_with, pace_data_from_splits, KilometerSplit, PaceDataPoint, SplitConfig,
};
use crate::{HeartRateSample, LocationSample};

#[cfg(feature = "parallel")]
use rayon::join;

/// Configuration for the statistics pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct AnalyticsConfig {
    /// Split unit and trailing-split threshold
    pub splits: SplitConfig,
    /// Emit an elevation chart point every N samples. Default: 10
    pub elevation_sample_interval: u32,
    /// Trace steps per route segment. Default: 2
    pub segment_size: u32,
    /// Drop fixes whose horizontal accuracy is not within (0, this) meters.
    /// Default: None (use every fix). Recording typically uses
    /// [`DEFAULT_MAX_HORIZONTAL_ACCURACY`].
    ///
    /// [`DEFAULT_MAX_HORIZONTAL_ACCURACY`]: crate::quality::DEFAULT_MAX_HORIZONTAL_ACCURACY
    pub max_horizontal_accuracy: Option<f64>,
    /// Smooth the trace before computing statistics. Default: None (raw trace)
    pub smoothing: Option<SmoothingConfig>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            splits: SplitConfig::default(),
            elevation_sample_interval: DEFAULT_SAMPLE_INTERVAL,
            segment_size: DEFAULT_SEGMENT_SIZE,
            max_horizontal_accuracy: None,
            smoothing: None,
        }
    }
}

impl AnalyticsConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let split_distance = self.splits.split_distance;
        if !split_distance.is_finite() || split_distance <= 0.0 {
            return Err(AnalyticsError::config(
                "splits.split_distance",
                format!("must be a positive distance, got {}", split_distance),
            ));
        }

        let min_partial = self.splits.min_partial_distance;
        if !min_partial.is_finite() || min_partial < 0.0 {
            return Err(AnalyticsError::config(
                "splits.min_partial_distance",
                format!("must be non-negative, got {}", min_partial),
            ));
        }

        NonZeroU32::new(self.elevation_sample_interval)
            .ok_or_invalid_config("elevation_sample_interval", "must be at least 1")?;
        NonZeroU32::new(self.segment_size)
            .ok_or_invalid_config("segment_size", "must be at least 1")?;

        if let Some(accuracy) = self.max_horizontal_accuracy {
            if accuracy.is_nan() || accuracy <= 0.0 {
                return Err(AnalyticsError::config(
                    "max_horizontal_accuracy",
                    format!("must be positive, got {}", accuracy),
                ));
            }
        }

        if let Some(smoothing) = &self.smoothing {
            if let Some(epsilon) = smoothing.simplify_epsilon {
                if epsilon.is_nan() || epsilon < 0.0 {
                    return Err(AnalyticsError::config(
                        "smoothing.simplify_epsilon",
                        format!("must be non-negative, got {}", epsilon),
                    ));
                }
            }
            if !(0.0..=1.0).contains(&smoothing.spline_alpha) {
                return Err(AnalyticsError::config(
                    "smoothing.spline_alpha",
                    format!("must be within [0, 1], got {}", smoothing.spline_alpha),
                ));
            }
        }

        Ok(())
    }
}

/// Everything derived from one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct WorkoutStatistics {
    /// Mean bpm (None without heart-rate samples)
    pub average_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub min_heart_rate: Option<f64>,
    /// Total climb in meters
    pub elevation_gain: f64,
    /// Total descent in meters
    pub elevation_loss: f64,
    /// Overall seconds per kilometer from the session totals
    pub average_pace: f64,
    /// Fastest reported instantaneous speed in m/s
    pub max_speed: Option<f64>,
    pub splits: Vec<KilometerSplit>,
    pub elevation_data: Vec<ElevationPoint>,
    pub pace_data: Vec<PaceDataPoint>,
    /// Heart-rate stream passed through for charting
    pub heart_rate_data: Vec<HeartRateSample>,
    pub route_segments: Vec<RouteSegment>,
}

impl WorkoutStatistics {
    /// Statistics for a workout with no data at all.
    pub fn empty() -> Self {
        Self {
            average_heart_rate: None,
            max_heart_rate: None,
            min_heart_rate: None,
            elevation_gain: 0.0,
            elevation_loss: 0.0,
            average_pace: 0.0,
            max_speed: None,
            splits: Vec::new(),
            elevation_data: Vec::new(),
            pace_data: Vec::new(),
            heart_rate_data: Vec::new(),
            route_segments: Vec::new(),
        }
    }
}

/// Compute statistics with the default configuration.
///
/// # Arguments
/// * `locations` - Ordered trace
/// * `heart_rate_samples` - Independent heart-rate stream
/// * `total_duration` - Session duration in seconds
/// * `total_distance` - Session distance in meters
pub fn calculate_workout_statistics(
    locations: &[LocationSample],
    heart_rate_samples: &[HeartRateSample],
    total_duration: f64,
    total_distance: f64,
) -> WorkoutStatistics {
    StatisticsAggregator::default().calculate(
        locations,
        heart_rate_samples,
        total_duration,
        total_distance,
    )
}

/// Runs the statistics pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    config: AnalyticsConfig,
}

impl StatisticsAggregator {
    /// Create an aggregator without validating the configuration.
    ///
    /// Out-of-range values are clamped by the individual analyses.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Create an aggregator, rejecting unusable configuration.
    pub fn try_new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Compute all statistics for one workout.
    pub fn calculate(
        &self,
        locations: &[LocationSample],
        heart_rate_samples: &[HeartRateSample],
        total_duration: f64,
        total_distance: f64,
    ) -> WorkoutStatistics {
        let trace = self.prepare_trace(locations);
        let (splits, elevation, route_segments) = self.analyze_trace(&trace);

        let heart_rate = summarize_heart_rate(heart_rate_samples);
        let average_pace = if total_distance > 0.0 {
            total_duration / (total_distance / 1000.0)
        } else {
            0.0
        };
        let max_speed = trace
            .iter()
            .filter_map(LocationSample::valid_speed)
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));

        let pace_data = pace_data_from_splits(&splits, self.config.splits.split_distance);

        debug!(
            "[Statistics] {} fixes -> {} splits, {} segments, {} elevation points, {} HR samples",
            trace.len(),
            splits.len(),
            route_segments.len(),
            elevation.points.len(),
            heart_rate_samples.len()
        );

        WorkoutStatistics {
            average_heart_rate: heart_rate.average,
            max_heart_rate: heart_rate.max,
            min_heart_rate: heart_rate.min,
            elevation_gain: elevation.gain,
            elevation_loss: elevation.loss,
            average_pace,
            max_speed,
            splits,
            elevation_data: elevation.points,
            pace_data,
            heart_rate_data: heart_rate_samples.to_vec(),
            route_segments,
        }
    }

    /// Route for map display: accuracy-filtered and smoothed.
    ///
    /// Uses the configured smoothing, or [`SmoothingConfig::default`] when the
    /// statistics pipeline itself runs unsmoothed.
    pub fn display_route(&self, locations: &[LocationSample]) -> Vec<LocationSample> {
        let filtered = match self.config.max_horizontal_accuracy {
            Some(max_accuracy) => filter_by_accuracy(locations, max_accuracy),
            None => locations.to_vec(),
        };
        match &self.config.smoothing {
            Some(smoothing) => smooth_route(&filtered, smoothing),
            None => smooth_route(&filtered, &SmoothingConfig::default()),
        }
    }

    fn prepare_trace(&self, locations: &[LocationSample]) -> Vec<LocationSample> {
        let mut trace = match self.config.max_horizontal_accuracy {
            Some(max_accuracy) => filter_by_accuracy(locations, max_accuracy),
            None => locations.to_vec(),
        };
        if let Some(smoothing) = &self.config.smoothing {
            trace = smooth_route(&trace, smoothing);
        }
        trace
    }

    #[cfg(feature = "parallel")]
    fn analyze_trace(
        &self,
        trace: &[LocationSample],
    ) -> (Vec<KilometerSplit>, ElevationProfile, Vec<RouteSegment>) {
        let (splits, (elevation, segments)) = join(
            || calculate_splits_with(trace, &self.config.splits),
            || {
                join(
                    || build_elevation_profile_with(trace, self.config.elevation_sample_interval),
                    || calculate_route_segments_with(trace, self.config.segment_size),
                )
            },
        );
        (splits, elevation, segments)
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_trace(
        &self,
        trace: &[LocationSample],
    ) -> (Vec<KilometerSplit>, ElevationProfile, Vec<RouteSegment>) {
        (
            calculate_splits_with(trace, &self.config.splits),
            build_elevation_profile_with(trace, self.config.elevation_sample_interval),
            calculate_route_segments_with(trace, self.config.segment_size),
        )
    }
}
