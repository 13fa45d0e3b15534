//! Elevation gain/loss and the elevation-vs-distance chart series.
//!
//! The series is decimated to every Nth sample (plus the final sample) so its
//! length stays bounded for charting regardless of the recording rate.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::sample_distance;
use crate::LocationSample;

/// Default decimation: one chart point every 10 samples.
pub const DEFAULT_SAMPLE_INTERVAL: u32 = 10;

/// One point of the elevation chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ElevationPoint {
    /// Cumulative distance in kilometers
    pub distance: f64,
    /// Altitude in meters
    pub altitude: f64,
}

/// Result of a single elevation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    /// Total climb in meters
    pub gain: f64,
    /// Total descent in meters (positive)
    pub loss: f64,
    /// Decimated elevation-vs-distance series
    pub points: Vec<ElevationPoint>,
}

/// Build the elevation profile with the default decimation.
pub fn build_elevation_profile(locations: &[LocationSample]) -> ElevationProfile {
    build_elevation_profile_with(locations, DEFAULT_SAMPLE_INTERVAL)
}

/// Build the elevation profile, emitting a chart point every `sample_interval` samples.
///
/// A zero interval is treated as 1 (every sample).
pub fn build_elevation_profile_with(
    locations: &[LocationSample],
    sample_interval: u32,
) -> ElevationProfile {
    if locations.len() < 2 {
        return ElevationProfile::default();
    }

    let interval = sample_interval.max(1) as usize;
    let last = locations.len() - 1;
    let mut profile = ElevationProfile::default();
    let mut cumulative = 0.0;

    for (i, pair) in locations.windows(2).enumerate() {
        let index = i + 1;
        let (prev, curr) = (&pair[0], &pair[1]);

        let change = curr.altitude - prev.altitude;
        if change > 0.0 {
            profile.gain += change;
        } else {
            profile.loss -= change;
        }

        cumulative += sample_distance(prev, curr);

        if index % interval == 0 || index == last {
            profile.points.push(ElevationPoint {
                distance: cumulative / 1000.0,
                altitude: curr.altitude,
            });
        }
    }

    debug!(
        "[Elevation] +{:.1}m / -{:.1}m, {} chart points",
        profile.gain,
        profile.loss,
        profile.points.len()
    );

    profile
}
