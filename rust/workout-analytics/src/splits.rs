//! Distance-unit splits.
//!
//! Walks the trace accumulating haversine distance and emits one
//! [`KilometerSplit`] each time the running total crosses a multiple of the
//! split distance, plus an optional trailing partial split.
//!
//! ## Multiple boundaries in one step
//! After a GPS gap a single sample can carry the total across several
//! boundaries. One split is emitted per boundary, all ending at that sample.
//! The first of them covers the whole gap; the later ones cover zero distance
//! and zero time.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::sample_distance;
use crate::LocationSample;

/// Meters in a kilometer split.
pub const KILOMETER: f64 = 1000.0;

/// Meters in a statute mile split.
pub const MILE: f64 = 1609.344;

/// Upper bound on the number of splits produced for one trace.
pub const MAX_SPLITS: u32 = 100_000;

/// Split unit and trailing-split threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SplitConfig {
    /// Distance covered by one full split, in meters. Default: 1000.0
    pub split_distance: f64,
    /// Minimum leftover distance for a trailing partial split, in meters. Default: 100.0
    pub min_partial_distance: f64,
}

impl SplitConfig {
    /// Splits per statute mile.
    pub fn miles() -> Self {
        Self {
            split_distance: MILE,
            ..Self::default()
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            split_distance: KILOMETER,
            min_partial_distance: 100.0,
        }
    }
}

/// Performance over one split of the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct KilometerSplit {
    /// 1-based split index
    pub kilometer: u32,
    /// Elapsed seconds between the split's start and end samples
    pub duration: f64,
    /// Seconds per kilometer
    pub pace: f64,
    /// Pace minus the previous split's pace (None for the first split)
    pub pace_change: Option<f64>,
    /// End altitude minus start altitude, in meters
    pub elevation_change: f64,
    /// Distance actually covered by this split, in meters
    pub distance: f64,
    pub start_location: LocationSample,
    pub end_location: LocationSample,
}

impl KilometerSplit {
    /// Pace as `M'SS"`.
    pub fn formatted_pace(&self) -> String {
        format_pace(self.pace)
    }

    /// Signed pace change as `+M'SS"` (slower) or `-M'SS"` (faster).
    pub fn formatted_pace_change(&self) -> Option<String> {
        self.pace_change.map(|change| {
            let sign = if change > 0.0 { "+" } else { "-" };
            format!("{}{}", sign, format_pace(change.abs()))
        })
    }

    /// True when this split was faster than the previous one.
    pub fn is_faster(&self) -> bool {
        self.pace_change.is_some_and(|change| change < 0.0)
    }
}

/// One point of the pace-over-distance chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct PaceDataPoint {
    /// Distance in kilometers
    pub distance: f64,
    /// Seconds per kilometer
    pub pace: f64,
}

/// Format seconds-per-kilometer as `M'SS"`.
///
/// ```rust
/// assert_eq!(workout_analytics::format_pace(302.0), "5'02\"");
/// ```
pub fn format_pace(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{}'{:02}\"", total / 60, total % 60)
}

/// Compute kilometer splits for a trace.
pub fn calculate_splits(locations: &[LocationSample]) -> Vec<KilometerSplit> {
    calculate_splits_with(locations, &SplitConfig::default())
}

/// Compute splits using a custom split distance.
///
/// Returns an empty list for traces with fewer than 2 samples, a
/// non-positive split distance, or a split distance so small that the trace
/// would need [`MAX_SPLITS`] splits or more.
pub fn calculate_splits_with(
    locations: &[LocationSample],
    config: &SplitConfig,
) -> Vec<KilometerSplit> {
    if locations.len() < 2 || config.split_distance.is_nan() || config.split_distance <= 0.0 {
        return Vec::new();
    }

    let unit = config.split_distance;
    let steps: Vec<f64> = locations
        .windows(2)
        .map(|pair| sample_distance(&pair[0], &pair[1]))
        .collect();
    let total: f64 = steps.iter().sum();
    if total / unit >= MAX_SPLITS as f64 {
        debug!(
            "[Splits] {:.0}m at {}m per split exceeds {} splits, skipping",
            total, unit, MAX_SPLITS
        );
        return Vec::new();
    }

    let mut splits: Vec<KilometerSplit> = Vec::new();
    let mut current_index: u32 = 1;
    let mut start_index = 0usize;
    let mut start_distance = 0.0;
    let mut cumulative = 0.0;

    for (i, current) in locations.iter().enumerate().skip(1) {
        cumulative += steps[i - 1];

        while cumulative >= current_index as f64 * unit {
            let start = &locations[start_index];
            let distance = cumulative - start_distance;
            splits.push(make_split(
                current_index,
                start,
                current,
                distance,
                splits.last().map(|s| s.pace),
            ));

            start_index = i;
            start_distance = cumulative;
            current_index += 1;
        }
    }

    let remaining = cumulative - start_distance;
    if remaining >= config.min_partial_distance && remaining > 0.0 {
        let start = &locations[start_index];
        let end = &locations[locations.len() - 1];
        splits.push(make_split(
            current_index,
            start,
            end,
            remaining,
            splits.last().map(|s| s.pace),
        ));
    }

    debug!(
        "[Splits] {} splits over {:.0}m from {} samples",
        splits.len(),
        cumulative,
        locations.len()
    );

    splits
}

fn make_split(
    index: u32,
    start: &LocationSample,
    end: &LocationSample,
    distance: f64,
    previous_pace: Option<f64>,
) -> KilometerSplit {
    let duration = end.timestamp - start.timestamp;
    let pace = if distance > 0.0 {
        duration / (distance / 1000.0)
    } else {
        duration
    };

    KilometerSplit {
        kilometer: index,
        duration,
        pace,
        pace_change: previous_pace.map(|prev| pace - prev),
        elevation_change: end.altitude - start.altitude,
        distance,
        start_location: *start,
        end_location: *end,
    }
}

/// Build the pace-over-distance series, one point per split.
///
/// Full splits sit at their boundary (index times the split distance); a
/// trailing partial split sits at the trace's end distance.
pub fn pace_data_from_splits(
    splits: &[KilometerSplit],
    split_distance: f64,
) -> Vec<PaceDataPoint> {
    let mut covered = 0.0;
    splits
        .iter()
        .map(|split| {
            covered += split.distance;
            let boundary = split.kilometer as f64 * split_distance;
            PaceDataPoint {
                distance: covered.min(boundary) / 1000.0,
                pace: split.pace,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Degrees of latitude per meter along a meridian (slightly under, so
    /// generated spacings land just past the target distance).
    const DEG_PER_METER: f64 = 1.0 / 111_195.0;

    fn at(meters: f64, seconds: f64, altitude: f64) -> LocationSample {
        LocationSample::new(seconds, meters * DEG_PER_METER, 0.0, altitude)
    }

    #[test]
    fn test_two_full_kilometers() {
        let trace = vec![at(0.0, 0.0, 50.0), at(1000.0, 400.0, 50.0), at(2000.0, 800.0, 50.0)];
        let splits = calculate_splits(&trace);

        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].kilometer, 1);
        assert_eq!(splits[1].kilometer, 2);
        for split in &splits {
            assert_eq!(split.duration, 400.0);
            assert!((split.pace - 400.0).abs() < 0.01);
            assert_eq!(split.elevation_change, 0.0);
        }
        assert_eq!(splits[0].pace_change, None);
        assert!(splits[1].pace_change.unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_short_traces_have_no_splits() {
        assert!(calculate_splits(&[]).is_empty());
        assert!(calculate_splits(&[at(0.0, 0.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_trailing_partial_split() {
        let trace = vec![at(0.0, 0.0, 10.0), at(1000.0, 300.0, 20.0), at(1500.0, 480.0, 15.0)];
        let splits = calculate_splits(&trace);

        assert_eq!(splits.len(), 2);
        let partial = &splits[1];
        assert_eq!(partial.kilometer, 2);
        assert_eq!(partial.duration, 180.0);
        assert!((partial.distance - 500.0).abs() < 0.01);
        assert!((partial.pace - 360.0).abs() < 0.1);
        assert_eq!(partial.elevation_change, -5.0);
        assert!(partial.pace_change.unwrap() > 0.0);
    }

    #[test]
    fn test_small_remainder_dropped() {
        let trace = vec![at(0.0, 0.0, 0.0), at(1000.0, 300.0, 0.0), at(1050.0, 320.0, 0.0)];
        let splits = calculate_splits(&trace);
        assert_eq!(splits.len(), 1);
    }

    #[test]
    fn test_partial_only_trace() {
        let trace = vec![at(0.0, 0.0, 0.0), at(400.0, 120.0, 0.0)];
        let splits = calculate_splits(&trace);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].kilometer, 1);
        assert_eq!(splits[0].pace_change, None);
        assert!((splits[0].pace - 300.0).abs() < 0.1);
    }

    #[test]
    fn test_gap_crossing_multiple_boundaries() {
        let trace = vec![
            at(0.0, 0.0, 0.0),
            at(500.0, 150.0, 0.0),
            at(3200.0, 900.0, 0.0),
            at(3900.0, 1100.0, 0.0),
        ];
        let splits = calculate_splits(&trace);
        let indices: Vec<u32> = splits.iter().map(|s| s.kilometer).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);

        // First split absorbs the whole gap
        assert_eq!(splits[0].duration, 900.0);
        assert!((splits[0].distance - 3200.0).abs() < 0.1);
        // Later splits in the same step share its end sample
        assert_eq!(splits[1].duration, 0.0);
        assert_eq!(splits[1].distance, 0.0);
        assert_eq!(splits[2].duration, 0.0);
        assert_eq!(splits[1].end_location, splits[0].end_location);
        // Trailing 700m
        assert_eq!(splits[3].duration, 200.0);

        let pace_data = pace_data_from_splits(&splits, KILOMETER);
        assert!((pace_data[1].distance - 2.0).abs() < 1e-9);
        assert!((pace_data[3].distance - 3.9).abs() < 1e-3);
    }

    #[test]
    fn test_split_distance_never_exceeds_trace() {
        let trace: Vec<LocationSample> = (0..200)
            .map(|i| at(i as f64 * 37.0, i as f64 * 11.0, (i % 7) as f64))
            .collect();
        let total: f64 = trace.windows(2).map(|w| sample_distance(&w[0], &w[1])).sum();
        let splits = calculate_splits(&trace);
        let covered: f64 = splits.iter().map(|s| s.distance).sum();
        assert!(covered <= total + 1e-6);
        for (i, split) in splits.iter().enumerate() {
            assert_eq!(split.kilometer, i as u32 + 1);
            assert!(split.pace >= 0.0);
        }
    }

    #[test]
    fn test_tiny_split_distance_is_bounded() {
        let trace = vec![at(0.0, 0.0, 0.0), at(500.0, 150.0, 0.0), at(1000.0, 300.0, 0.0)];
        let config = SplitConfig {
            split_distance: 1e-7,
            min_partial_distance: 0.0,
        };
        assert!(calculate_splits_with(&trace, &config).is_empty());

        // Just under the bound still splits
        let config = SplitConfig {
            split_distance: 0.02,
            min_partial_distance: 0.0,
        };
        let splits = calculate_splits_with(&trace, &config);
        assert!(splits.len() >= 49_999 && splits.len() < MAX_SPLITS as usize);
    }

    #[test]
    fn test_mile_splits() {
        let trace: Vec<LocationSample> = (0..=40)
            .map(|i| at(i as f64 * 100.0, i as f64 * 30.0, 0.0))
            .collect();
        let splits = calculate_splits_with(&trace, &SplitConfig::miles());
        // 4000m = 2 full miles + 781m partial
        assert_eq!(splits.len(), 3);
        assert!(splits[0].distance >= MILE);
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(0.0), "0'00\"");
        assert_eq!(format_pace(302.7), "5'02\"");
        assert_eq!(format_pace(f64::INFINITY), "0'00\"");
    }

    #[test]
    fn test_formatted_pace_change() {
        let trace = vec![at(0.0, 0.0, 0.0), at(1000.0, 300.0, 0.0), at(2000.0, 589.5, 0.0)];
        let splits = calculate_splits(&trace);
        assert_eq!(splits[0].formatted_pace_change(), None);
        assert!(!splits[0].is_faster());
        assert!(splits[1].is_faster());
        assert_eq!(splits[1].formatted_pace_change().as_deref(), Some("-0'10\""));
        assert_eq!(splits[1].formatted_pace(), "4'49\"");
    }

    #[test]
    fn test_pace_data_positions() {
        let trace = vec![at(0.0, 0.0, 0.0), at(1000.0, 300.0, 0.0), at(1500.0, 450.0, 0.0)];
        let splits = calculate_splits(&trace);
        let pace_data = pace_data_from_splits(&splits, KILOMETER);
        assert_eq!(pace_data.len(), 2);
        assert!((pace_data[0].distance - 1.0).abs() < 1e-9);
        assert!((pace_data[1].distance - 1.5).abs() < 1e-3);
        assert_eq!(pace_data[1].pace, splits[1].pace);
    }
}
