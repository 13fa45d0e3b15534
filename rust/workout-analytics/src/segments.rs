//! Pace-colored route segments.
//!
//! The trace is cut into short polyline pieces, each tagged with a pace and a
//! percentile relative to the slowest and fastest speeds seen in the same
//! workout. Adjacent segments share their joint coordinate so the rendered
//! route has no gaps.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::sample_distance;
use crate::{GpsPoint, LocationSample};

/// Default number of trace steps per segment.
pub const DEFAULT_SEGMENT_SIZE: u32 = 2;

/// A piece of the route for pace coloring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct RouteSegment {
    /// At least two coordinates
    pub coordinates: Vec<GpsPoint>,
    /// Seconds per kilometer (0 when stationary)
    pub pace: f64,
    /// 0.0 = fastest in this workout, 1.0 = slowest
    pub pace_percentile: f64,
}

/// Segment the route with the default segment size.
pub fn calculate_route_segments(locations: &[LocationSample]) -> Vec<RouteSegment> {
    calculate_route_segments_with(locations, DEFAULT_SEGMENT_SIZE)
}

/// Segment the route, each segment spanning `segment_size` trace steps.
///
/// Segment `k` covers samples `start..=min(start + segment_size, n - 1)` and the
/// next segment starts at that end sample. A zero size is treated as 1.
///
/// Returns no segments when fewer than 2 samples are given or no speed can be
/// derived anywhere in the trace.
pub fn calculate_route_segments_with(
    locations: &[LocationSample],
    segment_size: u32,
) -> Vec<RouteSegment> {
    if locations.len() < 2 {
        return Vec::new();
    }

    let speeds = trace_speeds(locations);
    if speeds.is_empty() {
        debug!("[Segments] No usable speeds in {} samples", locations.len());
        return Vec::new();
    }

    let min_speed = speeds.iter().copied().fold(f64::INFINITY, f64::min);
    let max_speed = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max_speed - min_speed;

    let step = segment_size.max(1) as usize;
    let last = locations.len() - 1;
    let mut segments = Vec::with_capacity(last / step + 1);

    let mut start = 0;
    while start < last {
        let end = (start + step).min(last);
        let window = &locations[start..=end];

        let speed = window_speed(window);
        let pace = if speed > 0.0 { 1000.0 / speed } else { 0.0 };
        let percentile = if range > 0.0 {
            1.0 - (speed - min_speed) / range
        } else {
            0.5
        };

        segments.push(RouteSegment {
            coordinates: window.iter().map(LocationSample::coordinate).collect(),
            pace,
            pace_percentile: percentile.clamp(0.0, 1.0),
        });

        start = end;
    }

    debug!(
        "[Segments] {} segments, speed range {:.2}-{:.2} m/s",
        segments.len(),
        min_speed,
        max_speed
    );

    segments
}

/// Reported speeds, or pairwise derived speeds if the receiver reported none.
fn trace_speeds(locations: &[LocationSample]) -> Vec<f64> {
    let reported: Vec<f64> = locations.iter().filter_map(|l| l.valid_speed()).collect();
    if !reported.is_empty() {
        return reported;
    }

    locations
        .windows(2)
        .filter_map(|pair| {
            let distance = sample_distance(&pair[0], &pair[1]);
            let elapsed = pair[1].timestamp - pair[0].timestamp;
            (elapsed > 0.0 && distance > 0.0).then(|| distance / elapsed)
        })
        .collect()
}

/// Mean reported speed in the window, else end-to-end distance over time.
fn window_speed(window: &[LocationSample]) -> f64 {
    let (sum, count) = window
        .iter()
        .filter_map(|l| l.valid_speed())
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));

    if count > 0 {
        return sum / count as f64;
    }

    let (first, last) = (&window[0], &window[window.len() - 1]);
    let elapsed = last.timestamp - first.timestamp;
    if elapsed > 0.0 {
        sample_distance(first, last) / elapsed
    } else {
        0.0
    }
}
