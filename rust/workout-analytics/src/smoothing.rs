//! Route smoothing filters for display polylines.
//!
//! Three independent filters over an ordered trace:
//! - [`douglas_peucker`] removes points that add negligible shape
//! - [`moving_average`] damps GPS jitter in latitude/longitude
//! - [`catmull_rom`] densifies the route with a centripetal spline
//!
//! None of these are needed for statistical correctness. The aggregator only
//! runs them when [`crate::AnalyticsConfig::smoothing`] is set.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::{perpendicular_distance, planar_distance_degrees};
use crate::{GpsPoint, LocationSample};

/// Default centripetal exponent for Catmull-Rom interpolation.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Which smoothing stages to run, and with what parameters.
///
/// Disabled stages are `None`. Stages run in the order simplify, moving
/// average, spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SmoothingConfig {
    /// Douglas-Peucker tolerance in meters
    pub simplify_epsilon: Option<f64>,
    /// Moving average half window (window = 2 * half + 1)
    pub moving_average_half_window: Option<u32>,
    /// Interpolated points per original segment
    pub spline_points_per_segment: Option<u32>,
    /// Centripetal exponent (0 = uniform, 0.5 = centripetal, 1 = chordal)
    pub spline_alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            simplify_epsilon: Some(2.0),
            moving_average_half_window: Some(2),
            spline_points_per_segment: Some(4),
            spline_alpha: DEFAULT_ALPHA,
        }
    }
}

/// Run every enabled stage of `config` over `points`.
pub fn smooth_route(points: &[LocationSample], config: &SmoothingConfig) -> Vec<LocationSample> {
    let mut route = points.to_vec();

    if let Some(epsilon) = config.simplify_epsilon {
        route = douglas_peucker(&route, epsilon);
    }
    if let Some(half_window) = config.moving_average_half_window {
        route = moving_average(&route, half_window as usize);
    }
    if let Some(per_segment) = config.spline_points_per_segment {
        route = catmull_rom(&route, per_segment as usize, config.spline_alpha);
    }

    debug!(
        "[Smoothing] {} points -> {} points",
        points.len(),
        route.len()
    );

    route
}

// ============================================================================
// Douglas-Peucker
// ============================================================================

/// Simplify a trace with the Ramer-Douglas-Peucker algorithm.
///
/// `epsilon` is in meters (see [`perpendicular_distance`]). Negative or NaN
/// tolerances are treated as zero. The first and last samples are always kept
/// and the output never has more points than the input.
///
/// Uses an explicit work stack so very long traces cannot overflow the call stack.
///
/// # Example
/// ```rust
/// use workout_analytics::{douglas_peucker, LocationSample};
///
/// let line: Vec<LocationSample> = (0..5)
///     .map(|i| LocationSample::new(i as f64, 51.5 + i as f64 * 0.001, -0.12, 0.0))
///     .collect();
/// assert_eq!(douglas_peucker(&line, 5.0).len(), 2);
/// ```
pub fn douglas_peucker(points: &[LocationSample], epsilon: f64) -> Vec<LocationSample> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let epsilon = epsilon.max(0.0);
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let chord_start = points[start].coordinate();
        let chord_end = points[end].coordinate();

        let mut max_distance = 0.0;
        let mut max_index = start;
        for (i, point) in points.iter().enumerate().take(end).skip(start + 1) {
            let distance = perpendicular_distance(&point.coordinate(), &chord_start, &chord_end);
            if distance > max_distance {
                max_distance = distance;
                max_index = i;
            }
        }

        if max_distance > epsilon {
            keep[max_index] = true;
            stack.push((max_index, end));
            stack.push((start, max_index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

// ============================================================================
// Moving Average
// ============================================================================

/// Average latitude/longitude over a symmetric window of `±half_window` samples.
///
/// The window is clamped at the trace boundaries. Altitude, accuracy, speed and
/// timestamp are taken from the center sample unchanged. Traces no longer than
/// the full window are returned as-is.
pub fn moving_average(points: &[LocationSample], half_window: usize) -> Vec<LocationSample> {
    let window = half_window.saturating_mul(2).saturating_add(1);
    if points.len() <= window {
        return points.to_vec();
    }

    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, center)| {
            let lo = i.saturating_sub(half_window);
            let hi = (i + half_window).min(last);
            let span = &points[lo..=hi];
            let n = span.len() as f64;

            let mut smoothed = *center;
            smoothed.latitude = span.iter().map(|p| p.latitude).sum::<f64>() / n;
            smoothed.longitude = span.iter().map(|p| p.longitude).sum::<f64>() / n;
            smoothed
        })
        .collect()
}

// ============================================================================
// Catmull-Rom
// ============================================================================

/// Densify a trace with a centripetal Catmull-Rom spline.
///
/// For every consecutive pair of samples, `points_per_segment` points are
/// generated (the last of which is the pair's second sample). End segments
/// repeat the boundary sample as the missing neighbour. The output starts with
/// the first raw sample and has `1 + points_per_segment * (n - 1)` points.
///
/// Requires at least 4 samples and `points_per_segment >= 1`; otherwise the
/// input is returned unchanged.
pub fn catmull_rom(
    points: &[LocationSample],
    points_per_segment: usize,
    alpha: f64,
) -> Vec<LocationSample> {
    if points.len() < 4 || points_per_segment == 0 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut result = Vec::with_capacity(1 + points_per_segment * last);
    result.push(points[0]);

    for i in 0..last {
        let p0 = &points[i.saturating_sub(1)];
        let p1 = &points[i];
        let p2 = &points[i + 1];
        let p3 = &points[(i + 2).min(last)];

        let knots = centripetal_knots(
            [p0.coordinate(), p1.coordinate(), p2.coordinate(), p3.coordinate()],
            alpha,
        );

        for j in 1..=points_per_segment {
            let local_t = j as f64 / points_per_segment as f64;
            let coordinate = match knots {
                Some(knots) => blend(
                    [p0.coordinate(), p1.coordinate(), p2.coordinate(), p3.coordinate()],
                    knots,
                    local_t,
                ),
                None => lerp_point(&p1.coordinate(), &p2.coordinate(), local_t),
            };
            result.push(interpolate_sample(p1, p2, coordinate, local_t));
        }
    }

    result
}

/// Knot values t0..t3, or `None` if any two consecutive knots coincide.
fn centripetal_knots(control: [GpsPoint; 4], alpha: f64) -> Option<[f64; 4]> {
    let mut knots = [0.0; 4];
    for k in 1..4 {
        let step = planar_distance_degrees(&control[k - 1], &control[k]).powf(alpha);
        if step.is_nan() || step <= 0.0 {
            return None;
        }
        knots[k] = knots[k - 1] + step;
    }
    Some(knots)
}

/// Barry-Goldman pyramid evaluation between the two central control points.
fn blend(control: [GpsPoint; 4], knots: [f64; 4], local_t: f64) -> GpsPoint {
    let [p0, p1, p2, p3] = control;
    let [t0, t1, t2, t3] = knots;
    let t = t1 + local_t * (t2 - t1);

    let a1 = mix(&p0, &p1, (t1 - t) / (t1 - t0), (t - t0) / (t1 - t0));
    let a2 = mix(&p1, &p2, (t2 - t) / (t2 - t1), (t - t1) / (t2 - t1));
    let a3 = mix(&p2, &p3, (t3 - t) / (t3 - t2), (t - t2) / (t3 - t2));

    let b1 = mix(&a1, &a2, (t2 - t) / (t2 - t0), (t - t0) / (t2 - t0));
    let b2 = mix(&a2, &a3, (t3 - t) / (t3 - t1), (t - t1) / (t3 - t1));

    mix(&b1, &b2, (t2 - t) / (t2 - t1), (t - t1) / (t2 - t1))
}

#[inline]
fn mix(a: &GpsPoint, b: &GpsPoint, wa: f64, wb: f64) -> GpsPoint {
    GpsPoint::new(
        a.latitude * wa + b.latitude * wb,
        a.longitude * wa + b.longitude * wb,
    )
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
fn lerp_point(a: &GpsPoint, b: &GpsPoint, t: f64) -> GpsPoint {
    GpsPoint::new(lerp(a.latitude, b.latitude, t), lerp(a.longitude, b.longitude, t))
}

fn interpolate_sample(
    p1: &LocationSample,
    p2: &LocationSample,
    coordinate: GpsPoint,
    t: f64,
) -> LocationSample {
    let speed = match (p1.valid_speed(), p2.valid_speed()) {
        (Some(a), Some(b)) => lerp(a, b, t),
        _ => -1.0,
    };

    LocationSample {
        timestamp: lerp(p1.timestamp, p2.timestamp, t),
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
        altitude: lerp(p1.altitude, p2.altitude, t),
        horizontal_accuracy: (p1.horizontal_accuracy + p2.horizontal_accuracy) / 2.0,
        vertical_accuracy: (p1.vertical_accuracy + p2.vertical_accuracy) / 2.0,
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize, lat: f64, lng: f64) -> LocationSample {
        LocationSample::new(i as f64 * 5.0, lat, lng, 10.0 + i as f64)
    }

    fn zigzag(n: usize) -> Vec<LocationSample> {
        (0..n)
            .map(|i| {
                let offset = if i % 2 == 0 { 0.0 } else { 0.0005 };
                sample(i, 51.5 + i as f64 * 0.001, -0.12 + offset)
            })
            .collect()
    }

    #[test]
    fn test_douglas_peucker_collinear_collapse() {
        let line: Vec<LocationSample> = (0..5)
            .map(|i| sample(i, 51.5 + i as f64 * 0.001, -0.12 + i as f64 * 0.001))
            .collect();
        let simplified = douglas_peucker(&line, 5.0);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], line[0]);
        assert_eq!(simplified[1], line[4]);
    }

    #[test]
    fn test_douglas_peucker_short_input_unchanged() {
        let two = vec![sample(0, 51.5, -0.12), sample(1, 51.6, -0.13)];
        assert_eq!(douglas_peucker(&two, 10.0), two);
        assert!(douglas_peucker(&[], 10.0).is_empty());
    }

    #[test]
    fn test_douglas_peucker_never_grows_and_keeps_endpoints() {
        let route = zigzag(25);
        for epsilon in [-1.0, 0.0, 1.0, 20.0, 100.0, 10_000.0] {
            let simplified = douglas_peucker(&route, epsilon);
            assert!(simplified.len() <= route.len());
            assert_eq!(simplified.first(), route.first());
            assert_eq!(simplified.last(), route.last());
        }
    }

    #[test]
    fn test_douglas_peucker_keeps_significant_corner() {
        // Out 1km east, then 1km north: the corner must survive
        let route = vec![
            sample(0, 51.5, -0.12),
            sample(1, 51.5, -0.113),
            sample(2, 51.5, -0.106),
            sample(3, 51.509, -0.106),
            sample(4, 51.518, -0.106),
        ];
        let simplified = douglas_peucker(&route, 5.0);
        assert_eq!(simplified.len(), 3);
        assert_eq!(simplified[1], route[2]);
    }

    #[test]
    fn test_douglas_peucker_preserves_order() {
        let route = zigzag(15);
        let simplified = douglas_peucker(&route, 1.0);
        for w in simplified.windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }

    #[test]
    fn test_moving_average_preserves_length() {
        let route = zigzag(20);
        let smoothed = moving_average(&route, 2);
        assert_eq!(smoothed.len(), route.len());
    }

    #[test]
    fn test_moving_average_keeps_center_fields() {
        let route = zigzag(10);
        let smoothed = moving_average(&route, 1);
        for (raw, out) in route.iter().zip(&smoothed) {
            assert_eq!(raw.timestamp, out.timestamp);
            assert_eq!(raw.altitude, out.altitude);
            assert_eq!(raw.horizontal_accuracy, out.horizontal_accuracy);
        }
        // Interior point averages three neighbours
        let expected_lng = (route[3].longitude + route[4].longitude + route[5].longitude) / 3.0;
        assert!((smoothed[4].longitude - expected_lng).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_short_input_noop() {
        let route = zigzag(5);
        assert_eq!(moving_average(&route, 2), route);
    }

    #[test]
    fn test_catmull_rom_output_length() {
        let route = zigzag(6);
        let dense = catmull_rom(&route, 4, DEFAULT_ALPHA);
        assert_eq!(dense.len(), 1 + 4 * (route.len() - 1));
        assert_eq!(dense[0], route[0]);
    }

    #[test]
    fn test_catmull_rom_passes_through_control_points() {
        let route = zigzag(6);
        let dense = catmull_rom(&route, 4, DEFAULT_ALPHA);
        for (i, raw) in route.iter().enumerate().skip(1) {
            let out = &dense[i * 4];
            assert!((out.latitude - raw.latitude).abs() < 1e-9);
            assert!((out.longitude - raw.longitude).abs() < 1e-9);
            assert!((out.timestamp - raw.timestamp).abs() < 1e-9);
            assert!((out.altitude - raw.altitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_catmull_rom_interpolates_time_and_altitude() {
        let route = zigzag(5);
        let dense = catmull_rom(&route, 2, DEFAULT_ALPHA);
        // Midpoint of the second segment (samples 1 -> 2)
        let mid = &dense[3];
        assert!((mid.timestamp - 7.5).abs() < 1e-9);
        assert!((mid.altitude - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_catmull_rom_duplicate_points_fall_back_to_linear() {
        let mut route = zigzag(5);
        route[2].latitude = route[1].latitude;
        route[2].longitude = route[1].longitude;
        let dense = catmull_rom(&route, 3, DEFAULT_ALPHA);
        assert_eq!(dense.len(), 13);
        assert!(dense.iter().all(|p| p.latitude.is_finite() && p.longitude.is_finite()));
    }

    #[test]
    fn test_catmull_rom_requires_four_points() {
        let route = zigzag(3);
        assert_eq!(catmull_rom(&route, 4, DEFAULT_ALPHA), route);
        let route = zigzag(6);
        assert_eq!(catmull_rom(&route, 0, DEFAULT_ALPHA), route);
    }

    #[test]
    fn test_smooth_route_disabled_stages_is_identity() {
        let route = zigzag(12);
        let config = SmoothingConfig {
            simplify_epsilon: None,
            moving_average_half_window: None,
            spline_points_per_segment: None,
            spline_alpha: DEFAULT_ALPHA,
        };
        assert_eq!(smooth_route(&route, &config), route);
    }

    #[test]
    fn test_smooth_route_default() {
        let route = zigzag(40);
        let smoothed = smooth_route(&route, &SmoothingConfig::default());
        assert_eq!(smoothed.first().map(|p| p.timestamp), Some(0.0));
        assert!(smoothed.iter().all(|p| p.coordinate().is_valid()));
    }
}
