//! # Geographic Utilities
//!
//! Distance primitives shared by every analysis in the crate.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`sample_distance`] | Great-circle distance between two trace samples |
//! | [`polyline_length`] | Total length of a GPS track in meters |
//! | [`perpendicular_distance`] | Planar distance from a point to a line, in meters |
//! | [`planar_distance_degrees`] | Euclidean distance in degree space |
//!
//! ## Algorithm Notes
//!
//! Splits, speeds and cumulative distances are all sums of repeated
//! [`haversine_distance`] calls, so that is the only point-to-point formula
//! used for statistics.
//!
//! [`perpendicular_distance`] works in flat degree space scaled by
//! [`METERS_PER_DEGREE`]. It ignores longitude convergence and is only meant
//! for simplification tolerances on workout-sized routes (tens of km at most).

use crate::{GpsPoint, LocationSample};
use geo::{Distance, Haversine, Point};

/// Approximate meters per degree used by the planar approximations.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface.
///
/// # Example
///
/// ```rust
/// use workout_analytics::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Great-circle distance between two trace samples, in meters.
#[inline]
pub fn sample_distance(a: &LocationSample, b: &LocationSample) -> f64 {
    haversine_distance(&a.coordinate(), &b.coordinate())
}

/// Calculate the total length of a polyline (GPS track) in meters.
///
/// Empty or single-point tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Euclidean distance between two points in degree space.
#[inline]
pub fn planar_distance_degrees(a: &GpsPoint, b: &GpsPoint) -> f64 {
    let dx = b.longitude - a.longitude;
    let dy = b.latitude - a.latitude;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `point` to the infinite line through `line_start` and `line_end`.
///
/// Computed in planar degree space and converted with [`METERS_PER_DEGREE`].
/// When both line endpoints coincide, the distance to `line_start` is returned.
///
/// # Example
///
/// ```rust
/// use workout_analytics::{GpsPoint, geo_utils};
///
/// let start = GpsPoint::new(0.0, 0.0);
/// let end = GpsPoint::new(0.0, 0.01);
/// let off = GpsPoint::new(0.001, 0.005);
///
/// let d = geo_utils::perpendicular_distance(&off, &start, &end);
/// assert!((d - 111.0).abs() < 0.01);
/// ```
pub fn perpendicular_distance(point: &GpsPoint, line_start: &GpsPoint, line_end: &GpsPoint) -> f64 {
    let dx = line_end.longitude - line_start.longitude;
    let dy = line_end.latitude - line_start.latitude;
    let length = (dx * dx + dy * dy).sqrt();

    if length < 1e-12 {
        return planar_distance_degrees(point, line_start) * METERS_PER_DEGREE;
    }

    let cross = dy * (point.longitude - line_start.longitude)
        - dx * (point.latitude - line_start.latitude);

    cross.abs() / length * METERS_PER_DEGREE
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = GpsPoint::new(51.5074, -0.1278);
        let paris = GpsPoint::new(48.8566, 2.3522);
        let dist = haversine_distance(&london, &paris);
        assert!(approx_eq(dist, 343_560.0, 5000.0));
    }

    #[test]
    fn test_sample_distance_matches_points() {
        let a = LocationSample::new(0.0, 51.5074, -0.1278, 10.0);
        let b = LocationSample::new(5.0, 51.5080, -0.1280, 12.0);
        assert_eq!(
            sample_distance(&a, &b),
            haversine_distance(&a.coordinate(), &b.coordinate())
        );
    }

    #[test]
    fn test_polyline_length_short_inputs() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[GpsPoint::new(51.5074, -0.1278)]), 0.0);
    }

    #[test]
    fn test_polyline_length_two_points() {
        let track = vec![
            GpsPoint::new(51.5074, -0.1278),
            GpsPoint::new(51.5080, -0.1280),
        ];
        let length = polyline_length(&track);
        assert!(length > 0.0);
        assert!(length < 100.0); // Should be about 68m
    }

    #[test]
    fn test_perpendicular_distance_on_line() {
        let start = GpsPoint::new(10.0, 10.0);
        let end = GpsPoint::new(10.01, 10.01);
        let mid = GpsPoint::new(10.005, 10.005);
        assert!(approx_eq(perpendicular_distance(&mid, &start, &end), 0.0, 1e-6));
    }

    #[test]
    fn test_perpendicular_distance_is_to_infinite_line() {
        // Beyond the end of the segment, still measured to the extended line
        let start = GpsPoint::new(0.0, 0.0);
        let end = GpsPoint::new(0.0, 0.001);
        let beyond = GpsPoint::new(0.0005, 0.01);
        let d = perpendicular_distance(&beyond, &start, &end);
        assert!(approx_eq(d, 0.0005 * METERS_PER_DEGREE, 1e-6));
    }

    #[test]
    fn test_perpendicular_distance_degenerate_line() {
        let start = GpsPoint::new(0.0, 0.0);
        let p = GpsPoint::new(0.0003, 0.0004);
        let d = perpendicular_distance(&p, &start, &start);
        assert!(approx_eq(d, 0.0005 * METERS_PER_DEGREE, 1e-6));
    }
}
