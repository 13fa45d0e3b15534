//! Trace filtering and validation.
//!
//! The analyses accept any trace. These helpers are for callers that want to
//! drop poor fixes first, or reject malformed input outright.

use log::debug;

use crate::error::{AnalyticsError, OptionExt, Result};
use crate::LocationSample;

/// Horizontal accuracy (meters) below which a fix is considered usable during recording.
pub const DEFAULT_MAX_HORIZONTAL_ACCURACY: f64 = 50.0;

/// Keep only fixes with a reported horizontal accuracy in `(0, max_accuracy)`.
///
/// Fixes without a reported accuracy (zero or negative) are dropped.
pub fn filter_by_accuracy(locations: &[LocationSample], max_accuracy: f64) -> Vec<LocationSample> {
    let kept: Vec<LocationSample> = locations
        .iter()
        .filter(|l| l.horizontal_accuracy > 0.0 && l.horizontal_accuracy < max_accuracy)
        .copied()
        .collect();

    if kept.len() != locations.len() {
        debug!(
            "[Quality] Dropped {} of {} fixes above {:.0}m accuracy",
            locations.len() - kept.len(),
            locations.len(),
            max_accuracy
        );
    }

    kept
}

/// Strictly validate a trace before analysis.
///
/// Requires at least `minimum_points` samples, valid coordinates, finite
/// altitudes and timestamps that never go backwards.
pub fn validate_trace(locations: &[LocationSample], minimum_points: usize) -> Result<()> {
    if minimum_points > 0 {
        locations
            .get(minimum_points - 1)
            .ok_or_insufficient_points(locations.len(), minimum_points)?;
    }

    let mut previous: Option<f64> = None;
    for (index, sample) in locations.iter().enumerate() {
        if !sample.coordinate().is_valid() {
            return Err(AnalyticsError::InvalidCoordinates {
                index,
                message: format!("({}, {})", sample.latitude, sample.longitude),
            });
        }
        if !sample.altitude.is_finite() {
            return Err(AnalyticsError::InvalidCoordinates {
                index,
                message: format!("altitude {}", sample.altitude),
            });
        }
        if !sample.timestamp.is_finite() {
            return Err(AnalyticsError::InvalidTimestamp {
                index,
                timestamp: sample.timestamp,
            });
        }
        if let Some(prev) = previous {
            if sample.timestamp < prev {
                return Err(AnalyticsError::NonMonotonicTimestamp {
                    index,
                    previous: prev,
                    current: sample.timestamp,
                });
            }
        }
        previous = Some(sample.timestamp);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(t: f64, accuracy: f64) -> LocationSample {
        LocationSample::new(t, 51.5 + t * 0.0001, -0.12, 10.0).with_accuracy(accuracy, 5.0)
    }

    #[test]
    fn test_filter_by_accuracy() {
        let trace = vec![
            fix(0.0, 5.0),
            fix(1.0, 65.0),
            fix(2.0, -1.0),
            fix(3.0, 49.9),
            fix(4.0, 50.0),
        ];
        let kept = filter_by_accuracy(&trace, DEFAULT_MAX_HORIZONTAL_ACCURACY);
        let times: Vec<f64> = kept.iter().map(|l| l.timestamp).collect();
        assert_eq!(times, vec![0.0, 3.0]);
    }

    #[test]
    fn test_validate_ok() {
        let trace = vec![fix(0.0, 5.0), fix(1.0, 5.0), fix(1.0, 5.0)];
        assert_eq!(validate_trace(&trace, 2), Ok(()));
        assert_eq!(validate_trace(&[], 0), Ok(()));
    }

    #[test]
    fn test_validate_too_short() {
        let trace = vec![fix(0.0, 5.0)];
        assert_eq!(
            validate_trace(&trace, 2),
            Err(AnalyticsError::InsufficientPoints {
                point_count: 1,
                minimum_required: 2
            })
        );
    }

    #[test]
    fn test_validate_bad_coordinates() {
        let mut trace = vec![fix(0.0, 5.0), fix(1.0, 5.0)];
        trace[1].latitude = 95.0;
        assert!(matches!(
            validate_trace(&trace, 2),
            Err(AnalyticsError::InvalidCoordinates { index: 1, .. })
        ));
    }

    #[test]
    fn test_validate_time_goes_backwards() {
        let trace = vec![fix(0.0, 5.0), fix(2.0, 5.0), fix(1.0, 5.0)];
        assert!(matches!(
            validate_trace(&trace, 2),
            Err(AnalyticsError::NonMonotonicTimestamp { index: 2, .. })
        ));
    }

    #[test]
    fn test_validate_non_finite_timestamp() {
        let mut trace = vec![fix(0.0, 5.0), fix(1.0, 5.0), fix(2.0, 5.0)];
        trace[1].timestamp = f64::NAN;
        let err = validate_trace(&trace, 2).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidTimestamp { index: 1, timestamp } if timestamp.is_nan()
        ));
        assert!(err.to_string().contains("timestamp NaN"));

        trace[1].timestamp = f64::INFINITY;
        assert!(matches!(
            validate_trace(&trace, 2),
            Err(AnalyticsError::InvalidTimestamp { index: 1, .. })
        ));
    }
}
