//! Heart-rate summary statistics.
//!
//! Values are summarised as-is; no zones or physiological thresholds are applied.

use serde::{Deserialize, Serialize};

use crate::HeartRateSample;

/// Mean/min/max of a heart-rate stream. All `None` for an empty stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSummary {
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Summarise a heart-rate stream.
///
/// Non-finite readings are ignored.
///
/// # Example
/// ```rust
/// use workout_analytics::{summarize_heart_rate, HeartRateSample};
///
/// let samples = vec![HeartRateSample::new(0.0, 120.0), HeartRateSample::new(5.0, 140.0)];
/// let summary = summarize_heart_rate(&samples);
/// assert_eq!(summary.average, Some(130.0));
/// ```
pub fn summarize_heart_rate(samples: &[HeartRateSample]) -> HeartRateSummary {
    let (sum, count, min, max) = samples
        .iter()
        .map(|s| s.bpm)
        .filter(|bpm| bpm.is_finite())
        .fold(
            (0.0, 0usize, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, count, min, max), bpm| (sum + bpm, count + 1, min.min(bpm), max.max(bpm)),
        );

    if count == 0 {
        return HeartRateSummary::default();
    }

    HeartRateSummary {
        average: Some(sum / count as f64),
        min: Some(min),
        max: Some(max),
    }
}
