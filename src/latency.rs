//! Detection latency
//!
//! Latency is measured in window-relative units: the position of the first
//! correctly flagged attack record, as a fraction of the window size, times
//! 1000. It is not wall clock time.
use crate::constants::LATENCY_SCALE;
use crate::utils::median;

/// Smallest in-window index where the record is an attack and was predicted as one.
pub fn detection_point(labels: &[f64], predictions: &[f64]) -> Option<usize> {
    labels
        .iter()
        .zip(predictions)
        .position(|(y, p)| *y == 1.0 && *p == 1.0)
}

/// Latency sample of one window, `None` when it has no true positive.
///
/// * `window_size` - Configured records per window; the scale is shared by
///   every window, including a shorter final one.
pub fn window_latency(labels: &[f64], predictions: &[f64], window_size: usize) -> Option<f64> {
    detection_point(labels, predictions).map(|i| (i as f64 / window_size as f64) * LATENCY_SCALE)
}

/// Median over the windows that produced a sample. `None` if none did.
pub fn median_latency(samples: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().flatten().copied().collect();
    median(&values)
}
