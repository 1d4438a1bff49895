//! Elbow detection on the sequence of merge distances.

use crate::params::ElbowParams;

/// Exponentially smoothed trend of `distances`.
///
/// `avg[0] = d[0]`, `avg[i] = s * d[i] + (1 - s) * avg[i - 1]`.
pub fn smoothed_trend(distances: &[f64], smoothing: f64) -> Vec<f64> {
    let mut trend: Vec<f64> = Vec::with_capacity(distances.len());
    for (i, &d) in distances.iter().enumerate() {
        let avg = match i {
            0 => d,
            _ => d * smoothing + trend[i - 1] * (1.0 - smoothing),
        };
        trend.push(avg);
    }
    trend
}

/// Index of the first merge whose distance jumps above the trend.
///
/// Scans `i >= 1` and returns the first `i` with
/// `d[i] / avg[i - 1] > ratio_threshold`.
pub fn find_elbow(distances: &[f64], ratio_threshold: f64, params: &ElbowParams) -> Option<usize> {
    let trend = smoothed_trend(distances, params.smoothing);
    (1..distances.len()).find(|&i| distances[i] / trend[i - 1] > ratio_threshold)
}

/// Cluster count implied by a full merge sequence of `n - 1` distances.
///
/// A jump at index `i` yields `n - 1 - i`; no jump yields 1.
pub fn elbow_cluster_count(distances: &[f64], ratio_threshold: f64, params: &ElbowParams) -> usize {
    match find_elbow(distances, ratio_threshold, params) {
        Some(i) => distances.len() - i,
        None => 1,
    }
}
