use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How the distance between two clusters is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    /// Euclidean distance between cluster means.
    #[default]
    Centroid,
    /// Smallest distance between any two members.
    Single,
}

/// Calibration constants of the elbow detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElbowParams {
    /// Weight of the newest merge distance in the exponential trend.
    pub smoothing: f64,
}

impl Default for ElbowParams {
    fn default() -> Self {
        Self { smoothing: 0.4 }
    }
}

/// When the merge loop stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppingPolicy {
    /// Stop as soon as the closest pair exceeds `max_distance_in_cluster`.
    #[default]
    HardThreshold,
    /// Merge down to one cluster and cut at the first jump whose ratio to
    /// the smoothed trend exceeds `max_distance_in_cluster`.
    Adaptive(ElbowParams),
}

/// Parameters for [`crate::count_clusters`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Normalized distance (hard threshold) or jump ratio (adaptive).
    pub max_distance_in_cluster: f64,
    /// Largest rho magnitude; rho is divided by it before clustering.
    pub max_rho: f64,
    /// Largest theta; theta is divided by it before clustering.
    pub max_theta: f64,
    pub stopping: StoppingPolicy,
    pub linkage: Linkage,
    /// Return the denormalized cluster centroids alongside the count.
    pub collect_clusters: bool,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            max_distance_in_cluster: 0.015,
            max_rho: 1.0,
            max_theta: PI,
            stopping: StoppingPolicy::HardThreshold,
            linkage: Linkage::Centroid,
            collect_clusters: false,
        }
    }
}

impl ClusterParams {
    /// Normalization suited to a `width` x `height` image: rho spans the
    /// longer side times √2, theta spans π.
    pub fn for_image(width: usize, height: usize) -> Self {
        Self {
            max_rho: width.max(height) as f64 * std::f64::consts::SQRT_2,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        for (name, value) in [("max_rho", self.max_rho), ("max_theta", self.max_theta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ClusterError::InvalidScale { name, value });
            }
        }
        if self.max_distance_in_cluster.is_nan() {
            return Err(ClusterError::InvalidThreshold(self.max_distance_in_cluster));
        }
        if let StoppingPolicy::Adaptive(elbow) = self.stopping {
            if !(elbow.smoothing > 0.0 && elbow.smoothing <= 1.0) {
                return Err(ClusterError::InvalidSmoothing(elbow.smoothing));
            }
        }
        Ok(())
    }
}

/// Invalid clustering input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("{name} must be finite and > 0 (got {value})")]
    InvalidScale { name: &'static str, value: f64 },
    #[error("max_distance_in_cluster must not be NaN (got {0})")]
    InvalidThreshold(f64),
    #[error("elbow smoothing must be in (0, 1] (got {0})")]
    InvalidSmoothing(f64),
    #[error("line candidate {index} is not finite")]
    NonFinitePoint { index: usize },
}
