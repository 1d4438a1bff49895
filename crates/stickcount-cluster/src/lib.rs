//! Counting distinct lines by agglomerative clustering.
//!
//! Line candidates that describe the same physical object land close to each
//! other in (rho, theta) space. Both axes are normalized into a comparable
//! range, every candidate starts as its own cluster, and the closest pair is
//! merged repeatedly. Two policies decide when to stop:
//!
//! - [`StoppingPolicy::HardThreshold`]: stop once the closest pair is farther
//!   apart than `max_distance_in_cluster`.
//! - [`StoppingPolicy::Adaptive`]: merge everything, then look for the first
//!   jump in the merge-distance curve relative to its smoothed trend
//!   (`max_distance_in_cluster` is then a ratio).
//!
//! Cluster distance is centroid distance by default; [`Linkage::Single`]
//! switches to the closest pair of members.
//!
//! ```
//! use stickcount_cluster::{count_clusters, ClusterParams};
//! use stickcount_core::LineCandidate;
//!
//! let lines = [
//!     LineCandidate::new(10.0, 0.50),
//!     LineCandidate::new(10.4, 0.51),
//!     LineCandidate::new(80.0, 2.00),
//! ];
//! let params = ClusterParams {
//!     max_distance_in_cluster: 0.05,
//!     max_rho: 200.0,
//!     max_theta: std::f64::consts::PI,
//!     ..ClusterParams::default()
//! };
//! assert_eq!(count_clusters(&lines, &params).unwrap().count, 2);
//! ```

mod agglomerative;
mod elbow;
mod params;

pub use agglomerative::{count_clusters, ClusterCount};
pub use elbow::{elbow_cluster_count, find_elbow, smoothed_trend};
pub use params::{ClusterError, ClusterParams, ElbowParams, Linkage, StoppingPolicy};
