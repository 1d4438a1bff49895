use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use stickcount_core::LineCandidate;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::elbow::elbow_cluster_count;
use crate::params::{ClusterError, ClusterParams, Linkage, StoppingPolicy};

/// Outcome of [`count_clusters`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterCount {
    pub count: usize,
    /// Denormalized centroids, present when `collect_clusters` was set.
    pub clusters: Option<Vec<LineCandidate>>,
    /// Distances of the merges performed, in merge order (normalized).
    pub merge_distances: Vec<f64>,
}

/// Count clusters among `points` using the configured stopping policy.
///
/// Empty input counts 0 and a single point counts 1 (returned verbatim when
/// clusters are collected); neither is an error. The merge loop is O(n³) in
/// the number of points, which is fine for the tens of lines a picture
/// produces.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(points, params), fields(n = points.len()))
)]
pub fn count_clusters(
    points: &[LineCandidate],
    params: &ClusterParams,
) -> Result<ClusterCount, ClusterError> {
    params.validate()?;
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(ClusterError::NonFinitePoint { index });
    }

    match points {
        [] => {
            return Ok(ClusterCount {
                count: 0,
                clusters: params.collect_clusters.then(Vec::new),
                merge_distances: Vec::new(),
            })
        }
        [single] => {
            return Ok(ClusterCount {
                count: 1,
                clusters: params.collect_clusters.then(|| vec![*single]),
                merge_distances: Vec::new(),
            })
        }
        _ => {}
    }

    let mut merger = Agglomeration::new(points, params);
    let result = match params.stopping {
        StoppingPolicy::HardThreshold => {
            while let Some((distance, i, j)) = merger.closest_pair() {
                if distance > params.max_distance_in_cluster {
                    break;
                }
                merger.merge(distance, i, j);
            }
            ClusterCount {
                count: merger.len(),
                clusters: params.collect_clusters.then(|| merger.centroids()),
                merge_distances: merger.distances,
            }
        }
        StoppingPolicy::Adaptive(elbow) => {
            while let Some((distance, i, j)) = merger.closest_pair() {
                merger.merge(distance, i, j);
            }
            let count = elbow_cluster_count(&merger.distances, params.max_distance_in_cluster, &elbow);
            // The merge order is deterministic, so replaying it reproduces
            // the partition that had `count` clusters.
            let clusters = params.collect_clusters.then(|| {
                let mut replay = Agglomeration::new(points, params);
                while replay.len() > count {
                    match replay.closest_pair() {
                        Some((distance, i, j)) => replay.merge(distance, i, j),
                        None => break,
                    }
                }
                replay.centroids()
            });
            ClusterCount {
                count,
                clusters,
                merge_distances: merger.distances,
            }
        }
    };

    debug!(
        "{} lines -> {} clusters after {} merges ({:?}, {:?})",
        points.len(),
        result.count,
        result.merge_distances.len(),
        params.stopping,
        params.linkage
    );
    Ok(result)
}

#[derive(Clone, Debug)]
struct Cluster {
    members: Vec<Point2<f64>>,
    centroid: Point2<f64>,
}

impl Cluster {
    fn singleton(p: Point2<f64>) -> Self {
        Self {
            members: vec![p],
            centroid: p,
        }
    }

    /// Union of both member lists, `first` then `second`. The centroid is
    /// recomputed from all members rather than blended from the parents.
    fn merged(first: Cluster, second: Cluster) -> Self {
        let mut members = first.members;
        members.extend(second.members);

        let (sum_rho, sum_theta) = members
            .iter()
            .fold((0.0, 0.0), |(r, t), p| (r + p.x, t + p.y));
        let n = members.len() as f64;
        Self {
            centroid: Point2::new(sum_rho / n, sum_theta / n),
            members,
        }
    }

    fn distance(&self, other: &Cluster, linkage: Linkage) -> f64 {
        match linkage {
            Linkage::Centroid => nalgebra::distance(&self.centroid, &other.centroid),
            Linkage::Single => self
                .members
                .iter()
                .flat_map(|a| other.members.iter().map(move |b| nalgebra::distance(a, b)))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Working set of clusters in normalized coordinates.
struct Agglomeration {
    clusters: Vec<Cluster>,
    distances: Vec<f64>,
    linkage: Linkage,
    scale: (f64, f64),
}

impl Agglomeration {
    fn new(points: &[LineCandidate], params: &ClusterParams) -> Self {
        let clusters = points
            .iter()
            .map(|p| {
                Cluster::singleton(Point2::new(
                    p.rho / params.max_rho,
                    p.theta / params.max_theta,
                ))
            })
            .collect();
        Self {
            clusters,
            distances: Vec::with_capacity(points.len().saturating_sub(1)),
            linkage: params.linkage,
            scale: (params.max_rho, params.max_theta),
        }
    }

    fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Closest pair `(distance, i, j)` with `i < j`; ties keep the first
    /// pair in row-major scan order. `None` once a single cluster is left.
    fn closest_pair(&self) -> Option<(f64, usize, usize)> {
        let n = self.clusters.len();
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.clusters[i].distance(&self.clusters[j], self.linkage);
                if best.map_or(true, |(min, _, _)| d < min) {
                    best = Some((d, i, j));
                }
            }
        }
        best
    }

    /// Replace clusters `i < j` by their union, appended at the end.
    fn merge(&mut self, distance: f64, i: usize, j: usize) {
        // j > i, so removing j first keeps i valid.
        let cj = self.clusters.remove(j);
        let ci = self.clusters.remove(i);
        self.clusters.push(Cluster::merged(cj, ci));
        self.distances.push(distance);
    }

    fn centroids(&self) -> Vec<LineCandidate> {
        let (max_rho, max_theta) = self.scale;
        self.clusters
            .iter()
            .map(|c| LineCandidate::new(c.centroid.x * max_rho, c.centroid.y * max_theta))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ElbowParams;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn lines(raw: &[(f64, f64)]) -> Vec<LineCandidate> {
        raw.iter().map(|&p| LineCandidate::from(p)).collect()
    }

    fn params(threshold: f64, max_rho: f64) -> ClusterParams {
        ClusterParams {
            max_distance_in_cluster: threshold,
            max_rho,
            max_theta: PI,
            ..ClusterParams::default()
        }
    }

    fn three_groups() -> Vec<LineCandidate> {
        lines(&[
            (10.0, 0.5),
            (10.5, 0.51),
            (9.8, 0.49),
            (60.0, 1.5),
            (60.4, 1.52),
            (120.0, 2.8),
            (119.5, 2.79),
            (120.2, 2.81),
        ])
    }

    #[test]
    fn empty_and_single_inputs() {
        let p = ClusterParams {
            collect_clusters: true,
            ..params(0.1, 100.0)
        };
        let empty = count_clusters(&[], &p).unwrap();
        assert_eq!(empty.count, 0);
        assert_eq!(empty.clusters, Some(Vec::new()));

        let one = LineCandidate::new(42.0, 1.0);
        let single = count_clusters(&[one], &p).unwrap();
        assert_eq!(single.count, 1);
        assert_eq!(single.clusters, Some(vec![one]));
        assert!(single.merge_distances.is_empty());
    }

    #[test]
    fn hard_threshold_finds_groups() {
        let p = ClusterParams {
            collect_clusters: true,
            ..params(0.05, 200.0)
        };
        let result = count_clusters(&three_groups(), &p).unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.merge_distances.len(), 5);

        let mut centroids = result.clusters.unwrap();
        centroids.sort_by(|a, b| a.rho.total_cmp(&b.rho));
        assert_abs_diff_eq!(centroids[0].rho, 10.1, epsilon = 1e-9);
        assert_abs_diff_eq!(centroids[0].theta, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(centroids[1].rho, 60.2, epsilon = 1e-9);
        assert_abs_diff_eq!(centroids[1].theta, 1.51, epsilon = 1e-9);
        assert_abs_diff_eq!(centroids[2].rho, 119.9, epsilon = 1e-9);
        assert_abs_diff_eq!(centroids[2].theta, 2.8, epsilon = 1e-9);
    }

    #[test]
    fn hard_threshold_extremes() {
        let points = three_groups();
        assert_eq!(count_clusters(&points, &params(10.0, 200.0)).unwrap().count, 1);
        assert_eq!(
            count_clusters(&points, &params(-1.0, 200.0)).unwrap().count,
            points.len()
        );
    }

    #[test]
    fn centroid_and_single_linkage_differ_on_chain() {
        let chain = lines(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0), (40.0, 0.0)]);
        let centroid = params(0.12, 100.0);
        let single = ClusterParams {
            linkage: Linkage::Single,
            ..centroid.clone()
        };
        assert_eq!(count_clusters(&chain, &centroid).unwrap().count, 3);
        assert_eq!(count_clusters(&chain, &single).unwrap().count, 1);
    }

    #[test]
    fn duplicate_points_merge_at_zero_distance() {
        let points = lines(&[(5.0, 1.0), (5.0, 1.0), (5.0, 1.0)]);
        let result = count_clusters(&points, &params(0.0, 100.0)).unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.merge_distances, vec![0.0, 0.0]);
    }

    #[test]
    fn adaptive_cuts_at_first_jump() {
        let p = ClusterParams {
            stopping: StoppingPolicy::Adaptive(ElbowParams::default()),
            collect_clusters: true,
            ..params(2.0, 200.0)
        };
        let result = count_clusters(&three_groups(), &p).unwrap();
        // Seven merges; the jump sits at index 5, so 7 - 5 clusters remain.
        assert_eq!(result.merge_distances.len(), 7);
        assert_eq!(result.count, 2);
        assert_eq!(result.clusters.map(|c| c.len()), Some(2));
    }

    #[test]
    fn adaptive_without_jump_counts_one() {
        let chain = lines(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0), (40.0, 0.0)]);
        let p = ClusterParams {
            stopping: StoppingPolicy::Adaptive(ElbowParams::default()),
            ..params(3.0, 100.0)
        };
        let result = count_clusters(&chain, &p).unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.merge_distances.len(), 4);
    }

    #[test]
    fn rejects_non_finite_points() {
        let points = lines(&[(1.0, 0.1), (f64::NAN, 0.2)]);
        assert_eq!(
            count_clusters(&points, &params(0.1, 10.0)),
            Err(ClusterError::NonFinitePoint { index: 1 })
        );
    }
}
