use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use stickcount_cluster::{count_clusters, ClusterError, ClusterParams};
use stickcount_core::EdgeSource;
use stickcount_evolve::SearchError;
use stickcount_hough::{vote_with_workspace, HoughError, HoughParams, HoughWorkspace};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Settings of the full mask-to-count pipeline.
///
/// `cluster.max_rho` and `cluster.max_theta` are overwritten per mask with
/// the image diagonal scale and π.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub hough: HoughParams,
    pub cluster: ClusterParams,
}

impl PipelineParams {
    /// Clustering parameters normalized for a `width` x `height` mask.
    pub fn cluster_for(&self, width: usize, height: usize) -> ClusterParams {
        ClusterParams {
            max_rho: width.max(height) as f64 * SQRT_2,
            max_theta: PI,
            collect_clusters: false,
            ..self.cluster.clone()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Hough(#[from] HoughError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("unknown tunable parameter `{0}`")]
    UnknownTunable(String),
    #[error("individual has {got} parameters, expected {expected}")]
    ParameterCount { expected: usize, got: usize },
    #[error("no labeled samples")]
    EmptyDataset,
}

/// Estimate how many objects `mask` shows: vote lines, then cluster them.
pub fn count_objects<M: EdgeSource + ?Sized>(
    mask: &M,
    params: &PipelineParams,
) -> Result<usize, CalibrationError> {
    let mut workspace = HoughWorkspace::new();
    count_objects_with_workspace(mask, params, &mut workspace)
}

/// Same as [`count_objects`], reusing the caller's accumulator buffer.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip_all, fields(width = mask.width(), height = mask.height()))
)]
pub fn count_objects_with_workspace<M: EdgeSource + ?Sized>(
    mask: &M,
    params: &PipelineParams,
    workspace: &mut HoughWorkspace,
) -> Result<usize, CalibrationError> {
    let votes = vote_with_workspace(mask, &params.hough, workspace)?;
    let cluster = params.cluster_for(mask.width(), mask.height());
    Ok(count_clusters(&votes.lines, &cluster)?.count)
}
