use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pipeline::{CalibrationError, PipelineParams};

/// Pipeline field a search parameter is bound to, by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tunable {
    VoteThreshold,
    ClusterDistance,
    DeltaRho,
    DeltaTheta,
    DeltaWidth,
    MaxWidth,
    MaximaRadius,
    WidthVoteFloor,
}

impl Tunable {
    pub const ALL: [Tunable; 8] = [
        Tunable::VoteThreshold,
        Tunable::ClusterDistance,
        Tunable::DeltaRho,
        Tunable::DeltaTheta,
        Tunable::DeltaWidth,
        Tunable::MaxWidth,
        Tunable::MaximaRadius,
        Tunable::WidthVoteFloor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tunable::VoteThreshold => "vote_threshold",
            Tunable::ClusterDistance => "cluster_distance",
            Tunable::DeltaRho => "delta_rho",
            Tunable::DeltaTheta => "delta_theta",
            Tunable::DeltaWidth => "delta_width",
            Tunable::MaxWidth => "max_width",
            Tunable::MaximaRadius => "maxima_radius",
            Tunable::WidthVoteFloor => "width_vote_floor",
        }
    }

    /// Write `value` into the bound field. Integer fields truncate toward
    /// zero; negative values saturate at 0.
    pub fn apply(self, value: f64, params: &mut PipelineParams) {
        let hough = &mut params.hough;
        match self {
            Tunable::VoteThreshold => hough.vote_threshold = value as u32,
            Tunable::ClusterDistance => params.cluster.max_distance_in_cluster = value,
            Tunable::DeltaRho => hough.delta_rho = value,
            Tunable::DeltaTheta => hough.delta_theta = value,
            Tunable::DeltaWidth => hough.delta_width = value,
            Tunable::MaxWidth => hough.max_width = value,
            Tunable::MaximaRadius => hough.maxima_radius = value as usize,
            Tunable::WidthVoteFloor => hough.width_vote_floor = value as u32,
        }
    }
}

impl FromStr for Tunable {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tunable::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| CalibrationError::UnknownTunable(s.to_string()))
    }
}

impl fmt::Display for Tunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
