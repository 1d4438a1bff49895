use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters of the width-aware line voting transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Rho bucket size in pixels.
    pub delta_rho: f64,
    /// Theta bucket size in radians.
    pub delta_theta: f64,
    /// Width bucket size in pixels.
    pub delta_width: f64,
    /// Largest parallel-line separation considered, in pixels.
    pub max_width: f64,
    /// A cell must hold strictly more votes than this to become a line.
    pub vote_threshold: u32,
    /// Half-size of the square neighbourhood used for maxima suppression.
    pub maxima_radius: usize,
    /// Cells at or below this count are ignored when picking the dominant
    /// width. Empirical; tune together with `vote_threshold`.
    pub width_vote_floor: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            delta_rho: 1.0,
            delta_theta: PI / 180.0,
            delta_width: 1.0,
            max_width: 20.0,
            vote_threshold: 150,
            maxima_radius: 10,
            width_vote_floor: 5,
        }
    }
}

/// Invalid voting configuration. These are caller errors and never depend
/// on the mask contents.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HoughError {
    #[error("{name} must be finite and > 0 (got {value})")]
    InvalidStep { name: &'static str, value: f64 },
    #[error("max_width must be finite and >= 0 (got {0})")]
    InvalidMaxWidth(f64),
    #[error("degenerate accumulator ({theta} theta x {rho} rho x {width} width buckets)")]
    DegenerateAccumulator {
        theta: usize,
        rho: usize,
        width: usize,
    },
    #[error("accumulator too large ({theta} theta x {rho} rho x {width} width buckets)")]
    AccumulatorTooLarge {
        theta: usize,
        rho: usize,
        width: usize,
    },
}

impl HoughParams {
    /// Check step sizes and width bounds.
    pub fn validate(&self) -> Result<(), HoughError> {
        for (name, value) in [
            ("delta_rho", self.delta_rho),
            ("delta_theta", self.delta_theta),
            ("delta_width", self.delta_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(HoughError::InvalidStep { name, value });
            }
        }
        if !self.max_width.is_finite() || self.max_width < 0.0 {
            return Err(HoughError::InvalidMaxWidth(self.max_width));
        }
        Ok(())
    }
}
