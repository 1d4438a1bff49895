//! Accumulator sizing and the reusable vote buffer.

use std::f64::consts::PI;

use crate::params::{HoughError, HoughParams};

/// Bucket layout of the (theta, rho, width) voting grid.
///
/// Cells are stored theta-major, then rho, then width, so a fixed-width
/// slice is strided by `width_buckets`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccumulatorGeometry {
    pub theta_buckets: usize,
    pub rho_buckets: usize,
    pub width_buckets: usize,
    /// Bucket index of rho = 0; negative rho lives below it.
    pub rho_offset: usize,
    /// Total number of cells.
    pub cells: usize,
    pub delta_rho: f64,
    pub delta_theta: f64,
    pub delta_width: f64,
}

impl AccumulatorGeometry {
    /// Size the grid for a `width` x `height` mask.
    ///
    /// The rho axis spans the image diagonal plus half the largest width on
    /// either side of zero, so every shifted vote lands inside the grid.
    pub fn new(width: usize, height: usize, params: &HoughParams) -> Result<Self, HoughError> {
        params.validate()?;

        let theta_buckets = (PI / params.delta_theta).floor() as usize;
        let diagonal = (width as f64).hypot(height as f64);
        let half = ((diagonal + params.max_width / 2.0) / params.delta_rho).ceil() as usize + 1;
        let rho_buckets = half * 2;
        let width_buckets = (params.max_width / params.delta_width).floor() as usize + 1;

        if theta_buckets == 0 {
            return Err(HoughError::DegenerateAccumulator {
                theta: theta_buckets,
                rho: rho_buckets,
                width: width_buckets,
            });
        }

        let cells = theta_buckets
            .checked_mul(rho_buckets)
            .and_then(|n| n.checked_mul(width_buckets))
            .ok_or(HoughError::AccumulatorTooLarge {
                theta: theta_buckets,
                rho: rho_buckets,
                width: width_buckets,
            })?;

        Ok(Self {
            theta_buckets,
            rho_buckets,
            width_buckets,
            rho_offset: half,
            cells,
            delta_rho: params.delta_rho,
            delta_theta: params.delta_theta,
            delta_width: params.delta_width,
        })
    }

    #[inline]
    pub fn index(&self, theta: usize, rho: usize, width: usize) -> usize {
        (theta * self.rho_buckets + rho) * self.width_buckets + width
    }

    /// Rho bucket for a (possibly shifted) distance, `None` if off-grid.
    #[inline]
    pub fn rho_bucket(&self, rho: f64) -> Option<usize> {
        let idx = (rho / self.delta_rho).floor() as isize + self.rho_offset as isize;
        usize::try_from(idx).ok().filter(|&i| i < self.rho_buckets)
    }

    #[inline]
    pub fn theta_at(&self, theta_bucket: usize) -> f64 {
        theta_bucket as f64 * self.delta_theta
    }

    #[inline]
    pub fn rho_at(&self, rho_bucket: usize) -> f64 {
        (rho_bucket as f64 - self.rho_offset as f64) * self.delta_rho
    }

    /// Physical separation represented by a width bucket.
    #[inline]
    pub fn width_at(&self, width_bucket: usize) -> f64 {
        width_bucket as f64 * self.delta_width
    }
}

/// Reusable vote buffer.
///
/// Voting allocates `theta x rho x width` counters, which is large for big
/// masks. A worker that votes repeatedly (e.g. one calibration thread) can
/// keep one workspace and hand it to [`crate::vote_with_workspace`]; only
/// the prefix needed by the current call is cleared. [`HoughWorkspace::release`]
/// returns the memory.
#[derive(Debug, Default)]
pub struct HoughWorkspace {
    counts: Vec<u32>,
}

impl HoughWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated cell capacity.
    pub fn capacity(&self) -> usize {
        self.counts.len()
    }

    /// Drop the buffer.
    pub fn release(&mut self) {
        self.counts = Vec::new();
    }

    /// Zeroed slice covering every cell of `geometry`, growing the buffer
    /// if needed. A grid the allocator cannot hold is reported, not aborted.
    pub(crate) fn prepare(&mut self, geometry: &AccumulatorGeometry) -> Result<&mut [u32], HoughError> {
        let len = geometry.cells;
        if self.counts.len() < len {
            self.counts
                .try_reserve_exact(len - self.counts.len())
                .map_err(|_| HoughError::AccumulatorTooLarge {
                    theta: geometry.theta_buckets,
                    rho: geometry.rho_buckets,
                    width: geometry.width_buckets,
                })?;
            self.counts.resize(len, 0);
        }
        let cells = &mut self.counts[..len];
        cells.fill(0);
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_steps() {
        let params = HoughParams {
            delta_rho: 1.0,
            delta_theta: PI / 180.0,
            delta_width: 1.0,
            max_width: 4.0,
            ..HoughParams::default()
        };
        let g = AccumulatorGeometry::new(30, 40, &params).unwrap();
        assert_eq!(g.theta_buckets, 180);
        assert_eq!(g.width_buckets, 5);
        // hypot(30, 40) = 50, plus 2 px half width, plus one guard bucket.
        assert_eq!(g.rho_offset, 53);
        assert_eq!(g.rho_buckets, 106);
        assert_eq!(g.cells, 180 * 106 * 5);
    }

    #[test]
    fn rho_buckets_round_trip() {
        let g = AccumulatorGeometry::new(10, 10, &HoughParams::default()).unwrap();
        assert_eq!(g.rho_bucket(0.0), Some(g.rho_offset));
        assert_eq!(g.rho_bucket(-0.5), Some(g.rho_offset - 1));
        assert_eq!(g.rho_at(g.rho_offset + 7), 7.0);
        assert_eq!(g.rho_bucket(1e9), None);
        assert_eq!(g.rho_bucket(-1e9), None);
    }

    #[test]
    fn rejects_theta_step_above_pi() {
        let params = HoughParams {
            delta_theta: 4.0,
            ..HoughParams::default()
        };
        assert!(matches!(
            AccumulatorGeometry::new(10, 10, &params),
            Err(HoughError::DegenerateAccumulator { theta: 0, .. })
        ));
    }

    fn flat(cells: usize) -> AccumulatorGeometry {
        AccumulatorGeometry {
            theta_buckets: 1,
            rho_buckets: cells,
            width_buckets: 1,
            rho_offset: 0,
            cells,
            delta_rho: 1.0,
            delta_theta: 1.0,
            delta_width: 1.0,
        }
    }

    #[test]
    fn workspace_clears_reused_prefix() {
        let mut ws = HoughWorkspace::new();
        ws.prepare(&flat(8)).unwrap().fill(3);
        assert_eq!(ws.capacity(), 8);
        let cells = ws.prepare(&flat(4)).unwrap();
        assert!(cells.iter().all(|&c| c == 0));
        assert_eq!(ws.capacity(), 8);
        ws.release();
        assert_eq!(ws.capacity(), 0);
    }

    #[test]
    fn unallocatable_grid_is_an_error() {
        let mut ws = HoughWorkspace::new();
        ws.prepare(&flat(16)).unwrap();
        assert!(matches!(
            ws.prepare(&flat(usize::MAX / 2)),
            Err(HoughError::AccumulatorTooLarge { theta: 1, .. })
        ));
        // The old buffer survives the failed growth.
        assert_eq!(ws.capacity(), 16);
    }
}
