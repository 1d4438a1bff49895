use std::f64::consts::PI;

use log::debug;
use stickcount_core::{EdgeSource, LineCandidate};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::accumulator::{AccumulatorGeometry, HoughWorkspace};
use crate::params::{HoughError, HoughParams};

/// Lines found by one voting pass plus the width slice they came from.
#[derive(Clone, Debug)]
pub struct LineVotes {
    pub lines: Vec<LineCandidate>,
    /// Width bucket with the largest vote mass.
    pub width_bucket: usize,
    /// Separation of parallel borders that bucket stands for, in pixels.
    pub line_width: f64,
    pub geometry: AccumulatorGeometry,
}

/// Vote every edge pixel of `mask` and extract line candidates.
///
/// The accumulator is allocated for this call and released on return. Use
/// [`vote_with_workspace`] to reuse one buffer across calls.
pub fn vote<M: EdgeSource + ?Sized>(
    mask: &M,
    params: &HoughParams,
) -> Result<Vec<LineCandidate>, HoughError> {
    let mut workspace = HoughWorkspace::new();
    let votes = vote_with_workspace(mask, params, &mut workspace)?;
    workspace.release();
    Ok(votes.lines)
}

/// Same as [`vote`], accumulating into a caller-owned buffer.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(mask, params, workspace),
        fields(width = mask.width(), height = mask.height())
    )
)]
pub fn vote_with_workspace<M: EdgeSource + ?Sized>(
    mask: &M,
    params: &HoughParams,
    workspace: &mut HoughWorkspace,
) -> Result<LineVotes, HoughError> {
    let geometry = AccumulatorGeometry::new(mask.width(), mask.height(), params)?;
    let counts = workspace.prepare(&geometry)?;

    let edge_pixels = accumulate(mask, &geometry, params, counts);
    if edge_pixels == 0 {
        debug!("no edge pixels in {}x{} mask", mask.width(), mask.height());
        return Ok(LineVotes {
            lines: Vec::new(),
            width_bucket: 0,
            line_width: 0.0,
            geometry,
        });
    }

    let width_bucket = select_width_bucket(counts, &geometry, params.width_vote_floor);
    let peaks = maxima_by(
        geometry.theta_buckets,
        geometry.rho_buckets,
        params.vote_threshold,
        params.maxima_radius,
        |t, i| counts[geometry.index(t, i, width_bucket)],
    );
    let lines: Vec<LineCandidate> = peaks
        .into_iter()
        .map(|(t, i)| LineCandidate::new(geometry.rho_at(i), geometry.theta_at(t)))
        .collect();

    debug!(
        "voted {} edge pixels into {}x{}x{} cells, width bucket {} ({:.1} px), {} lines",
        edge_pixels,
        geometry.theta_buckets,
        geometry.rho_buckets,
        geometry.width_buckets,
        width_bucket,
        geometry.width_at(width_bucket),
        lines.len()
    );

    Ok(LineVotes {
        lines,
        width_bucket,
        line_width: geometry.width_at(width_bucket),
        geometry,
    })
}

/// Fill `counts` and return the number of edge pixels seen.
fn accumulate<M: EdgeSource + ?Sized>(
    mask: &M,
    geometry: &AccumulatorGeometry,
    params: &HoughParams,
    counts: &mut [u32],
) -> usize {
    // Offset of the synthetic second point for every sampled angle.
    let offsets: Vec<(f64, f64)> = (0..geometry.theta_buckets)
        .map(|t| {
            let theta = geometry.theta_at(t);
            ((PI - theta).cos() * 10.0, (PI - theta).sin() * 10.0)
        })
        .collect();

    let max_k = geometry.width_buckets as isize - 1;
    let shifts: Vec<(f64, usize)> = (-max_k..=max_k)
        .map(|k| (k as f64 * params.delta_width / 2.0, k.unsigned_abs()))
        .collect();

    let mut edge_pixels = 0usize;
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if !mask.is_edge(x, y) {
                continue;
            }
            edge_pixels += 1;

            let (xf, yf) = (x as f64, y as f64);
            for (t, &(dx, dy)) in offsets.iter().enumerate() {
                let rho = origin_to_line_distance(xf, yf, xf - dx, yf - dy);
                for &(half_width, k) in &shifts {
                    if let Some(i) = geometry.rho_bucket(rho + half_width) {
                        counts[geometry.index(t, i, k)] += 1;
                    }
                }
            }
        }
    }
    edge_pixels
}

/// Signed distance from the origin to the line through two points.
#[inline]
fn origin_to_line_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let numer = x2 * y1 - y2 * x1;
    let denom = (dx * dx + dy * dy).sqrt();
    numer / denom
}

/// Width bucket holding the largest vote mass.
///
/// Only cells with more than `floor` votes contribute, which keeps the
/// diffuse background of every pixel voting for every width from
/// dominating. Ties go to the narrowest width.
pub fn select_width_bucket(counts: &[u32], geometry: &AccumulatorGeometry, floor: u32) -> usize {
    let mut mass = vec![0u64; geometry.width_buckets];
    for cell in counts[..geometry.cells].chunks_exact(geometry.width_buckets) {
        for (k, &v) in cell.iter().enumerate() {
            if v > floor {
                mass[k] += v as u64;
            }
        }
    }

    let mut best = 0;
    for (k, &m) in mass.iter().enumerate() {
        if m > mass[best] {
            best = k;
        }
    }
    best
}

/// Local maxima of a dense row-major `rows x cols` grid.
///
/// A cell qualifies when it exceeds `threshold` and no other in-bounds cell
/// within `radius` (Chebyshev distance) is strictly greater. Equal
/// neighbours do not suppress each other. Returns `(row, col)` pairs in scan
/// order.
pub fn local_maxima(
    values: &[u32],
    rows: usize,
    cols: usize,
    threshold: u32,
    radius: usize,
) -> Vec<(usize, usize)> {
    debug_assert_eq!(values.len(), rows * cols);
    maxima_by(rows, cols, threshold, radius, |r, c| values[r * cols + c])
}

fn maxima_by(
    rows: usize,
    cols: usize,
    threshold: u32,
    radius: usize,
    value: impl Fn(usize, usize) -> u32,
) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let v = value(r, c);
            if v <= threshold {
                continue;
            }

            let r1 = r.saturating_add(radius).min(rows - 1);
            let c1 = c.saturating_add(radius).min(cols - 1);
            let dominated = (r.saturating_sub(radius)..=r1).any(|nr| {
                (c.saturating_sub(radius)..=c1)
                    .any(|nc| (nr, nc) != (r, c) && value(nr, nc) > v)
            });
            if !dominated {
                out.push((r, c));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};
    use stickcount_core::{EdgeMask, GrayImageView};

    fn thin_params() -> HoughParams {
        HoughParams {
            max_width: 0.0,
            vote_threshold: 40,
            maxima_radius: 5,
            ..HoughParams::default()
        }
    }

    #[test]
    fn single_vertical_line_gives_one_candidate() {
        let mask = EdgeMask::from_fn(60, 60, |x, _| x == 30);
        let params = thin_params();
        let lines = vote(&mask, &params).unwrap();

        assert_eq!(lines.len(), 1);
        assert!((lines[0].rho - 30.0).abs() <= params.delta_rho);
        assert!((lines[0].theta - FRAC_PI_2).abs() <= params.delta_theta);
    }

    #[test]
    fn diagonal_line_is_found() {
        let mask = EdgeMask::from_fn(60, 60, |x, y| x == y);
        let params = thin_params();
        let lines = vote(&mask, &params).unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].rho.abs() <= params.delta_rho);
        assert!((lines[0].theta - 3.0 * PI / 4.0).abs() <= params.delta_theta);
    }

    #[test]
    fn separated_lines_are_both_found() {
        let mask = EdgeMask::from_fn(60, 60, |x, _| x == 10 || x == 45);
        let mut lines = vote(&mask, &thin_params()).unwrap();
        lines.sort_by(|a, b| a.rho.total_cmp(&b.rho));

        assert_eq!(lines.len(), 2);
        assert_abs_diff_eq!(lines[0].rho, 10.0, epsilon = 1.0);
        assert_abs_diff_eq!(lines[1].rho, 45.0, epsilon = 1.0);
    }

    #[test]
    fn gray_view_votes_like_mask() {
        let data: Vec<u8> = (0..60 * 60)
            .map(|i| if i % 60 == 30 { 200 } else { 0 })
            .collect();
        let view = GrayImageView {
            width: 60,
            height: 60,
            data: &data,
        };
        let mask = EdgeMask::from_fn(60, 60, |x, _| x == 30);
        assert_eq!(
            vote(&view, &thin_params()).unwrap(),
            vote(&mask, &thin_params()).unwrap()
        );
    }

    #[test]
    fn empty_masks_give_no_lines() {
        let params = HoughParams::default();
        assert!(vote(&EdgeMask::empty(32, 16), &params).unwrap().is_empty());
        assert!(vote(&EdgeMask::empty(0, 0), &params).unwrap().is_empty());
    }

    #[test]
    fn tiny_rho_step_fails_instead_of_aborting() {
        // About 5e18 cells: fits in usize, not in memory.
        let params = HoughParams {
            delta_rho: 1e-14,
            ..thin_params()
        };
        let mask = EdgeMask::from_fn(100, 100, |x, _| x == 50);
        assert!(matches!(
            vote(&mask, &params),
            Err(HoughError::AccumulatorTooLarge { width: 1, .. })
        ));
    }

    #[test]
    fn unbounded_maxima_radius_keeps_global_peaks() {
        assert_eq!(local_maxima(&[0, 9, 0, 0], 2, 2, 5, usize::MAX), vec![(0, 1)]);
        assert_eq!(local_maxima(&[7, 9, 9, 0], 2, 2, 5, usize::MAX), vec![(0, 1), (1, 0)]);

        let mask = EdgeMask::from_fn(60, 60, |x, _| x == 30);
        let params = HoughParams {
            maxima_radius: usize::MAX,
            ..thin_params()
        };
        let lines = vote(&mask, &params).unwrap();
        assert_eq!(lines.len(), 1);
        assert!((lines[0].rho - 30.0).abs() <= params.delta_rho);
    }

    #[test]
    fn invalid_steps_fail_before_voting() {
        let params = HoughParams {
            delta_theta: 0.0,
            ..HoughParams::default()
        };
        assert!(matches!(
            vote(&EdgeMask::empty(4, 4), &params),
            Err(HoughError::InvalidStep {
                name: "delta_theta",
                ..
            })
        ));
    }

    #[test]
    fn workspace_reuse_matches_fresh_vote() {
        let big = EdgeMask::from_fn(80, 80, |x, y| x == 12 || y == 70);
        let small = EdgeMask::from_fn(60, 60, |x, _| x == 30);
        let params = HoughParams {
            max_width: 4.0,
            vote_threshold: 30,
            maxima_radius: 5,
            ..HoughParams::default()
        };

        let mut ws = HoughWorkspace::new();
        vote_with_workspace(&big, &params, &mut ws).unwrap();
        let reused = vote_with_workspace(&small, &params, &mut ws).unwrap();
        let fresh = vote(&small, &params).unwrap();
        assert_eq!(reused.lines, fresh);
    }

    #[test]
    fn width_bucket_prefers_concentrated_mass() {
        let params = HoughParams {
            delta_theta: PI / 2.0,
            max_width: 2.0,
            ..HoughParams::default()
        };
        let geometry = AccumulatorGeometry::new(2, 2, &params).unwrap();
        let mut counts = vec![0u32; geometry.cells];
        // Many cells at or below the floor in bucket 0 do not count.
        for i in 0..geometry.rho_buckets {
            counts[geometry.index(0, i, 0)] = 5;
        }
        counts[geometry.index(1, 3, 2)] = 9;
        counts[geometry.index(0, 2, 1)] = 8;

        assert_eq!(select_width_bucket(&counts, &geometry, 5), 2);
        assert_eq!(select_width_bucket(&counts, &geometry, 4), 0);
    }

    #[test]
    fn width_bucket_ties_go_to_narrowest() {
        let params = HoughParams {
            delta_theta: PI / 2.0,
            max_width: 2.0,
            ..HoughParams::default()
        };
        let geometry = AccumulatorGeometry::new(2, 2, &params).unwrap();
        let counts = vec![0u32; geometry.cells];
        assert_eq!(select_width_bucket(&counts, &geometry, 5), 0);
    }

    #[test]
    fn equal_neighbours_do_not_suppress() {
        #[rustfmt::skip]
        let grid = [
            0,  0,  0, 0, 0,
            0, 10, 10, 0, 0,
            0,  0,  0, 0, 0,
        ];
        let peaks = local_maxima(&grid, 3, 5, 5, 1);
        assert_eq!(peaks, vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn strictly_greater_neighbour_suppresses_both() {
        #[rustfmt::skip]
        let grid = [
            0,  0,  0,  0, 0,
            0, 10, 10, 12, 0,
            0,  0,  0,  0, 0,
        ];
        // Radius 2 lets the 12 reach both tens.
        let peaks = local_maxima(&grid, 3, 5, 5, 2);
        assert_eq!(peaks, vec![(1, 3)]);

        // With radius 1 the left ten is out of reach of the 12.
        let peaks = local_maxima(&grid, 3, 5, 5, 1);
        assert_eq!(peaks, vec![(1, 1), (1, 3)]);
    }

    #[test]
    fn threshold_is_strict() {
        let grid = [7u32, 0, 0, 8];
        assert_eq!(local_maxima(&grid, 2, 2, 7, 0), vec![(1, 1)]);
    }
}
