//! Line voting in (rho, theta, width) space.
//!
//! Every edge pixel votes for all lines passing through it, sampled at a
//! fixed angular step. Each vote is additionally smeared along a width axis:
//! a pixel that belongs to one border of a stick of width `w` supports a
//! centre line shifted by `w / 2`. The most populated width slice is then
//! searched for local maxima, which become [`LineCandidate`]s.
//!
//! ## Quickstart
//!
//! ```
//! use stickcount_core::EdgeMask;
//! use stickcount_hough::{vote, HoughParams};
//!
//! let mask = EdgeMask::from_fn(64, 64, |x, _| x == 20);
//! let params = HoughParams {
//!     max_width: 0.0,
//!     vote_threshold: 40,
//!     maxima_radius: 5,
//!     ..HoughParams::default()
//! };
//! let lines = vote(&mask, &params).expect("valid params");
//! assert_eq!(lines.len(), 1);
//! ```

mod accumulator;
mod params;
mod voter;

pub use accumulator::{AccumulatorGeometry, HoughWorkspace};
pub use params::{HoughError, HoughParams};
pub use voter::{local_maxima, select_width_bucket, vote, vote_with_workspace, LineVotes};

pub use stickcount_core::LineCandidate;
