//! Mask-to-count pipeline and its calibration.
//!
//! [`count_objects`] chains the line voter and the cluster counter.
//! [`CountAccuracyEvaluator`] scores pipeline settings on labeled masks,
//! and [`calibrate`] hands that score to the genetic search to tune the
//! thresholds named in a [`CalibrationConfig`].
//!
//! ```
//! use stickcount_calib::{count_objects, PipelineParams};
//! use stickcount_core::EdgeMask;
//!
//! let mask = EdgeMask::from_fn(80, 60, |x, _| x == 15 || x == 40);
//! let mut params = PipelineParams::default();
//! params.hough.max_width = 0.0;
//! params.hough.vote_threshold = 40;
//! params.hough.maxima_radius = 5;
//! assert_eq!(count_objects(&mask, &params).unwrap(), 2);
//! ```

mod calibrate;
mod evaluator;
pub mod io;
mod pipeline;
mod tunable;

pub use calibrate::calibrate;
pub use evaluator::{CountAccuracyEvaluator, LabeledSample};
pub use io::{CalibIoError, CalibrationConfig, CalibrationReport};
pub use pipeline::{count_objects, count_objects_with_workspace, CalibrationError, PipelineParams};
pub use tunable::Tunable;
