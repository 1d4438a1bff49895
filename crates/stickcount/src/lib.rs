//! High-level facade crate for the `stickcount-*` workspace.
//!
//! This crate provides:
//! - re-exports of the voting, clustering, search and calibration crates
//! - (feature-gated) helpers that take an `image::GrayImage` edge map
//!   produced by any edge detector and count the objects in it.
//!
//! ## Quickstart
//!
//! ```no_run
//! use stickcount::detect;
//! use stickcount::PipelineParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let edges = image::open("sticks_edges.png")?.to_luma8();
//! let count = detect::count_in_edge_image(&edges, &PipelineParams::default())?;
//! println!("counted {count} sticks");
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `stickcount::core`: edge masks, line candidates, logging setup.
//! - `stickcount::hough`: width-aware rho/theta voting.
//! - `stickcount::cluster`: agglomerative counting of line candidates.
//! - `stickcount::evolve`: seeded genetic search.
//! - `stickcount::calib`: the counting pipeline and its calibration.
//! - `stickcount::detect` (feature `image`): helpers from `image::GrayImage`.
//!
//! `cargo run --example calibrate_synthetic` calibrates on generated masks
//! and prints the report.

pub use stickcount_calib as calib;
pub use stickcount_cluster as cluster;
pub use stickcount_core as core;
pub use stickcount_evolve as evolve;
pub use stickcount_hough as hough;

pub use stickcount_calib::{
    calibrate, count_objects, CalibrationConfig, CalibrationError, CalibrationReport,
    LabeledSample, PipelineParams,
};
pub use stickcount_core::{EdgeMask, EdgeSource, LineCandidate};

#[cfg(feature = "image")]
pub mod detect;
