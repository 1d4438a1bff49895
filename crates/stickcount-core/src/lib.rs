//! Core types shared by the stick-counting crates.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any image decoder or edge detector: callers hand over an edge
//! mask (or anything implementing [`EdgeSource`]) produced elsewhere.

mod image;
mod line;
mod logger;
mod mask;

pub use image::GrayImageView;
pub use line::LineCandidate;
pub use mask::{EdgeMask, EdgeSource, MaskError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, parse_level, stage, LOG_ENV};
