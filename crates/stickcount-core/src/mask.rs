//! Binary edge masks.

use serde::{Deserialize, Serialize};

/// Anything that can answer "is this pixel an edge?" on a rectangular grid.
///
/// `x` is the column and `y` the row, both zero-based. Implementations may
/// assume `x < width()` and `y < height()`.
pub trait EdgeSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_edge(&self, x: usize, y: usize) -> bool;
}

/// Errors raised when building an [`EdgeMask`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("edge mask buffer length mismatch (expected {expected}, got {got})")]
    BufferSize { expected: usize, got: usize },
    #[error("edge mask dimensions overflow (width={width}, height={height})")]
    Dimensions { width: usize, height: usize },
}

/// Immutable row-major grid of edge flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl EdgeMask {
    /// Mask of the given size with no edge pixels.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    /// Wrap a row-major buffer of `width * height` flags.
    pub fn from_vec(width: usize, height: usize, data: Vec<bool>) -> Result<Self, MaskError> {
        let expected = width
            .checked_mul(height)
            .ok_or(MaskError::Dimensions { width, height })?;
        if data.len() != expected {
            return Err(MaskError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Threshold a row-major intensity buffer: any positive value is an edge.
    pub fn from_intensities(width: usize, height: usize, pixels: &[u8]) -> Result<Self, MaskError> {
        Self::from_vec(width, height, pixels.iter().map(|&v| v > 0).collect())
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, edge: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = edge;
        }
    }

    /// Number of pixels flagged as edges.
    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&e| e).count()
    }

    /// Fraction of pixels flagged as edges, 0 for an empty grid.
    pub fn edge_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.edge_count() as f64 / self.data.len() as f64
    }

    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&e| e)
    }
}

impl EdgeSource for EdgeMask {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }
}

impl<T: EdgeSource + ?Sized> EdgeSource for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn is_edge(&self, x: usize, y: usize) -> bool {
        (**self).is_edge(x, y)
    }
}
