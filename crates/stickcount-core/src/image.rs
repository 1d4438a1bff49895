use crate::mask::{EdgeSource, MaskError};

/// Borrowed row-major 8-bit grayscale buffer, e.g. the output of an
/// external edge detector. Positive intensities count as edges.
///
/// Fields are public for cheap construction from image crates; prefer
/// [`GrayImageView::new`], which checks `data.len() == width * height`.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> GrayImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, MaskError> {
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
}

impl EdgeSource for GrayImageView<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    /// Pixels past the end of a short buffer read as background.
    #[inline]
    fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data
            .get(y * self.width + x)
            .is_some_and(|&v| v > 0)
    }
}
