use crate::calib::{self, CalibrationError, PipelineParams};
use crate::core::{self, EdgeMask};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error(transparent)]
    Pipeline(#[from] CalibrationError),
}

/// Borrow an `image::GrayImage` as a core edge source.
pub fn gray_view(img: &::image::GrayImage) -> core::GrayImageView<'_> {
    core::GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Owned edge mask from an edge image; positive pixels are edges.
pub fn edge_mask_from_gray(img: &::image::GrayImage) -> EdgeMask {
    EdgeMask::from_fn(img.width() as usize, img.height() as usize, |x, y| {
        img.get_pixel(x as u32, y as u32)[0] > 0
    })
}

/// Count objects in an edge image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn count_in_edge_image(
    img: &::image::GrayImage,
    params: &PipelineParams,
) -> Result<usize, DetectError> {
    Ok(calib::count_objects(&gray_view(img), params)?)
}

/// Count objects in a raw row-major edge buffer.
pub fn count_in_gray_buffer(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: &PipelineParams,
) -> Result<usize, DetectError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    let view = core::GrayImageView {
        width: width as usize,
        height: height as usize,
        data: pixels,
    };
    Ok(calib::count_objects(&view, params)?)
}
