//! Loading helpers built on the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Any format the `image`
//! crate decodes is converted to 8-bit luma with `max_value == 255`.

use crate::image::GrayImage;
use crate::util::{SubLocateError, SubLocateResult};
use std::path::Path;

/// Creates an owned image from an `image` crate grayscale buffer.
pub fn from_luma8(img: &image::GrayImage) -> SubLocateResult<GrayImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    GrayImage::new(img.as_raw().clone(), width, height)
}

/// Converts a dynamic image to an owned grayscale image.
pub fn from_dynamic_image(img: &image::DynamicImage) -> SubLocateResult<GrayImage> {
    from_luma8(&img.to_luma8())
}

/// Loads an image of any supported format and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> SubLocateResult<GrayImage> {
    let img = image::open(path).map_err(|err| SubLocateError::ImageIo {
        reason: err.to_string(),
    })?;
    from_dynamic_image(&img)
}
