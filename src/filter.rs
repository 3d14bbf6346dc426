//! Neighborhood smoothing for probe generation.
//!
//! `smooth_3x3` averages each sample with its in-bounds 3x3 neighborhood using
//! integer division by a fixed divisor of 9, so border and corner samples,
//! which have fewer than 9 in-bounds neighbors, come out darker than a true
//! mean would be.

use crate::image::{GrayImage, ImageView};
use crate::util::SubLocateResult;

const BOX_DIVISOR: u32 = 9;

/// Returns a same-size copy of `src` smoothed by a truncating 3x3 box sum / 9.
pub fn smooth_3x3(src: ImageView<'_>, max_value: u8) -> SubLocateResult<GrayImage> {
    let width = src.width();
    let height = src.height();
    let mut data = Vec::with_capacity(width * height);

    for y in 0..height {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(width - 1);
            let mut sum = 0u32;
            for ny in y0..=y1 {
                if let Some(row) = src.row(ny) {
                    sum += row[x0..=x1].iter().map(|&v| v as u32).sum::<u32>();
                }
            }
            // sum <= 9 * 255, so the quotient always fits in u8.
            data.push((sum / BOX_DIVISOR) as u8);
        }
    }

    GrayImage::with_max_value(data, width, height, max_value)
}

/// Smooths an owned image, keeping its max value.
pub fn smooth_image(src: &GrayImage) -> SubLocateResult<GrayImage> {
    smooth_3x3(src.view(), src.max_value())
}
