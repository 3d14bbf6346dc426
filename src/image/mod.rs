//! Grayscale sample storage.
//!
//! [`GrayImage`] owns the samples of a decoded image, row after row, together
//! with the maximum value its header declared. [`ImageView`] borrows 8-bit
//! samples whose rows may carry trailing padding: `stride` is the distance
//! between the first samples of adjacent rows. Cropping with
//! [`ImageView::roi`] reuses the parent's buffer and stride, so probe windows
//! and references share storage.
//!
//! `get` and `row` return `None` outside the image instead of panicking.

use crate::util::{SubLocateError, SubLocateResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod pgm;

/// Maximum sample value assumed when none is given.
pub const DEFAULT_MAX_VALUE: u8 = 255;

/// Read-only window over 8-bit samples laid out row by row.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    samples: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Views a tightly packed buffer of `width * height` samples.
    pub fn from_slice(samples: &'a [u8], width: usize, height: usize) -> SubLocateResult<Self> {
        Self::new(samples, width, height, width)
    }

    /// Views `height` rows of `width` samples whose starts lie `stride` apart.
    ///
    /// Only `width` samples are needed after the start of the last row, so a
    /// buffer may end without the final row's padding.
    pub fn new(
        samples: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> SubLocateResult<Self> {
        let needed = span_len(width, height, stride)?;
        if samples.len() < needed {
            return Err(SubLocateError::BufferTooSmall {
                needed,
                got: samples.len(),
            });
        }
        Ok(Self {
            samples,
            width,
            height,
            stride,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in samples between the starts of adjacent rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Underlying buffer, padding included.
    pub fn as_slice(&self) -> &'a [u8] {
        self.samples
    }

    /// Sample at column `x` of row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width {
            return None;
        }
        self.row(y).map(|row| row[x])
    }

    /// The `width` samples of row `y`, without padding.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        self.samples.get(start..start.checked_add(self.width)?)
    }

    /// Borrows the `width`x`height` window whose top-left sample is `(x, y)`.
    ///
    /// Fails with [`SubLocateError::RoiOutOfBounds`] if the window leaves the
    /// view.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> SubLocateResult<ImageView<'a>> {
        if width == 0 || height == 0 {
            return Err(SubLocateError::InvalidDimensions { width, height });
        }
        check_footprint(self.width, self.height, x, y, width, height)?;

        // The footprint check keeps the window inside the span validated by
        // `new`, so this offset and every row below it are in the buffer.
        let offset = y * self.stride + x;
        Ok(ImageView {
            samples: &self.samples[offset..],
            width,
            height,
            stride: self.stride,
        })
    }
}

/// Verifies that a `width`x`height` footprint at `(x, y)` lies inside an
/// `img_width`x`img_height` image.
pub(crate) fn check_footprint(
    img_width: usize,
    img_height: usize,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> SubLocateResult<()> {
    let out_of_bounds = SubLocateError::RoiOutOfBounds {
        x,
        y,
        width,
        height,
        img_width,
        img_height,
    };
    let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
    let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
    if end_x > img_width || end_y > img_height {
        return Err(out_of_bounds);
    }
    Ok(())
}

/// Samples spanned by `height` rows of `width` starting `stride` apart.
fn span_len(width: usize, height: usize, stride: usize) -> SubLocateResult<usize> {
    if width == 0 || height == 0 {
        return Err(SubLocateError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(SubLocateError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|rows| rows.checked_add(width))
        .ok_or(SubLocateError::InvalidDimensions { width, height })
}

/// Owned contiguous grayscale image with a declared maximum sample value.
#[derive(Clone, Debug)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    max_value: u8,
}

impl GrayImage {
    /// Creates an image from a row-major buffer with `max_value == 255`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> SubLocateResult<Self> {
        Self::with_max_value(data, width, height, DEFAULT_MAX_VALUE)
    }

    /// Creates an image from a row-major buffer with an explicit max value.
    ///
    /// The buffer length must equal `width * height` and no sample may exceed
    /// `max_value`.
    pub fn with_max_value(
        data: Vec<u8>,
        width: usize,
        height: usize,
        max_value: u8,
    ) -> SubLocateResult<Self> {
        if width == 0 || height == 0 {
            return Err(SubLocateError::InvalidDimensions { width, height });
        }
        if max_value == 0 {
            return Err(SubLocateError::InvalidInput("max value must be positive"));
        }
        let needed = width
            .checked_mul(height)
            .ok_or(SubLocateError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(SubLocateError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(SubLocateError::InvalidDimensions { width, height });
        }
        if let Some(&value) = data.iter().find(|&&v| v > max_value) {
            return Err(SubLocateError::SampleOutOfRange { value, max_value });
        }
        Ok(Self {
            data,
            width,
            height,
            max_value,
        })
    }

    /// Creates an image filled with a constant value.
    pub fn filled(width: usize, height: usize, value: u8) -> SubLocateResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(SubLocateError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Copies a (possibly strided) view into a new contiguous image.
    pub fn from_view(view: ImageView<'_>, max_value: u8) -> SubLocateResult<Self> {
        let width = view.width();
        let height = view.height();
        let needed = width
            .checked_mul(height)
            .ok_or(SubLocateError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(needed);
        for y in 0..height {
            let row = view.row(y).ok_or(SubLocateError::BufferTooSmall {
                needed: (y * view.stride()).saturating_add(width),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::with_max_value(data, width, height, max_value)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the maximum sample value.
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Returns the row-major sample buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the sample at column `x`, row `y` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.view().get(x, y)
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            samples: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
