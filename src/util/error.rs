//! Error types for sublocate.

use thiserror::Error;

/// Result alias for sublocate operations.
pub type SubLocateResult<T> = std::result::Result<T, SubLocateError>;

/// Errors that can occur while decoding, generating or locating images.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubLocateError {
    /// Image width or height is zero, or the product overflows.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough samples.
    #[error("buffer too small: needed {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A sample exceeds the declared maximum value.
    #[error("sample value {value} exceeds max value {max_value}")]
    SampleOutOfRange { value: u8, max_value: u8 },
    /// A footprint extends outside the image bounds.
    #[error(
        "footprint {width}x{height} at ({x}, {y}) exceeds image bounds {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The probe is larger than the reference in at least one dimension.
    #[error(
        "probe {probe_width}x{probe_height} does not fit in reference {ref_width}x{ref_height}"
    )]
    DimensionMismatch {
        probe_width: usize,
        probe_height: usize,
        ref_width: usize,
        ref_height: usize,
    },
    /// Malformed or unsupported image file.
    #[error("invalid image format: {reason}")]
    Format { reason: String },
    /// Filesystem access failed.
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },
    /// Image decoding through the `image` crate failed.
    #[error("image I/O error: {reason}")]
    ImageIo { reason: String },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl SubLocateError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
