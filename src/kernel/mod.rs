//! Squared-error kernel implementations.
//!
//! Kernels accumulate the sum of squared differences (SSE) of a window in an
//! exact `u64` accumulator. The mean is formed only once a window is complete,
//! so ranking windows by SSE is identical to ranking them by mean squared
//! error for a fixed probe.

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScanParams {
    /// Abandon a window once its partial SSE reaches the best SSE so far.
    pub early_exit: bool,
}

/// Best placement found by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    /// X coordinate (column) of the probe's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the probe's top-left corner.
    pub y: usize,
    /// Sum of squared differences at this placement.
    pub sse: u64,
}

impl Placement {
    /// Replaces `self` with `other` only if `other` is strictly better.
    ///
    /// Folding candidates in row-major order with this rule keeps the first
    /// minimum encountered.
    pub(crate) fn keep_first_min(&mut self, other: Placement) {
        if other.sse < self.sse {
            *self = other;
        }
    }
}

pub(crate) mod scalar;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;
