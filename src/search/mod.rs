//! Exhaustive mean-squared-error search for a probe inside a reference image.
//!
//! [`locate`] evaluates every origin in row-major order (`y` outer, `x` inner)
//! and keeps the first minimum encountered, so among equally good origins the
//! one with the smallest `y`, then the smallest `x`, wins. [`Locator`] exposes
//! the same search with optional row parallelism and early window rejection;
//! both produce results identical to the sequential exhaustive scan.

use crate::image::check_footprint;
use crate::kernel::scalar::{scan_full, sse_at};
use crate::kernel::{Placement, ScanParams};
use crate::trace::{trace_event, trace_span};
use crate::util::{SubLocateError, SubLocateResult};
use crate::ImageView;

/// Origin of a probe's top-left corner within the reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Column of the top-left corner.
    pub x: usize,
    /// Row of the top-left corner.
    pub y: usize,
}

/// Winning origin together with its mean squared error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Winning origin.
    pub offset: Offset,
    /// Mean squared error at `offset`.
    pub mse: f64,
}

/// Search configuration.
#[derive(Clone, Debug, Default)]
pub struct LocateConfig {
    /// Scan rows of origins in parallel. Requires the `rayon` feature;
    /// without it the scan runs sequentially.
    pub parallel: bool,
    /// Stop accumulating a window once it cannot beat the best origin so far.
    pub early_exit: bool,
}

/// Computes the mean squared error of `probe` placed at `(x, y)` in `reference`.
///
/// Fails with [`SubLocateError::RoiOutOfBounds`] if the probe footprint leaves
/// the reference.
pub fn score(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
    x: usize,
    y: usize,
) -> SubLocateResult<f64> {
    let count = footprint_area(probe)?;
    check_footprint(
        reference.width(),
        reference.height(),
        x,
        y,
        probe.width(),
        probe.height(),
    )?;
    let sse = sse_at(reference, probe, x, y);
    Ok(mean(sse, count))
}

/// Finds the origin minimizing the mean squared error using the default
/// sequential exhaustive scan.
///
/// Fails with [`SubLocateError::DimensionMismatch`] if the probe is larger than
/// the reference in either dimension.
pub fn locate(reference: ImageView<'_>, probe: ImageView<'_>) -> SubLocateResult<Offset> {
    Locator::default().locate(reference, probe)
}

/// Configurable exhaustive locator.
#[derive(Clone, Debug, Default)]
pub struct Locator {
    cfg: LocateConfig,
}

impl Locator {
    /// Creates a locator with the given configuration.
    pub fn new(cfg: LocateConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &LocateConfig {
        &self.cfg
    }

    /// Returns the best origin for `probe`.
    pub fn locate(
        &self,
        reference: ImageView<'_>,
        probe: ImageView<'_>,
    ) -> SubLocateResult<Offset> {
        self.locate_match(reference, probe).map(|m| m.offset)
    }

    /// Returns the best origin for `probe` together with its error.
    pub fn locate_match(
        &self,
        reference: ImageView<'_>,
        probe: ImageView<'_>,
    ) -> SubLocateResult<Match> {
        let count = footprint_area(probe)?;
        let _span = trace_span!(
            "locate",
            ref_width = reference.width(),
            ref_height = reference.height(),
            probe_width = probe.width(),
            probe_height = probe.height()
        )
        .entered();

        let params = ScanParams {
            early_exit: self.cfg.early_exit,
        };
        let best = self.scan(reference, probe, params)?;
        let mse = mean(best.sse, count);
        trace_event!("locate_done", x = best.x, y = best.y, mse = mse);

        Ok(Match {
            offset: Offset {
                x: best.x,
                y: best.y,
            },
            mse,
        })
    }

    #[cfg(feature = "rayon")]
    fn scan(
        &self,
        reference: ImageView<'_>,
        probe: ImageView<'_>,
        params: ScanParams,
    ) -> SubLocateResult<Placement> {
        if self.cfg.parallel {
            crate::kernel::rayon::ssd_scan_full_par(reference, probe, params)
        } else {
            scan_full(reference, probe, params)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn scan(
        &self,
        reference: ImageView<'_>,
        probe: ImageView<'_>,
        params: ScanParams,
    ) -> SubLocateResult<Placement> {
        if self.cfg.parallel {
            trace_event!("parallel_unavailable");
        }
        scan_full(reference, probe, params)
    }
}

fn footprint_area(probe: ImageView<'_>) -> SubLocateResult<usize> {
    let width = probe.width();
    let height = probe.height();
    match width.checked_mul(height) {
        Some(count) if count > 0 => Ok(count),
        _ => Err(SubLocateError::InvalidDimensions { width, height }),
    }
}

fn mean(sse: u64, count: usize) -> f64 {
    sse as f64 / count as f64
}
