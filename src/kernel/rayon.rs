//! Rayon-parallel scan (feature-gated).
//!
//! Rows of candidate origins are scanned in parallel, each yielding its own
//! first minimum. Row results are folded in ascending `y` with a strict
//! comparison, which reproduces the sequential row-major tie-break exactly.

use crate::kernel::scalar::{placement_range, scan_row, window_sse};
use crate::kernel::{Placement, ScanParams};
use crate::util::SubLocateResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for the SSD kernel.
pub(crate) fn ssd_scan_full_par(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
    params: ScanParams,
) -> SubLocateResult<Placement> {
    let (max_x, max_y) = placement_range(reference, probe)?;

    let mut best = Placement {
        x: 0,
        y: 0,
        sse: window_sse(reference, probe, 0, 0, u64::MAX).unwrap_or(u64::MAX),
    };
    let seed_sse = best.sse;

    // Each row is bounded by the seed only, so early exit stays row-local.
    let row_results: Vec<Option<Placement>> = (0..=max_y)
        .into_par_iter()
        .map(|y| scan_row(reference, probe, y, max_x, seed_sse, params))
        .collect();

    for candidate in row_results.into_iter().flatten() {
        best.keep_first_min(candidate);
    }
    Ok(best)
}
