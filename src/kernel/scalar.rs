//! Scalar reference kernel for squared-error evaluation.

use crate::kernel::{Placement, ScanParams};
use crate::util::{SubLocateError, SubLocateResult};
use crate::ImageView;

/// Accumulates the SSE of the window at `(x, y)`.
///
/// Returns `None` as soon as the partial sum reaches `limit`; such a window can
/// never be strictly better than the placement that produced `limit`.
#[inline]
pub(crate) fn window_sse(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
    x: usize,
    y: usize,
    limit: u64,
) -> Option<u64> {
    let width = probe.width();
    let mut sse = 0u64;
    for ty in 0..probe.height() {
        let ref_row = reference.row(y + ty).expect("row within bounds for scan");
        let probe_row = probe.row(ty).expect("probe row within bounds");
        let row_sse: u64 = ref_row[x..x + width]
            .iter()
            .zip(probe_row)
            .map(|(&r, &p)| {
                let diff = r as i32 - p as i32;
                (diff * diff) as u64
            })
            .sum();
        sse += row_sse;
        if sse >= limit {
            return None;
        }
    }
    Some(sse)
}

/// Verifies that the probe fits in the reference and returns the last valid
/// origin `(max_x, max_y)`.
pub(crate) fn placement_range(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
) -> SubLocateResult<(usize, usize)> {
    let ref_width = reference.width();
    let ref_height = reference.height();
    let probe_width = probe.width();
    let probe_height = probe.height();
    if ref_width < probe_width || ref_height < probe_height {
        return Err(SubLocateError::DimensionMismatch {
            probe_width,
            probe_height,
            ref_width,
            ref_height,
        });
    }
    Ok((ref_width - probe_width, ref_height - probe_height))
}

/// Finds the first placement in row `y` whose SSE is strictly below `bound`.
///
/// Origins `0..=max_x` are visited in ascending order and later windows must
/// beat earlier ones strictly, so the leftmost minimum wins.
pub(crate) fn scan_row(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
    y: usize,
    max_x: usize,
    bound: u64,
    params: ScanParams,
) -> Option<Placement> {
    let mut best = None;
    let mut limit = bound;
    for x in 0..=max_x {
        let cap = if params.early_exit { limit } else { u64::MAX };
        let Some(sse) = window_sse(reference, probe, x, y, cap) else {
            continue;
        };
        if sse < limit {
            best = Some(Placement { x, y, sse });
            limit = sse;
        }
    }
    best
}

/// SSE of the window at `(x, y)`. The footprint must lie inside the reference.
pub(crate) fn sse_at(reference: ImageView<'_>, probe: ImageView<'_>, x: usize, y: usize) -> u64 {
    window_sse(reference, probe, x, y, u64::MAX).unwrap_or(u64::MAX)
}

/// Scans every origin in row-major order, recomputing each window from
/// scratch, and returns the first placement with minimum SSE.
pub(crate) fn scan_full(
    reference: ImageView<'_>,
    probe: ImageView<'_>,
    params: ScanParams,
) -> SubLocateResult<Placement> {
    let (max_x, max_y) = placement_range(reference, probe)?;

    let mut best = Placement {
        x: 0,
        y: 0,
        sse: sse_at(reference, probe, 0, 0),
    };
    for y in 0..=max_y {
        if let Some(candidate) = scan_row(reference, probe, y, max_x, best.sse, params) {
            best.keep_first_min(candidate);
        }
    }
    Ok(best)
}
