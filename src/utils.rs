//! Index and offset arithmetic shared by the carousel units
//!
//! Every function here is pure. Callers own the state, these helpers only
//! answer "which slot" and "which pixel offset" questions.

/// Index that follows `index`, wrapping to the start of the dataset.
///
/// Returns `None` for an empty dataset.
pub fn wrap_next(index: usize, count: usize) -> Option<usize> {
    wrap_step(index, 1, count)
}

/// Step `delta` slots from `index` with wraparound in both directions
pub fn wrap_step(index: usize, delta: i64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    // Reduce first so no intermediate sum can overflow
    let step = delta.rem_euclid(count as i64) as usize;
    Some((index % count + step) % count)
}

/// Convert a settled horizontal offset into a slot index.
///
/// The result is rounded to the nearest page and clamped to
/// `[0, count - 1]`. Returns `None` when the dataset is empty or the
/// inputs cannot describe a position (non-finite offset, non-positive width).
pub fn index_for_offset(offset: f64, viewport_width: f64, count: usize) -> Option<usize> {
    if count == 0 || !offset.is_finite() || !is_valid_width(viewport_width) {
        return None;
    }
    let raw = (offset / viewport_width).round();
    let last = (count - 1) as f64;
    Some(raw.clamp(0.0, last) as usize)
}

/// Pixel offset of the left edge of slot `index`
pub fn offset_for_index(index: usize, viewport_width: f64) -> Option<f64> {
    is_valid_width(viewport_width).then(|| index as f64 * viewport_width)
}

pub fn is_valid_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}
