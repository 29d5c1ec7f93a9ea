//! Grid snapping
//!
//! Every stored position and size is a multiple of [`GRID_SIZE`]. Rounding is
//! half-up (`2.5 -> 3`, `-2.5 -> -2`) so that pointer deltas in either
//! direction land on the same grid lines.

/// Grid unit in pixels
pub const GRID_SIZE: i32 = 10;

/// Largest coordinate or size a snapped value may take, in either direction.
///
/// Twice this still fits in an `i32`, so `x + width` never overflows.
pub const MAX_COORDINATE: i32 = 1_000_000_000;

/// Round half-up to the nearest integer
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Snap a coordinate or size to the nearest grid line.
///
/// Results are clamped to `±MAX_COORDINATE`; NaN snaps to zero.
pub fn snap(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let limit = f64::from(MAX_COORDINATE);
    let snapped = round_half_up(value / f64::from(GRID_SIZE)) * f64::from(GRID_SIZE);
    snapped.clamp(-limit, limit) as i32
}

/// Snap a size and clamp it to at least one grid unit
pub fn snap_size(value: f64) -> i32 {
    snap(value).max(GRID_SIZE)
}

/// Check whether a value sits on a grid line
pub fn is_grid_aligned(value: i32) -> bool {
    value % GRID_SIZE == 0
}
