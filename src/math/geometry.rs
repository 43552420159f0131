//! Planar geometry and pixel-size arithmetic shared by the grid, renderer and pyramid

use num_traits::ToPrimitive;

// Absorbs floating point noise before rounding sizes up, e.g. cos(90°) != 0
const SIZE_EPSILON: f64 = 1e-6;

/// Squared Euclidean distance between two points
pub fn squared_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.mul_add(dx, dy * dy)
}

/// Coordinate of `index` on an evenly spaced axis of `count` samples over `[0, 1]`
///
/// A single-sample axis sits at 0.
pub fn linspace_coordinate(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Convert a non-negative floating point size to whole pixels, truncating
pub fn to_pixels(value: f64) -> u32 {
    value.max(0.0).floor().to_u32().unwrap_or(u32::MAX)
}

/// Convert a non-negative floating point size to whole pixels, rounding up
///
/// Values within a tiny tolerance of an integer are not rounded up.
pub fn to_pixels_ceil(value: f64) -> u32 {
    (value - SIZE_EPSILON).max(0.0).ceil().to_u32().unwrap_or(u32::MAX)
}

/// Bounding box of a `width × height` rectangle rotated by `degrees`
pub fn rotated_extent(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let w = f64::from(width);
    let h = f64::from(height);
    (
        to_pixels_ceil(w.mul_add(cos, h * sin)),
        to_pixels_ceil(w.mul_add(sin, h * cos)),
    )
}

/// Size of `source` scaled uniformly so it fully covers `target`
///
/// The result is never smaller than `target` on either axis, so a centered
/// crop of exactly `target` is always possible.
pub fn cover_fit_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    if source.0 == 0 || source.1 == 0 {
        return target;
    }
    let ratio = (f64::from(target.0) / f64::from(source.0))
        .max(f64::from(target.1) / f64::from(source.1));
    (
        to_pixels(f64::from(source.0) * ratio).max(target.0),
        to_pixels(f64::from(source.1) * ratio).max(target.1),
    )
}

/// Inner picture rectangle of a cell, shrunk by the frame ratios on each axis
pub fn inner_size(cell: (u32, u32), ratios: (f64, f64)) -> (u32, u32) {
    (
        to_pixels(f64::from(cell.0) / ratios.0),
        to_pixels(f64::from(cell.1) / ratios.1),
    )
}

/// Number of halvings between the finest and the coarsest pyramid level
///
/// The tile count along the longer canvas side is rounded up to a power of
/// two; the depth is that power's exponent. Counts above `2^31` give 32.
pub const fn pyramid_depth(max_dimension: u32, tile_size: u32) -> u32 {
    if tile_size == 0 {
        return 0;
    }
    let tiles = max_dimension.div_ceil(tile_size);
    if tiles <= 1 {
        0
    } else {
        match tiles.checked_next_power_of_two() {
            Some(power) => power.trailing_zeros(),
            None => u32::BITS,
        }
    }
}

/// Top-left corner that centers `inner` within `outer`
pub const fn centered_origin(outer: (u32, u32), inner: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}
