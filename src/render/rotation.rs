//! Decorative cell rotation: seeded angle draws and rotate-with-expand

use crate::math::geometry::rotated_extent;
use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded source of per-cell rotation angles
///
/// Angles are whole degrees drawn uniformly from `[-max, +max]`. Drawing all
/// angles up front, in cell order, keeps a build reproducible even when cells
/// are rendered out of order.
pub struct RotationSource {
    rng: StdRng,
    max_degrees: i32,
}

impl RotationSource {
    /// Create a deterministic rotation source
    pub fn new(seed: u64, max_degrees: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_degrees: i32::try_from(max_degrees).unwrap_or(i32::MAX),
        }
    }

    /// Draw the next angle in degrees
    pub fn next_degrees(&mut self) -> i32 {
        if self.max_degrees == 0 {
            return 0;
        }
        self.rng.random_range(-self.max_degrees..=self.max_degrees)
    }

    /// Draw `count` angles in order
    pub fn draw(&mut self, count: usize) -> Vec<i32> {
        (0..count).map(|_| self.next_degrees()).collect()
    }
}

/// Rotate an image counter-clockwise by `degrees`, growing the canvas to fit
///
/// Pixels are sampled by nearest neighbour; corners exposed by the rotation
/// are filled with `fill`.
pub fn rotate_expand(image: &RgbImage, degrees: i32, fill: Rgb<u8>) -> RgbImage {
    if degrees.rem_euclid(360) == 0 {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let (out_width, out_height) = rotated_extent(width, height, f64::from(degrees));
    let radians = f64::from(degrees).to_radians();
    let (sin, cos) = radians.sin_cos();

    let src_center = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let dst_center = (f64::from(out_width) / 2.0, f64::from(out_height) / 2.0);

    RgbImage::from_fn(out_width, out_height, |x, y| {
        // Inverse mapping from the output pixel center back into the source
        let u = f64::from(x) + 0.5 - dst_center.0;
        let v = f64::from(y) + 0.5 - dst_center.1;
        let sx = u.mul_add(cos, -(v * sin)) + src_center.0;
        let sy = u.mul_add(sin, v * cos) + src_center.1;
        if sx < 0.0 || sy < 0.0 {
            return fill;
        }
        // Truncation is the floor here since both coordinates are non-negative
        let (px, py) = (sx as u32, sy as u32);
        image.get_pixel_checked(px, py).copied().unwrap_or(fill)
    })
}
