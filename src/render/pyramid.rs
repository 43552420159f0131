//! Multi-resolution tile pyramid built from the composite canvas
//!
//! The finest level tiles the canvas at full resolution. Each coarser level
//! halves the previous level's image (never the full canvas) with a Lanczos
//! filter and tiles the result. Tiles are always `tile_size` square; tiles on
//! the right and bottom edges are padded with white, never stretched, and no
//! tile is ever magnified.
//!
//! Levels must be produced in order, but the tiles of one level are
//! independent and are cut and written in parallel.

use crate::io::error::{Result, invalid_parameter};
use crate::io::progress::ProgressSink;
use crate::io::tiles::{TileKey, TileSink};
use crate::math::geometry::pyramid_depth;
use crate::render::cell::WHITE;
use image::RgbImage;
use image::imageops::{self, FilterType};
use rayon::prelude::*;
use tracing::debug;

/// One generated zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidLevel {
    /// Zoom index
    pub zoom: u32,
    /// Tiles per axis
    pub side_tiles: u32,
    /// Size of the image this level was cut from (width, height)
    pub image_size: (u32, u32),
}

/// Summary of a generated pyramid, finest level first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePyramid {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Coarsest zoom index
    pub min_zoom: u32,
    /// Finest zoom index
    pub max_zoom: u32,
    /// Levels from finest to coarsest
    pub levels: Vec<PyramidLevel>,
}

impl TilePyramid {
    /// Total number of tiles across all levels
    pub fn tile_count(&self) -> u64 {
        self.levels
            .iter()
            .map(|level| u64::from(level.side_tiles) * u64::from(level.side_tiles))
            .sum()
    }
}

/// Zoom range of a pyramid before any pixels are touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidPlan {
    /// Number of halvings between finest and coarsest level
    pub depth: u32,
    /// Tiles per axis at the finest level
    pub side_tiles: u32,
    /// Coarsest zoom index
    pub min_zoom: u32,
    /// Finest zoom index
    pub max_zoom: u32,
}

impl PyramidPlan {
    /// Tiles per axis at a zoom index, 0 outside `min_zoom..=max_zoom`
    pub const fn side_tiles_at(&self, zoom: u32) -> u32 {
        if zoom < self.min_zoom || zoom > self.max_zoom {
            return 0;
        }
        1 << (zoom - self.min_zoom)
    }
}

/// Slices a canvas into a power-of-two tile pyramid
#[derive(Debug, Clone, Copy)]
pub struct TilePyramidBuilder {
    tile_size: u32,
    top_zoom: u32,
}

impl TilePyramidBuilder {
    /// Builder for square tiles of `tile_size` with the finest level at `top_zoom`
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if `tile_size` is zero
    pub fn new(tile_size: u32, top_zoom: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter("tile_size", &tile_size, &"must be positive"));
        }
        Ok(Self {
            tile_size,
            top_zoom,
        })
    }

    /// Zoom range needed for a canvas of the given size
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the pyramid would need more
    /// levels than `top_zoom` leaves room for
    pub fn plan(&self, canvas_size: (u32, u32)) -> Result<PyramidPlan> {
        let depth = pyramid_depth(canvas_size.0.max(canvas_size.1), self.tile_size);
        let min_zoom = self.top_zoom.checked_sub(depth).ok_or_else(|| {
            invalid_parameter(
                "top_zoom",
                &self.top_zoom,
                &format!("canvas needs {depth} zoom levels below the top"),
            )
        })?;
        // Tile indices of one level must fit a u32
        if depth >= u32::BITS / 2 {
            return Err(invalid_parameter("tile_size", &self.tile_size, &"canvas too large"));
        }
        Ok(PyramidPlan {
            depth,
            side_tiles: 1 << depth,
            min_zoom,
            max_zoom: self.top_zoom,
        })
    }

    /// Generate every level and hand each tile to `sink`
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails or the sink rejects a tile; tiles
    /// written before the failure are left in place
    pub fn build(
        &self,
        canvas: &RgbImage,
        sink: &dyn TileSink,
        progress: &dyn ProgressSink,
    ) -> Result<TilePyramid> {
        let plan = self.plan(canvas.dimensions())?;
        progress.begin("tiles", (0..=plan.depth).map(|k| 4_u64.pow(k)).sum());

        let mut levels = Vec::with_capacity(plan.depth as usize + 1);
        let mut halved: Option<RgbImage> = None;
        for zoom in (plan.min_zoom..=plan.max_zoom).rev() {
            if zoom < plan.max_zoom {
                let source = halved.as_ref().unwrap_or(canvas);
                halved = Some(halve(source));
            }
            let working = halved.as_ref().unwrap_or(canvas);
            let side_tiles = plan.side_tiles_at(zoom);
            debug!(
                zoom,
                side_tiles,
                width = working.width(),
                height = working.height(),
                "Cutting pyramid level"
            );

            (0..side_tiles * side_tiles)
                .into_par_iter()
                .try_for_each(|index| -> Result<()> {
                    let (x, y) = (index / side_tiles, index % side_tiles);
                    let tile = extract_tile(working, x, y, self.tile_size);
                    sink.write_tile(TileKey::new(zoom, x, y), &tile)?;
                    progress.advance("tiles", 1);
                    Ok(())
                })?;

            levels.push(PyramidLevel {
                zoom,
                side_tiles,
                image_size: working.dimensions(),
            });
        }
        progress.finish("tiles");

        Ok(TilePyramid {
            tile_size: self.tile_size,
            min_zoom: plan.min_zoom,
            max_zoom: plan.max_zoom,
            levels,
        })
    }
}

/// Downsample an image to half its size on both axes (at least one pixel)
pub fn halve(image: &RgbImage) -> RgbImage {
    let width = (image.width() / 2).max(1);
    let height = (image.height() / 2).max(1);
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Cut tile `(x, y)` out of `image`, padding whatever lies outside with white
pub fn extract_tile(image: &RgbImage, x: u32, y: u32, tile_size: u32) -> RgbImage {
    let mut tile = RgbImage::from_pixel(tile_size, tile_size, WHITE);
    let left = x.saturating_mul(tile_size).min(image.width());
    let top = y.saturating_mul(tile_size).min(image.height());
    let right = left.saturating_add(tile_size).min(image.width());
    let bottom = top.saturating_add(tile_size).min(image.height());
    if right > left && bottom > top {
        let region = imageops::crop_imm(image, left, top, right - left, bottom - top).to_image();
        imageops::replace(&mut tile, &region, 0, 0);
    }
    tile
}
