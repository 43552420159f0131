//! Pipeline constants and the runtime configuration passed to a build

use crate::io::error::{Result, invalid_parameter};
use crate::io::image::PngCompression;
use crate::math::geometry::{inner_size, rotated_extent, to_pixels};
use crate::spatial::grid::GridSpec;
use crate::spatial::layout::Layout;

// Source material and cell framing
/// Typical (width, height) of a source photo in pixels
pub const SOURCE_IMAGE_SIZE: (u32, u32) = (530, 1000);
/// Cell size relative to its inner picture on each axis (frame margin)
pub const CELL_RATIOS: (f64, f64) = (1.86, 1.135);
/// Target aspect ratio (width / height) of the whole mosaic
pub const OUTPUT_ASPECT: f64 = 16.0 / 9.0;
/// Longer side of a cell in pixels
pub const CELL_SIDE: u32 = 1000;
/// Default number of grid columns
pub const DEFAULT_GRID_COLUMNS: usize = 14;

// Layout
/// Stagger of odd columns as a fraction of the cell side
pub const STAGGER_FRACTION: f64 = 0.285;
/// Share of cells a caller should fill with items, leaving room to breathe
pub const FILL_FRACTION: f64 = 0.75;

// Cell decoration
/// Largest decorative rotation in either direction, in degrees
pub const MAX_ROTATION_DEGREES: u32 = 32;
/// Fixed seed for reproducible rotations
pub const DEFAULT_SEED: u64 = 42;

// Assignment
/// Largest entry of the conditioned cost matrix
pub const COST_SCALE: f64 = 100_000.0;

// Tile pyramid
/// Edge length of a pyramid tile in pixels
pub const TILE_SIZE: u32 = 256;
/// Zoom index of the most detailed pyramid level
pub const TOP_ZOOM: u32 = 8;
/// Directory under the output root that holds the tile tree
pub const TILE_DIRECTORY: &str = "tiles";
/// Default tile prefix below [`TILE_DIRECTORY`]
pub const DEFAULT_TILE_PREFIX: &str = "mosaic";

// Output files
/// Well-known placeholder asset rendered in empty cells
pub const PLACEHOLDER_ASSET: &str = "empty-space.png";
/// File name of the exported composite canvas
pub const CANVAS_FILE: &str = "canvas.png";
/// File name of the exported manifest
pub const MANIFEST_FILE: &str = "manifest.json";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Cell resolution for source pictures of `source_size` framed by `cell_ratios`
///
/// The framed footprint keeps its aspect and is scaled so its longer side is
/// `side` pixels.
pub fn cell_resolution_for(
    source_size: (u32, u32),
    cell_ratios: (f64, f64),
    side: u32,
) -> (u32, u32) {
    let width = f64::from(source_size.0) * cell_ratios.0;
    let height = f64::from(source_size.1) * cell_ratios.1;
    let longest = width.max(height);
    if longest <= 0.0 {
        return (side, side);
    }
    let side = f64::from(side);
    (to_pixels(side * width / longest), to_pixels(side * height / longest))
}

/// Stagger offset for cells with the given longer side
pub fn stagger_padding(side: u32) -> u32 {
    to_pixels(STAGGER_FRACTION * f64::from(side))
}

/// Everything a single mosaic build needs, passed explicitly to the pipeline
///
/// Several builds with different configurations may run side by side; nothing
/// here is global.
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Grid of cells the items are placed on
    pub grid: GridSpec,
    /// Size of one cell in pixels (width, height)
    pub cell_resolution: (u32, u32),
    /// Cell size relative to its inner picture on each axis
    pub cell_ratios: (f64, f64),
    /// Largest decorative rotation in either direction, in degrees
    pub max_rotation_degrees: u32,
    /// Seed for the decorative rotations
    pub seed: u64,
    /// Per-cell offsets and canvas padding
    pub layout: Layout,
    /// Edge length of pyramid tiles in pixels
    pub tile_size: u32,
    /// Zoom index of the most detailed pyramid level
    pub top_zoom: u32,
    /// Tile tree prefix below the tile directory
    pub tile_prefix: String,
    /// Compression of the exported canvas
    pub canvas_compression: PngCompression,
    /// Compression of each tile
    pub tile_compression: PngCompression,
    /// Drop items that do not fit on the grid instead of failing
    pub truncate_surplus: bool,
    /// Share of cells a caller should fill with items
    pub fill_fraction: f64,
}

impl MosaicConfig {
    /// Default configuration for a grid, with staggered columns
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            cell_resolution: cell_resolution_for(SOURCE_IMAGE_SIZE, CELL_RATIOS, CELL_SIDE),
            cell_ratios: CELL_RATIOS,
            max_rotation_degrees: MAX_ROTATION_DEGREES,
            seed: DEFAULT_SEED,
            layout: Layout::staggered_columns(stagger_padding(CELL_SIDE)),
            tile_size: TILE_SIZE,
            top_zoom: TOP_ZOOM,
            tile_prefix: DEFAULT_TILE_PREFIX.to_string(),
            canvas_compression: PngCompression::Best,
            tile_compression: PngCompression::Fast,
            truncate_surplus: true,
            fill_fraction: FILL_FRACTION,
        }
    }

    /// Size of the picture inside each cell frame
    pub fn inner_resolution(&self) -> (u32, u32) {
        inner_size(self.cell_resolution, self.cell_ratios)
    }

    /// Number of items a caller should project for this grid
    pub fn item_capacity(&self) -> usize {
        let cells = self.grid.cell_count();
        ((cells as f64 * self.fill_fraction).floor() as usize).min(cells)
    }

    /// Check that the configuration can produce a valid build
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field, including
    /// the case where the largest rotation of the inner picture would not fit
    /// inside a cell
    pub fn validate(&self) -> Result<()> {
        if self.cell_resolution.0 == 0 || self.cell_resolution.1 == 0 {
            return Err(invalid_parameter(
                "cell_resolution",
                &format!("{}x{}", self.cell_resolution.0, self.cell_resolution.1),
                &"must be positive",
            ));
        }
        if !(self.cell_ratios.0 >= 1.0 && self.cell_ratios.1 >= 1.0) {
            return Err(invalid_parameter(
                "cell_ratios",
                &format!("{}x{}", self.cell_ratios.0, self.cell_ratios.1),
                &"a cell cannot be smaller than its picture",
            ));
        }
        let inner = self.inner_resolution();
        if inner.0 == 0 || inner.1 == 0 {
            return Err(invalid_parameter(
                "cell_ratios",
                &format!("{}x{}", inner.0, inner.1),
                &"inner picture collapses to zero pixels",
            ));
        }
        if self.max_rotation_degrees > 90 {
            return Err(invalid_parameter(
                "max_rotation_degrees",
                &self.max_rotation_degrees,
                &"must be at most 90",
            ));
        }
        // The rotated height peaks below the maximum angle for tall pictures
        for degrees in 0..=self.max_rotation_degrees {
            let rotated = rotated_extent(inner.0, inner.1, f64::from(degrees));
            if rotated.0 > self.cell_resolution.0 || rotated.1 > self.cell_resolution.1 {
                return Err(invalid_parameter(
                    "cell_ratios",
                    &format!("{}x{}", rotated.0, rotated.1),
                    &format!(
                        "picture rotated by {degrees} degrees exceeds the {}x{} cell",
                        self.cell_resolution.0, self.cell_resolution.1
                    ),
                ));
            }
        }
        if self.tile_size == 0 {
            return Err(invalid_parameter("tile_size", &self.tile_size, &"must be positive"));
        }
        if !(0.0..=1.0).contains(&self.fill_fraction) {
            return Err(invalid_parameter(
                "fill_fraction",
                &self.fill_fraction,
                &"must lie in [0, 1]",
            ));
        }
        if self.tile_prefix.split('/').any(|part| part == "..")
            || self.tile_prefix.starts_with('/')
        {
            return Err(invalid_parameter(
                "tile_prefix",
                &self.tile_prefix,
                &"must stay inside the tile directory",
            ));
        }
        Ok(())
    }
}
