//! Pixel layout of cells on the composite canvas
//!
//! A cell's top-left corner is `cell * resolution + offset`. Offsets may vary
//! per cell (for example the staggered columns of the default layout), and the
//! canvas reserves `padding` pixels on each axis so that shifted cells still fit.

use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::spatial::grid::{CellCoord, GridSpec};
use std::fmt;
use std::sync::Arc;

/// Per-cell offset function of (column, row)
pub type OffsetFn = dyn Fn(usize, usize) -> u32 + Send + Sync;

/// Offset of a cell along one axis
#[derive(Clone)]
pub enum OffsetStrategy {
    /// The same offset for every cell
    Fixed(u32),
    /// An offset computed from the cell's column and row
    Computed(Arc<OffsetFn>),
}

impl OffsetStrategy {
    /// Wrap a function of (column, row) as an offset strategy
    pub fn computed(f: impl Fn(usize, usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Offset of the given cell
    pub fn resolve(&self, cell: CellCoord) -> u32 {
        match self {
            Self::Fixed(value) => *value,
            Self::Computed(f) => f(cell.x, cell.y),
        }
    }
}

impl Default for OffsetStrategy {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl fmt::Debug for OffsetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Offsets and reserved padding used when compositing cells
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Horizontal offset of each cell
    pub offset_x: OffsetStrategy,
    /// Vertical offset of each cell
    pub offset_y: OffsetStrategy,
    /// Extra canvas pixels reserved on the (right, bottom) edges
    pub padding: (u32, u32),
}

impl Layout {
    /// Layout with explicit offsets and padding
    pub const fn new(
        offset_x: OffsetStrategy,
        offset_y: OffsetStrategy,
        padding: (u32, u32),
    ) -> Self {
        Self {
            offset_x,
            offset_y,
            padding,
        }
    }

    /// Every odd column shifted down by `padding` pixels
    pub fn staggered_columns(padding: u32) -> Self {
        Self::new(
            OffsetStrategy::Fixed(0),
            OffsetStrategy::computed(move |x, _| if x % 2 == 1 { padding } else { 0 }),
            (0, padding),
        )
    }

    /// Resolve the offset of a cell and check it against the reserved padding
    ///
    /// # Errors
    ///
    /// Returns `OffsetOutOfBounds` if the offset exceeds the padding on either axis
    pub fn offset_for(&self, cell: CellCoord) -> Result<(u32, u32)> {
        let offset = (self.offset_x.resolve(cell), self.offset_y.resolve(cell));
        if offset.0 > self.padding.0 || offset.1 > self.padding.1 {
            return Err(MosaicError::OffsetOutOfBounds {
                cell: (cell.x, cell.y),
                offset,
                reserved: self.padding,
            });
        }
        Ok(offset)
    }

    /// Top-left pixel of a cell on the canvas
    ///
    /// # Errors
    ///
    /// Returns `OffsetOutOfBounds` for offsets beyond the padding, or an
    /// invalid parameter error if the position overflows `u32`
    pub fn cell_origin(&self, cell: CellCoord, resolution: (u32, u32)) -> Result<(u32, u32)> {
        let (dx, dy) = self.offset_for(cell)?;
        let x = axis_pixels(cell.x, resolution.0)
            .and_then(|base| base.checked_add(dx))
            .ok_or_else(|| {
                invalid_parameter("cell_resolution", &resolution.0, &"canvas too wide")
            })?;
        let y = axis_pixels(cell.y, resolution.1)
            .and_then(|base| base.checked_add(dy))
            .ok_or_else(|| {
                invalid_parameter("cell_resolution", &resolution.1, &"canvas too tall")
            })?;
        Ok((x, y))
    }

    /// Canvas size for a grid of cells at the given resolution plus padding
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the size overflows `u32`
    pub fn canvas_size(&self, grid: GridSpec, resolution: (u32, u32)) -> Result<(u32, u32)> {
        let width = axis_pixels(grid.width(), resolution.0)
            .and_then(|base| base.checked_add(self.padding.0))
            .ok_or_else(|| {
                invalid_parameter("cell_resolution", &resolution.0, &"canvas too wide")
            })?;
        let height = axis_pixels(grid.height(), resolution.1)
            .and_then(|base| base.checked_add(self.padding.1))
            .ok_or_else(|| {
                invalid_parameter("cell_resolution", &resolution.1, &"canvas too tall")
            })?;
        Ok((width, height))
    }
}

fn axis_pixels(cells: usize, resolution: u32) -> Option<u32> {
    u32::try_from(cells).ok()?.checked_mul(resolution)
}
