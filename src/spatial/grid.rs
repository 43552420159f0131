//! Target lattice and the item-to-cell assignment placed on it
//!
//! Cells are addressed either by `CellCoord` (column, row) or by their
//! row-major index `row * width + col`. Lattice coordinates live in the same
//! unit square as the projected points, so squared distances between the two
//! are meaningful.

use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::math::geometry::{linspace_coordinate, squared_distance};
use crate::spatial::projection::ProjectedPoint;
use bitvec::bitvec;
use serde::{Deserialize, Serialize};

/// Column and row of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column index, growing to the right
    pub x: usize,
    /// Row index, growing downwards
    pub y: usize,
}

impl CellCoord {
    /// Create a cell coordinate
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the target lattice in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    width: usize,
    height: usize,
}

impl GridSpec {
    /// Create a `width × height` grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridSpec` if either dimension is zero
    pub const fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::InvalidGridSpec { width, height });
        }
        Ok(Self { width, height })
    }

    /// Grid with `columns` columns and as many rows as an output of the given
    /// aspect ratio needs
    ///
    /// Each cell has the footprint of a `source_size` picture widened by its
    /// frame `cell_ratios`; rows are rounded up so the whole aspect is covered.
    ///
    /// # Errors
    ///
    /// Returns an error if `columns` is zero or any sizing input is not positive
    pub fn fitting_aspect(
        columns: usize,
        source_size: (u32, u32),
        cell_ratios: (f64, f64),
        aspect: f64,
    ) -> Result<Self> {
        let cell_width = f64::from(source_size.0) * cell_ratios.0;
        let cell_height = f64::from(source_size.1) * cell_ratios.1;
        if cell_width <= 0.0 || cell_height <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
            return Err(invalid_parameter(
                "aspect",
                &aspect,
                &"source size, cell ratios and aspect must be positive",
            ));
        }

        let rows = (columns as f64 * cell_width * aspect / cell_height).ceil();
        Self::new(columns, rows as usize)
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major index of a cell, if it lies on the grid
    pub const fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if cell.x < self.width && cell.y < self.height {
            Some(cell.y * self.width + cell.x)
        } else {
            None
        }
    }

    /// Cell at a row-major index, if the index is on the grid
    pub const fn coord_of(&self, index: usize) -> Option<CellCoord> {
        if index < self.cell_count() {
            Some(CellCoord::new(index % self.width, index / self.width))
        } else {
            None
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| CellCoord::new(x, y)))
    }

    /// Unit-square coordinate of a cell's lattice site
    pub fn lattice_point(&self, cell: CellCoord) -> [f64; 2] {
        [
            linspace_coordinate(cell.x, self.width),
            linspace_coordinate(cell.y, self.height),
        ]
    }

    /// Lattice sites of all cells in row-major order
    pub fn lattice(&self) -> Vec<[f64; 2]> {
        self.cells().map(|cell| self.lattice_point(cell)).collect()
    }
}

/// One-to-one placement of items onto grid cells
///
/// Every cell holds at most one item and every placed item occupies exactly
/// one cell. Cells without an item render the placeholder; items without a
/// cell were dropped because the grid was too small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    grid: GridSpec,
    cells: Vec<Option<usize>>,
    item_cells: Vec<Option<usize>>,
}

impl Assignment {
    /// Build an assignment from a per-cell item table in row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if the table length differs from the cell count, an
    /// item index is out of range, or an item is placed twice
    pub fn from_cells(
        grid: GridSpec,
        cells: Vec<Option<usize>>,
        item_count: usize,
    ) -> Result<Self> {
        if cells.len() != grid.cell_count() {
            return Err(invalid_parameter(
                "cells",
                &cells.len(),
                &format!("expected one entry per cell ({})", grid.cell_count()),
            ));
        }

        let mut seen = bitvec![0; item_count];
        let mut item_cells = vec![None; item_count];
        for (cell_index, item) in cells.iter().enumerate() {
            let Some(item) = *item else { continue };
            let Some(mut flag) = seen.get_mut(item) else {
                return Err(invalid_parameter(
                    "cells",
                    &item,
                    &format!("item index out of range (items: {item_count})"),
                ));
            };
            if *flag {
                return Err(invalid_parameter(
                    "cells",
                    &item,
                    &"item assigned to more than one cell",
                ));
            }
            *flag = true;
            if let Some(slot) = item_cells.get_mut(item) {
                *slot = Some(cell_index);
            }
        }

        Ok(Self {
            grid,
            cells,
            item_cells,
        })
    }

    /// Grid the assignment is laid out on
    pub const fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Per-cell item table in row-major order
    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    /// Number of items the assignment was solved for
    pub fn item_count(&self) -> usize {
        self.item_cells.len()
    }

    /// Item placed on a cell
    pub fn item_at(&self, cell: CellCoord) -> Option<usize> {
        self.grid
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Cell an item was placed on, `None` if it was dropped
    pub fn cell_of(&self, item: usize) -> Option<CellCoord> {
        self.item_cells
            .get(item)
            .copied()
            .flatten()
            .and_then(|index| self.grid.coord_of(index))
    }

    /// Number of cells holding an item
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Cells without an item, in row-major order
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_none())
            .filter_map(|(index, _)| self.grid.coord_of(index))
            .collect()
    }

    /// Sum of squared displacements between placed points and their lattice sites
    pub fn total_cost(&self, points: &[ProjectedPoint]) -> f64 {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let cell = self.grid.coord_of(index)?;
                let point = points.get((*item)?)?;
                Some(squared_distance(self.grid.lattice_point(cell), point.to_array()))
            })
            .sum()
    }
}
