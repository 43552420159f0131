//! Provenance record mapping every grid cell back to its source item
//!
//! Viewers use it for hit-testing: a click on the map becomes a cell
//! coordinate, and the manifest tells which item (if any) was drawn there.

use crate::io::error::{MosaicError, Result, file_system_error};
use crate::spatial::grid::{CellCoord, GridSpec};
use crate::spatial::projection::Item;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

/// What was rendered on one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCell {
    /// Grid coordinate of the cell
    pub pos: CellCoord,
    /// Identifier of the item drawn here, `None` for a placeholder
    pub item: Option<String>,
    /// Image reference of the item, if it had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the placeholder was drawn because the item's image failed to load
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Zoom range and tiling of the generated pyramid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidInfo {
    /// Coarsest zoom index
    pub min_zoom: u32,
    /// Finest zoom index
    pub max_zoom: u32,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Tile tree prefix
    pub prefix: String,
}

/// Grid dimensions plus per-cell provenance, in row-major cell order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Grid dimensions
    pub dim: GridDimensions,
    /// One entry per cell
    pub grid: Vec<ManifestCell>,
    /// Pyramid description, once tiles were generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pyramid: Option<PyramidInfo>,
}

impl Manifest {
    /// Empty manifest for a grid
    pub fn new(grid: GridSpec) -> Self {
        Self {
            dim: GridDimensions {
                width: grid.width(),
                height: grid.height(),
            },
            grid: Vec::with_capacity(grid.cell_count()),
            pyramid: None,
        }
    }

    /// Record what was drawn on a cell
    pub fn record(&mut self, pos: CellCoord, item: Option<&Item>, degraded: bool) {
        self.grid.push(ManifestCell {
            pos,
            item: item.map(|item| item.id.clone()),
            image: item.and_then(|item| item.image.clone()),
            degraded,
        });
    }

    /// Identifier of the item drawn on a cell, if any
    pub fn item_at(&self, pos: CellCoord) -> Option<&str> {
        self.grid
            .iter()
            .find(|cell| cell.pos == pos)
            .and_then(|cell| cell.item.as_deref())
    }

    /// Number of cells that show an item
    pub fn filled(&self) -> usize {
        self.grid.iter().filter(|cell| cell.item.is_some()).count()
    }

    /// Serialize as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MosaicError::from)
    }

    /// Write the manifest as JSON, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| MosaicError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(file_system_error(parent, "create directory"))?;
        }
        std::fs::write(path, json).map_err(file_system_error(path, "write manifest"))
    }

    /// Read a manifest previously written with [`Self::write_json`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn read_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(file_system_error(path, "read manifest"))?;
        serde_json::from_str(&json).map_err(|e| MosaicError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
