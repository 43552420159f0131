//! Tile output: the `(zoom, x, y)` key space and where tiles end up
//!
//! On disk the pyramid is `{root}/tiles/{prefix}/{zoom}/{x}/{y}.png`, a layout
//! any static file server can host for a pan/zoom viewer.

use crate::io::configuration::TILE_DIRECTORY;
use crate::io::error::Result;
use crate::io::image::{PngCompression, save_png};
use image::RgbImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Address of a tile in the pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Zoom index, larger is more detailed
    pub zoom: u32,
    /// Column of the tile within its level
    pub x: u32,
    /// Row of the tile within its level
    pub y: u32,
}

impl TileKey {
    /// Create a tile key
    pub const fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

/// Destination for finished tiles
///
/// Tiles of one level are written concurrently, so sinks take `&self`.
pub trait TileSink: Sync {
    /// Store one tile, replacing any tile previously stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the tile cannot be stored
    fn write_tile(&self, key: TileKey, tile: &RgbImage) -> Result<()>;
}

/// Writes tiles as PNG files in the standard directory layout
#[derive(Debug, Clone)]
pub struct FileTileWriter {
    root: PathBuf,
    compression: PngCompression,
}

impl FileTileWriter {
    /// Writer for `{output_dir}/tiles/{prefix}`
    pub fn new(output_dir: &Path, prefix: &str, compression: PngCompression) -> Self {
        Self {
            root: output_dir.join(TILE_DIRECTORY).join(prefix),
            compression,
        }
    }

    /// Directory that holds the zoom level folders
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of a tile
    pub fn tile_path(&self, key: TileKey) -> PathBuf {
        self.root
            .join(key.zoom.to_string())
            .join(key.x.to_string())
            .join(format!("{}.png", key.y))
    }
}

impl TileSink for FileTileWriter {
    fn write_tile(&self, key: TileKey, tile: &RgbImage) -> Result<()> {
        save_png(tile, &self.tile_path(key), self.compression)
    }
}

/// Keeps tiles in memory, for consumers that post-process or upload them
#[derive(Debug, Default)]
pub struct MemoryTileSink {
    tiles: Mutex<BTreeMap<TileKey, RgbImage>>,
}

impl MemoryTileSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tiles
    pub fn len(&self) -> usize {
        self.tiles.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no tile was stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the tile stored under `key`
    pub fn get(&self, key: TileKey) -> Option<RgbImage> {
        self.tiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// All stored tiles, ordered by zoom, column, row
    pub fn into_tiles(self) -> BTreeMap<TileKey, RgbImage> {
        self.tiles.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TileSink for MemoryTileSink {
    fn write_tile(&self, key: TileKey, tile: &RgbImage) -> Result<()> {
        self.tiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, tile.clone());
        Ok(())
    }
}
