//! Spatial data structures for placing items on the mosaic grid
//!
//! This module contains spatial-related functionality including:
//! - Validated projection input (items and unit-square points)
//! - The target lattice and the solved assignment
//! - Canvas layout offsets and padding

/// Grid dimensions, lattice sites and item assignments
pub mod grid;
/// Per-cell pixel offsets and canvas padding
pub mod layout;
/// Items and their projected 2D points
pub mod projection;

pub use grid::{Assignment, CellCoord, GridSpec};
pub use layout::{Layout, OffsetStrategy};
pub use projection::{Item, ProjectedPoint, ProjectionInput};
