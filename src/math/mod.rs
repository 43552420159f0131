//! Mathematical utilities for the mosaic pipeline

/// Distances, rotated extents and pixel sizing helpers
pub mod geometry;
