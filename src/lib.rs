//! Photo-mosaic layout engine
//!
//! Items arrive with 2D coordinates from an external projection (t-SNE, UMAP).
//! They are snapped onto a regular grid with an optimal one-to-one assignment,
//! every cell is rendered as a framed and slightly rotated picture, and the
//! composed canvas is cut into a multi-resolution tile pyramid for pan/zoom
//! map viewers.

#![forbid(unsafe_code)]

/// Grid assignment solver and the end-to-end build pipeline
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Pixel geometry helpers
pub mod math;
/// Cell rendering, canvas composition and tile pyramid generation
pub mod render;
/// Projection input, grid lattice, assignments and cell layout
pub mod spatial;

pub use io::error::{MosaicError, Result};
