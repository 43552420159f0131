/// Command-line arguments and the build runner
pub mod cli;
/// Constants and runtime configuration
pub mod configuration;
/// Error types
pub mod error;
/// PNG encoding and image decoding
pub mod image;
/// Source image lookup by reference
pub mod image_store;
/// Projection input files
pub mod input;
/// Per-cell provenance manifest
pub mod manifest;
/// Progress reporting
pub mod progress;
/// Tile keys and tile sinks
pub mod tiles;
