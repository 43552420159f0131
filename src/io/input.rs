//! JSON projection input files
//!
//! ```json
//! {
//!   "normalize": true,
//!   "items": [
//!     { "id": "a", "image": "a.jpg", "x": 12.5, "y": -3.0 },
//!     { "id": "b", "image": null, "x": 0.4, "y": 7.1 }
//!   ]
//! }
//! ```
//!
//! With `normalize` set, coordinates may have any scale and are mapped onto
//! the unit square; otherwise they must already lie in `[0, 1]`.

use crate::io::error::{MosaicError, Result, file_system_error};
use crate::spatial::projection::{Item, ProjectedPoint, ProjectionInput};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One projected item as stored in the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    /// Item identifier
    pub id: String,
    /// Image reference, absent or `null` for an item without picture
    #[serde(default)]
    pub image: Option<String>,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Whole input document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDocument {
    /// Items with their coordinates
    pub items: Vec<ProjectionRecord>,
    /// Normalize raw coordinates onto the unit square
    #[serde(default)]
    pub normalize: bool,
}

impl ProjectionDocument {
    /// Validate the records into a projection input
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjection` for non-finite coordinates, or for
    /// out-of-range ones when normalization is off
    pub fn into_input(self) -> Result<ProjectionInput> {
        let (items, coordinates): (Vec<Item>, Vec<[f64; 2]>) = self
            .items
            .into_iter()
            .map(|record| {
                (
                    Item {
                        id: record.id,
                        image: record.image,
                    },
                    [record.x, record.y],
                )
            })
            .unzip();

        if self.normalize {
            ProjectionInput::normalized(items, &coordinates)
        } else {
            let points = coordinates
                .iter()
                .map(|&[x, y]| ProjectedPoint::new(x, y))
                .collect();
            ProjectionInput::new(items, points)
        }
    }
}

/// Parse a projection document from a JSON string
///
/// # Errors
///
/// Returns `InvalidProjection` if the JSON is malformed or the records fail
/// validation
pub fn parse_projection(json: &str) -> Result<ProjectionInput> {
    let document: ProjectionDocument =
        serde_json::from_str(json).map_err(|e| MosaicError::InvalidProjection {
            index: None,
            reason: e.to_string(),
        })?;
    document.into_input()
}

/// Read and validate a projection file
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, otherwise as
/// [`parse_projection`]
pub fn read_projection(path: &Path) -> Result<ProjectionInput> {
    let json = std::fs::read_to_string(path).map_err(file_system_error(path, "read projection"))?;
    parse_projection(&json)
}
