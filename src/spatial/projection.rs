//! Items and their externally computed 2D projection
//!
//! The projection itself (t-SNE, UMAP, ...) happens elsewhere; this module only
//! validates what comes back and keeps items and points aligned index for index.

use crate::io::error::{MosaicError, Result};
use serde::{Deserialize, Serialize};

// Coordinates this close outside the unit square are clamped instead of rejected
const UNIT_TOLERANCE: f64 = 1e-9;

/// Opaque item identifier with an optional image reference
///
/// A missing image reference means the cell renders the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Caller-defined identifier, reported back in the manifest
    pub id: String,
    /// Relative image reference resolved through an image store
    #[serde(default)]
    pub image: Option<String>,
}

impl Item {
    /// Create an item backed by an image
    pub fn new(id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: Some(image.into()),
        }
    }

    /// Create an item without an image
    pub fn without_image(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: None,
        }
    }
}

/// A point in the unit square produced by the projection collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Horizontal coordinate in `[0, 1]`
    pub x: f64,
    /// Vertical coordinate in `[0, 1]`
    pub y: f64,
}

impl ProjectedPoint {
    /// Create a point from its coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinates as an `[x, y]` array
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Validated, index-aligned items and projected points
#[derive(Debug, Clone, Default)]
pub struct ProjectionInput {
    items: Vec<Item>,
    points: Vec<ProjectedPoint>,
}

impl ProjectionInput {
    /// Pair items with points that are already normalized to the unit square
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjection` if the two sequences differ in length or a
    /// coordinate is non-finite or outside `[0, 1]`
    pub fn new(items: Vec<Item>, points: Vec<ProjectedPoint>) -> Result<Self> {
        if items.len() != points.len() {
            return Err(MosaicError::InvalidProjection {
                index: None,
                reason: format!("{} items but {} points", items.len(), points.len()),
            });
        }

        let points = points
            .into_iter()
            .enumerate()
            .map(|(index, point)| {
                Ok(ProjectedPoint::new(
                    unit_coordinate(index, "x", point.x)?,
                    unit_coordinate(index, "y", point.y)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items, points })
    }

    /// Pair items with raw projection output of arbitrary scale
    ///
    /// Each axis is shifted so its minimum is 0 and divided by its maximum,
    /// mapping the point cloud onto the unit square. An axis on which all
    /// points coincide collapses to 0.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjection` if lengths differ or a coordinate is not finite
    pub fn normalized(items: Vec<Item>, raw: &[[f64; 2]]) -> Result<Self> {
        if let Some(index) = raw.iter().position(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(MosaicError::InvalidProjection {
                index: Some(index),
                reason: "coordinate is not finite".to_string(),
            });
        }

        let xs = normalize_axis(raw.iter().map(|p| p[0]));
        let ys = normalize_axis(raw.iter().map(|p| p[1]));
        let points = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| ProjectedPoint::new(x, y))
            .collect();

        Self::new(items, points)
    }

    /// Items in input order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Points in input order, aligned with [`Self::items`]
    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Number of items
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Image reference of the item at `index`, if the item exists and has one
    pub fn image_of(&self, index: usize) -> Option<&str> {
        self.items.get(index).and_then(|item| item.image.as_deref())
    }
}

fn unit_coordinate(index: usize, axis: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(MosaicError::InvalidProjection {
            index: Some(index),
            reason: format!("{axis} coordinate is not finite"),
        });
    }
    if !(-UNIT_TOLERANCE..=1.0 + UNIT_TOLERANCE).contains(&value) {
        return Err(MosaicError::InvalidProjection {
            index: Some(index),
            reason: format!("{axis} = {value} lies outside [0, 1]"),
        });
    }
    Ok(value.clamp(0.0, 1.0))
}

fn normalize_axis(values: impl Iterator<Item = f64> + Clone) -> Vec<f64> {
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let shifted: Vec<f64> = values.map(|v| v - min).collect();
    let max = shifted.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        shifted.into_iter().map(|v| v / max).collect()
    } else {
        vec![0.0; shifted.len()]
    }
}
