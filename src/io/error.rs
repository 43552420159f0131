//! Error types shared by every stage of the mosaic build

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Grid dimensions cannot hold any cell
    InvalidGridSpec {
        /// Requested number of columns
        width: usize,
        /// Requested number of rows
        height: usize,
    },

    /// No projected points were supplied
    EmptyInput,

    /// Rotated inner image does not fit inside its cell
    ///
    /// The cell ratios and the maximum rotation must be chosen so that the
    /// rotated inner rectangle always fits. Hitting this is a sizing bug in the
    /// configuration, not a property of any particular source image.
    CellOverflow {
        /// Size of the rotated inner image (width, height)
        rotated: (u32, u32),
        /// Size of the cell (width, height)
        cell: (u32, u32),
    },

    /// A per-cell offset reaches past the padding reserved for it
    OffsetOutOfBounds {
        /// Grid coordinate of the offending cell (column, row)
        cell: (usize, usize),
        /// Offset produced for the cell (x, y)
        offset: (u32, u32),
        /// Padding reserved on the canvas (x, y)
        reserved: (u32, u32),
    },

    /// Image bytes could not be read or decoded
    ImageLoad {
        /// Path or reference of the image
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// The image store has no entry for a reference
    ImageNotFound {
        /// Reference that was looked up
        reference: String,
    },

    /// The assignment solver could not produce a matching
    AssignmentSolver {
        /// Description of the failure
        reason: String,
    },

    /// Projected input does not satisfy the unit-square contract
    InvalidProjection {
        /// Index of the offending point, if a single point is at fault
        index: Option<usize>,
        /// Description of the problem
        reason: String,
    },

    /// More items than grid cells while truncation is disabled
    SurplusItems {
        /// Number of items supplied
        items: usize,
        /// Number of grid cells available
        cells: usize,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to encode or write an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON input or manifest could not be (de)serialized
    Serialization {
        /// Path of the JSON document
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl MosaicError {
    /// Whether this error only affects a single cell's source image
    ///
    /// Such failures degrade the cell to the placeholder instead of aborting
    /// the whole build.
    pub const fn is_per_cell(&self) -> bool {
        matches!(self, Self::ImageLoad { .. } | Self::ImageNotFound { .. })
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSpec { width, height } => {
                write!(
                    f,
                    "Invalid grid {width}x{height}: both dimensions must be positive"
                )
            }
            Self::EmptyInput => write!(f, "No projected points to place on the grid"),
            Self::CellOverflow { rotated, cell } => {
                write!(
                    f,
                    "Rotated image {}x{} does not fit in cell {}x{}",
                    rotated.0, rotated.1, cell.0, cell.1
                )
            }
            Self::OffsetOutOfBounds {
                cell,
                offset,
                reserved,
            } => {
                write!(
                    f,
                    "Offset ({}, {}) of cell ({}, {}) exceeds reserved padding ({}, {})",
                    offset.0, offset.1, cell.0, cell.1, reserved.0, reserved.1
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageNotFound { reference } => {
                write!(f, "Image '{reference}' not found in store")
            }
            Self::AssignmentSolver { reason } => {
                write!(f, "Assignment solver failed: {reason}")
            }
            Self::InvalidProjection { index, reason } => match index {
                Some(i) => write!(f, "Invalid projected point {i}: {reason}"),
                None => write!(f, "Invalid projection input: {reason}"),
            },
            Self::SurplusItems { items, cells } => {
                write!(
                    f,
                    "{items} items do not fit in {cells} cells and truncation is disabled"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "JSON error in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for MosaicError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an assignment solver error
pub fn computation_error(reason: &impl ToString) -> MosaicError {
    MosaicError::AssignmentSolver {
        reason: reason.to_string(),
    }
}

/// Wrap an I/O error with the path and operation that produced it
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> MosaicError {
    let path = path.into();
    move |source| MosaicError::FileSystem {
        path,
        operation,
        source,
    }
}
