//! Read access to source images by reference

use crate::io::error::{MosaicError, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Source of raw image bytes addressed by relative reference
///
/// Stores are shared across rendering threads, so lookups take `&self`.
pub trait ImageStore: Send + Sync {
    /// Return the raw bytes behind `reference`
    ///
    /// # Errors
    ///
    /// Returns `ImageNotFound` if nothing is stored under the reference, or
    /// `ImageLoad` if it exists but cannot be read
    fn read(&self, reference: &str) -> Result<Vec<u8>>;
}

/// Images stored as files below a root directory
#[derive(Debug, Clone)]
pub struct DirectoryImageStore {
    root: PathBuf,
}

impl DirectoryImageStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a reference resolves to, `None` if it would escape the root
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        (confined && !reference.is_empty()).then(|| self.root.join(relative))
    }
}

impl ImageStore for DirectoryImageStore {
    fn read(&self, reference: &str) -> Result<Vec<u8>> {
        let not_found = || MosaicError::ImageNotFound {
            reference: reference.to_string(),
        };
        let path = self.resolve(reference).ok_or_else(not_found)?;
        std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found()
            } else {
                MosaicError::ImageLoad {
                    path,
                    source: image::ImageError::IoError(e),
                }
            }
        })
    }
}

/// Images held in memory, keyed by reference
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store encoded image bytes under `reference`, replacing any previous entry
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(reference.into(), bytes);
    }

    /// Number of stored images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn read(&self, reference: &str) -> Result<Vec<u8>> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| MosaicError::ImageNotFound {
                reference: reference.to_string(),
            })
    }
}
