//! Load-once memoization of a dataset.
//!
//! The cache holds at most one dataset, keyed by the canonical path of its
//! source. Asking for the same source again returns the shared dataset
//! without touching the file; asking for a different source replaces the
//! entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Dataset, LoadError, load};

#[derive(Debug)]
struct CacheEntry {
    key: PathBuf,
    dataset: Arc<Dataset>,
}

/// Explicit, single-entry dataset cache.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

impl DatasetCache {
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the dataset for `path`, loading it only if the cache is
    /// empty or currently holds a different source.
    ///
    /// A failed load leaves the cache empty.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source cannot be resolved or loaded.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let key = source_key(path)?;

        if let Some(entry) = &self.entry
            && entry.key == key
        {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(&entry.dataset));
        }

        log::debug!("Dataset cache miss for {}", key.display());
        self.entry = None;

        let dataset = Arc::new(load(&key)?);
        self.entry = Some(CacheEntry {
            key,
            dataset: Arc::clone(&dataset),
        });

        Ok(dataset)
    }

    /// The currently cached dataset, if any.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Dataset>> {
        self.entry.as_ref().map(|entry| Arc::clone(&entry.dataset))
    }

    /// Drops the cached dataset so the next request re-reads its source.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Resolves the identity of a source path.
fn source_key(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
