//! Dataset Cache Module
//! Process-wide, load-once storage for the cleaned vehicle table.
//!
//! Lifecycle: the slot is empty at startup, populated on the first
//! `get_or_load`, and emptied only by `invalidate` (or process exit).
//! Requesting a different path replaces the entry. The cached dataset is
//! shared read-only through an `Arc`.

use super::cleaner::{CleanedDataset, CleanerError, DataCleaner, FillStrategy};
use super::loader::{DataLoader, LoaderError};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanerError),
}

struct CachedEntry {
    path: PathBuf,
    dataset: Arc<CleanedDataset>,
}

pub struct DatasetCache {
    slot: RwLock<Option<CachedEntry>>,
    loads: AtomicUsize,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CACHE: DatasetCache = DatasetCache::new();

/// The cache shared by the whole process.
pub fn global_cache() -> &'static DatasetCache {
    &GLOBAL_CACHE
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            slot: parking_lot::const_rwlock(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the cached dataset for `path`, reading and cleaning it on first use.
    pub fn get_or_load<S: FillStrategy>(
        &self,
        path: &Path,
        cleaner: &DataCleaner<S>,
    ) -> Result<Arc<CleanedDataset>, DatasetError> {
        if let Some(dataset) = self.lookup(path) {
            return Ok(dataset);
        }

        let mut slot = self.slot.write();
        // Another caller may have filled the slot while we waited.
        if let Some(entry) = slot.as_ref().filter(|e| e.path == path) {
            return Ok(Arc::clone(&entry.dataset));
        }

        let raw = DataLoader::load_csv(path)?;
        for (column, missing) in DataLoader::null_counts(&raw) {
            if missing > 0 {
                log::debug!("'{}' has {} missing values", column, missing);
            }
        }
        let dataset = Arc::new(cleaner.clean(raw)?);
        self.loads.fetch_add(1, Ordering::SeqCst);

        log::info!(
            "Cached {} cleaned records from {}",
            dataset.len(),
            path.display()
        );

        *slot = Some(CachedEntry {
            path: path.to_path_buf(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached dataset so the next access reads the file again.
    pub fn invalidate(&self) {
        if self.slot.write().take().is_some() {
            log::info!("Dataset cache invalidated");
        }
    }

    pub fn is_populated(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Number of times the file was actually read and cleaned.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn lookup(&self, path: &Path) -> Option<Arc<CleanedDataset>> {
        self.slot
            .read()
            .as_ref()
            .filter(|e| e.path == path)
            .map(|e| Arc::clone(&e.dataset))
    }
}
