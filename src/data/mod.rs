//! Data module - CSV loading, cleaning and caching

mod cache;
mod cleaner;
mod loader;

pub use cache::{global_cache, DatasetCache, DatasetError};
pub use cleaner::{CleanedDataset, CleanerError, DataCleaner, FillStrategy, ImputationScope, MedianFill};
pub use loader::{DataLoader, LoaderError, CYLINDERS, MODEL_YEAR};
