pub mod error;
pub mod file_store;
pub mod kv;
pub mod review_store;

pub use error::{ReviewStoreError, StorageError};
pub use file_store::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use review_store::{validate_draft, ReviewStore};

use cinestream_config::{Config, PathManager, StorageBackend};
use tracing::debug;

/// Build the review store selected by the configuration
pub fn open_review_store(config: &Config, paths: &PathManager) -> Result<ReviewStore, StorageError> {
    let backend: Box<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::File => {
            let dir = config.reviews_dir(paths);
            debug!("Opening file review store at {}", dir.display());
            Box::new(FileStore::open(dir)?)
        }
        StorageBackend::Memory => {
            debug!("Opening in-memory review store");
            Box::new(MemoryStore::new())
        }
    };
    Ok(ReviewStore::with_namespace(backend, config.storage.namespace.clone()))
}
