use thiserror::Error;

/// Failure of the underlying key-value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ReviewStoreError {
    /// The draft breaks the rating/text contract; nothing was written
    #[error("invalid review: {0}")]
    InvalidReview(String),

    /// The collection could not be written back; the caller still owns the draft
    #[error("review storage unavailable for '{key}': {source}")]
    StorageUnavailable {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to encode reviews: {0}")]
    Encode(#[from] serde_json::Error),
}
