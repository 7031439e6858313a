//! Store error types

use std::io;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the local tree or against blob storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path involved
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// CSV encode/decode failed
    #[error("CSV error on '{path}': {message}")]
    Csv {
        /// Path involved
        path: String,
        /// Error detail
        message: String,
    },

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Object absent from blob storage
    ///
    /// Callers decide whether absence is an error; for history fetches
    /// it is the normal first-run case.
    #[error("blob object not found: {key}")]
    BlobNotFound {
        /// Object key
        key: String,
    },

    /// Blob transport failure
    #[error("blob request failed for '{key}': {message}")]
    BlobTransport {
        /// Object key
        key: String,
        /// Error detail
        message: String,
    },

    /// Blob service returned a non-success status
    #[error("blob request for '{key}' returned status {status}")]
    BlobStatus {
        /// Object key
        key: String,
        /// HTTP status code
        status: u16,
    },

    /// A path outside the data store was used to derive an object key
    #[error("path '{path}' is not under the data store")]
    OutsideStore {
        /// The offending path
        path: String,
    },
}

impl StoreError {
    /// Wrap an IO error with its path
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a CSV error with its path
    pub fn csv(path: impl Into<String>, err: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error is a blob-absence, as opposed to a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BlobNotFound { .. })
    }
}
