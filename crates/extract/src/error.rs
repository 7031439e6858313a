//! Extraction error types

use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting a daily metric
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Query execution failed
    #[error("query failed: {0}")]
    Query(#[from] edpulse_query::QueryError),

    /// Local tree or blob storage failure
    #[error("store error: {0}")]
    Store(#[from] edpulse_store::StoreError),

    /// Content metadata snapshot absent locally and in blob storage
    #[error("content snapshot missing for {partition}")]
    SnapshotMissing {
        /// Date partition of the missing snapshot
        partition: String,
    },

    /// Organisation search request failed
    #[error("org search failed: {0}")]
    OrgSearch(String),

    /// A response did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
