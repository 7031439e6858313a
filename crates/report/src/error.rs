//! Report error types
//!
//! Each pipeline stage wraps its failures in a stage-specific variant;
//! a failure aborts the run with no partial recovery.

use thiserror::Error;

use edpulse_store::StoreError;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while aggregating or persisting daily metrics
#[derive(Debug, Error)]
pub enum ReportError {
    /// The channel → slug lookup could not be loaded
    #[error("board slug lookup failed: {source}")]
    TenantInfo {
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// The scans intermediate table could not be loaded
    #[error("scans stage failed: {source}")]
    Scans {
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// The downloads intermediate table could not be loaded
    #[error("downloads stage failed: {source}")]
    Downloads {
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// The app-sessions or plays intermediate table could not be loaded
    #[error("app and plays stage failed: {source}")]
    AppAndPlays {
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// The app-sessions table had no rows
    #[error("app sessions table for {partition} is empty")]
    EmptyAppSessions {
        /// Date partition involved
        partition: String,
    },

    /// Persisting the overall history failed
    #[error("overall metrics stage failed: {source}")]
    Overall {
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// Persisting one organisation's history failed
    #[error("org metrics stage failed for '{slug}': {source}")]
    PerOrg {
        /// Organisation slug
        slug: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// A history row carried the wrong number of cells
    #[error("history record has {got} cells, schema has {want}")]
    RecordShape {
        /// Cells provided
        got: usize,
        /// Cells required
        want: usize,
    },
}
