//! Query error types

/// Errors that can occur during query execution
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// HTTP client construction failed
    #[error("failed to build query client: {0}")]
    Client(String),

    /// Connection to the broker failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// The broker returned a non-success status
    #[error("query execution failed ({status}): {body}")]
    Execution {
        /// HTTP status code
        status: u16,
        /// Response body (truncated by the broker, passed through as-is)
        body: String,
    },

    /// Response could not be parsed
    #[error("failed to parse query response: {0}")]
    Parse(String),

    /// Pagination failed part-way through a result set
    #[error("pagination failed: {0}")]
    Pagination(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Parse(err.to_string())
    }
}
