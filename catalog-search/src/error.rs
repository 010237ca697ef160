//! Error types for the catalog-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages.

/// Errors that can occur while validating or running a catalog search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The request was rejected before the pipeline ran.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The query encoder could not produce a vector.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A retrieval backend (vector index or keyword scorer) failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// The catalog snapshot is inconsistent or could not be assembled.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Convenience type alias for catalog-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
