//! Error types for the catalog finder host.

use catalog_search::SearchError;

/// Top-level error type for the catalog finder.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Snapshot artifact missing, corrupt or inconsistent.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// The search service failed to initialize and cannot serve requests.
    #[error("service not ready: {0}")]
    NotReady(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the ranking core.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// A result could not be turned into its display form.
    #[error("presentation error: {0}")]
    Presentation(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FinderError>;
