//! Trait definitions for the pluggable retrieval backends.
//!
//! The pipeline treats query encoding, nearest-neighbour search and keyword
//! scoring as synchronous black boxes. Each one sits behind its own trait so
//! a catalog snapshot can combine any encoder, index and scorer that agree on
//! dimensions and row ids.
//!
//! All implementations must be `Send + Sync`: one snapshot is shared by every
//! concurrent query, and searches run on the blocking thread pool.

use crate::error::SearchError;
use crate::types::VectorHit;

/// Turns query text into a vector in the index's embedding space.
pub trait QueryEncoder: Send + Sync {
    /// Encode a query string.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Encoding`] if the text cannot be encoded.
    fn encode(&self, query: &str) -> Result<Vec<f32>, SearchError>;

    /// Dimension of the vectors produced by [`QueryEncoder::encode`].
    fn dimension(&self) -> usize;
}

/// Nearest-neighbour search over the catalog's embedding vectors.
pub trait VectorIndex: Send + Sync {
    /// Return up to `n` nearest entries, ordered by ascending distance.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Backend`] if the query vector is unusable
    /// (for example, a dimension mismatch).
    fn search(&self, vector: &[f32], n: usize) -> Result<Vec<VectorHit>, SearchError>;

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    /// Returns `true` if the index holds no vectors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the indexed vectors.
    fn dimension(&self) -> usize;
}

/// Sparse keyword similarity against every catalog entry.
pub trait KeywordScorer: Send + Sync {
    /// Score `query` against every row. Scores are in `[0, 1]`; the returned
    /// vector has one element per row of the underlying matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Backend`] if scoring fails.
    fn score_all(&self, query: &str) -> Result<Vec<f64>, SearchError>;

    /// Number of rows in the keyword matrix.
    fn len(&self) -> usize;

    /// Returns `true` if the matrix has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
