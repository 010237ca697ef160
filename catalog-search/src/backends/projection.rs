//! Lightweight query encoder: TF-IDF projected into the embedding space.
//!
//! Avoids running a sentence-embedding model at query time. The query's
//! TF-IDF vector is multiplied by a precomputed projection matrix
//! (vocabulary × embedding dimension), squashed with `tanh(2x)`, its
//! stronger-than-average components amplified, and finally L2-normalised.

use std::sync::Arc;

use crate::engine::QueryEncoder;
use crate::error::SearchError;

use super::tfidf::TfIdfVectorizer;

/// Amplification applied to components above the mean magnitude.
const STRONG_SIGNAL_GAIN: f32 = 0.5;

/// Query encoder backed by a dense projection matrix.
#[derive(Debug, Clone)]
pub struct ProjectionEncoder {
    vectorizer: Arc<TfIdfVectorizer>,
    projection: Vec<f32>,
    dimension: usize,
}

impl ProjectionEncoder {
    /// Build an encoder from a row-major projection matrix.
    ///
    /// The matrix must have one row per vocabulary column and `dimension`
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if the matrix shape does not match.
    pub fn new(
        vectorizer: Arc<TfIdfVectorizer>,
        projection: Vec<f32>,
        dimension: usize,
    ) -> Result<Self, SearchError> {
        let rows = vectorizer.dimension();
        if dimension == 0 || projection.len() != rows * dimension {
            return Err(SearchError::Snapshot(format!(
                "projection matrix has {} values, expected {rows} x {dimension}",
                projection.len()
            )));
        }
        Ok(Self {
            vectorizer,
            projection,
            dimension,
        })
    }
}

/// Lowercase, trim and collapse internal whitespace.
pub fn preprocess(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl QueryEncoder for ProjectionEncoder {
    fn encode(&self, query: &str) -> Result<Vec<f32>, SearchError> {
        let sparse = self.vectorizer.transform(&preprocess(query));

        let mut dense = vec![0.0_f32; self.dimension];
        for (row, weight) in sparse {
            let start = row * self.dimension;
            let projected = &self.projection[start..start + self.dimension];
            for (out, p) in dense.iter_mut().zip(projected) {
                *out += weight * p;
            }
        }

        for value in &mut dense {
            *value = (*value * 2.0).tanh();
        }

        let mean_magnitude = dense.iter().map(|v| v.abs()).sum::<f32>() / self.dimension as f32;
        for value in &mut dense {
            if value.abs() > mean_magnitude {
                *value *= 1.0 + STRONG_SIGNAL_GAIN;
            }
        }

        let norm = dense.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut dense {
                *value /= norm;
            }
        }

        if dense.iter().any(|v| !v.is_finite()) {
            return Err(SearchError::Encoding(
                "projection produced a non-finite component".into(),
            ));
        }
        Ok(dense)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
