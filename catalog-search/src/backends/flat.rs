//! Exhaustive squared-L2 vector index.
//!
//! Scans every stored vector per query. Distances are squared Euclidean,
//! so identical vectors are at distance 0 and the fused semantic score
//! `1 / (1 + d)` stays in (0, 1].

use crate::engine::VectorIndex;
use crate::error::SearchError;
use crate::types::VectorHit;

/// Brute-force nearest-neighbour index over row-major `f32` vectors.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index from one vector per catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if `dimension` is 0 or any vector
    /// has a different length.
    pub fn new(dimension: usize, vectors: Vec<Vec<f32>>) -> Result<Self, SearchError> {
        if dimension == 0 {
            return Err(SearchError::Snapshot(
                "vector dimension must be greater than 0".into(),
            ));
        }
        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for (row, vector) in vectors.into_iter().enumerate() {
            if vector.len() != dimension {
                return Err(SearchError::Snapshot(format!(
                    "vector {row} has dimension {}, expected {dimension}",
                    vector.len()
                )));
            }
            data.extend(vector);
        }
        Ok(Self { dimension, data })
    }

    fn row(&self, id: usize) -> &[f32] {
        let start = id * self.dimension;
        &self.data[start..start + self.dimension]
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

impl VectorIndex for FlatIndex {
    fn search(&self, vector: &[f32], n: usize) -> Result<Vec<VectorHit>, SearchError> {
        if vector.len() != self.dimension {
            return Err(SearchError::Backend(format!(
                "query vector has dimension {}, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<VectorHit> = (0..self.len())
            .map(|id| VectorHit {
                distance: squared_l2(vector, self.row(id)),
                id,
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        hits.truncate(n);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
