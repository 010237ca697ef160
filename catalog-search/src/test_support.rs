//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::engine::{KeywordScorer, QueryEncoder, VectorIndex};
use crate::error::SearchError;
use crate::orchestrator::classify::classify;
use crate::types::{Candidate, CatalogEntry, VectorHit};

/// Encoder that maps every query to the same one-dimensional vector.
pub(crate) struct ConstantEncoder;

impl QueryEncoder for ConstantEncoder {
    fn encode(&self, _query: &str) -> Result<Vec<f32>, SearchError> {
        Ok(vec![1.0])
    }

    fn dimension(&self) -> usize {
        1
    }
}

/// Index that replays fixed distances and records the pool size it was asked for.
pub(crate) struct ScriptedIndex {
    hits: Vec<VectorHit>,
    pub(crate) last_request: AtomicUsize,
}

impl ScriptedIndex {
    fn new(distances: &[f64]) -> Self {
        let mut hits: Vec<VectorHit> = distances
            .iter()
            .enumerate()
            .map(|(id, &distance)| VectorHit { distance, id })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            hits,
            last_request: AtomicUsize::new(0),
        }
    }
}

impl VectorIndex for ScriptedIndex {
    fn search(&self, _vector: &[f32], n: usize) -> Result<Vec<VectorHit>, SearchError> {
        self.last_request.store(n, Ordering::SeqCst);
        Ok(self.hits.iter().copied().take(n).collect())
    }

    fn len(&self) -> usize {
        self.hits.len()
    }

    fn dimension(&self) -> usize {
        1
    }
}

/// Keyword scorer returning a fixed row of scores for every query.
pub(crate) struct ScriptedScorer(pub(crate) Vec<f64>);

impl KeywordScorer for ScriptedScorer {
    fn score_all(&self, _query: &str) -> Result<Vec<f64>, SearchError> {
        Ok(self.0.clone())
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// One scripted catalog row: the entry, its keyword score and its vector distance.
pub(crate) struct ScriptedHit {
    entry: CatalogEntry,
    keyword: f64,
    distance: f64,
}

impl ScriptedHit {
    pub(crate) fn new(entry: CatalogEntry, keyword: f64) -> Self {
        Self {
            entry,
            keyword,
            distance: 0.0,
        }
    }

    pub(crate) fn at_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }
}

/// Build a catalog whose backends replay the scripted rows.
pub(crate) fn scripted_catalog(rows: Vec<ScriptedHit>) -> Catalog {
    scripted_catalog_with_index(rows).0
}

/// Like [`scripted_catalog`], also handing back the index for inspection.
pub(crate) fn scripted_catalog_with_index(rows: Vec<ScriptedHit>) -> (Catalog, Arc<ScriptedIndex>) {
    let distances: Vec<f64> = rows.iter().map(|r| r.distance).collect();
    let keywords: Vec<f64> = rows.iter().map(|r| r.keyword).collect();
    let entries: Vec<CatalogEntry> = rows.into_iter().map(|r| r.entry).collect();

    let index = Arc::new(ScriptedIndex::new(&distances));
    let catalog = Catalog::new(
        entries,
        Arc::new(ConstantEncoder),
        Arc::clone(&index) as Arc<dyn VectorIndex>,
        Arc::new(ScriptedScorer(keywords)),
    )
    .expect("scripted backends agree on shape");
    (catalog, index)
}

/// Build a catalog over `entries` with zero distances and zero keyword scores.
pub(crate) fn catalog_of(entries: Vec<CatalogEntry>) -> Catalog {
    scripted_catalog(
        entries
            .into_iter()
            .map(|entry| ScriptedHit::new(entry, 0.0))
            .collect(),
    )
}

/// A classified candidate with the given score and no boost.
pub(crate) fn candidate(source: &str, values: &[&str], score: f64) -> Candidate {
    let entry = CatalogEntry::new(source, values.iter().map(|v| (*v).to_string()).collect());
    Candidate {
        category: classify(&entry),
        entry: Arc::new(entry),
        semantic_score: score,
        keyword_score: 0.0,
        base_score: score,
        score,
        boosted: false,
    }
}
