//! The immutable catalog snapshot shared by every query.
//!
//! A [`Catalog`] bundles the entries with the encoder, vector index and
//! keyword scorer built over them. It is constructed once at startup,
//! wrapped in an `Arc`, and never mutated afterwards, so concurrent
//! queries read it without locking.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::{KeywordScorer, QueryEncoder, VectorIndex};
use crate::error::SearchError;
use crate::types::CatalogEntry;

/// Read-only aggregation over the catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Total number of indexed documents.
    pub total_documents: usize,
    /// Document count per source label.
    pub by_source: BTreeMap<String, usize>,
    /// Dimension of the vector index.
    pub index_dimension: usize,
}

/// A loaded corpus snapshot.
pub struct Catalog {
    entries: Vec<Arc<CatalogEntry>>,
    encoder: Arc<dyn QueryEncoder>,
    index: Arc<dyn VectorIndex>,
    keywords: Arc<dyn KeywordScorer>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("entries", &self.entries.len())
            .field("index_dimension", &self.index.dimension())
            .field("keyword_rows", &self.keywords.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Assemble a snapshot. Entry ids are re-stamped with their position.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if the encoder and index disagree on
    /// dimension, or the index does not hold exactly one vector per entry.
    /// A keyword matrix with a different row count is accepted: entries
    /// without a row score 0.0 on keywords.
    pub fn new(
        entries: Vec<CatalogEntry>,
        encoder: Arc<dyn QueryEncoder>,
        index: Arc<dyn VectorIndex>,
        keywords: Arc<dyn KeywordScorer>,
    ) -> Result<Self, SearchError> {
        if encoder.dimension() != index.dimension() {
            return Err(SearchError::Snapshot(format!(
                "encoder dimension {} does not match index dimension {}",
                encoder.dimension(),
                index.dimension()
            )));
        }
        if index.len() != entries.len() {
            return Err(SearchError::Snapshot(format!(
                "vector index holds {} vectors for {} entries",
                index.len(),
                entries.len()
            )));
        }
        if keywords.len() != entries.len() {
            tracing::warn!(
                keyword_rows = keywords.len(),
                entries = entries.len(),
                "keyword matrix row count differs from catalog size"
            );
        }

        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(id, mut entry)| {
                entry.id = id;
                Arc::new(entry)
            })
            .collect();

        Ok(Self {
            entries,
            encoder,
            index,
            keywords,
        })
    }

    /// All entries, in id order.
    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    /// Look up an entry by id.
    pub fn get(&self, id: usize) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The query encoder.
    pub fn encoder(&self) -> &Arc<dyn QueryEncoder> {
        &self.encoder
    }

    /// The vector index.
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// The keyword scorer.
    pub fn keywords(&self) -> &Arc<dyn KeywordScorer> {
        &self.keywords
    }

    /// Count documents per source label.
    pub fn stats(&self) -> CatalogStats {
        let mut by_source = BTreeMap::new();
        for entry in &self.entries {
            *by_source.entry(entry.source.clone()).or_insert(0) += 1;
        }
        CatalogStats {
            total_documents: self.entries.len(),
            by_source,
            index_dimension: self.index.dimension(),
        }
    }

    /// Distinct source labels, sorted.
    pub fn sources(&self) -> Vec<String> {
        self.stats().by_source.into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VectorHit;

    struct FixedEncoder(usize);

    impl QueryEncoder for FixedEncoder {
        fn encode(&self, _query: &str) -> Result<Vec<f32>, SearchError> {
            Ok(vec![0.0; self.0])
        }

        fn dimension(&self) -> usize {
            self.0
        }
    }

    struct SizedIndex {
        len: usize,
        dimension: usize,
    }

    impl VectorIndex for SizedIndex {
        fn search(&self, _vector: &[f32], _n: usize) -> Result<Vec<VectorHit>, SearchError> {
            Ok(vec![])
        }

        fn len(&self) -> usize {
            self.len
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    struct SizedScorer(usize);

    impl KeywordScorer for SizedScorer {
        fn score_all(&self, _query: &str) -> Result<Vec<f64>, SearchError> {
            Ok(vec![0.0; self.0])
        }

        fn len(&self) -> usize {
            self.0
        }
    }

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Cleaned Sheet", vec!["a".into()]),
            CatalogEntry::new("case-studies", vec!["b".into()]),
            CatalogEntry::new("Cleaned Sheet", vec!["c".into()]),
        ]
    }

    fn build(index_len: usize, dim: usize, rows: usize) -> Result<Catalog, SearchError> {
        Catalog::new(
            entries(),
            Arc::new(FixedEncoder(4)),
            Arc::new(SizedIndex {
                len: index_len,
                dimension: dim,
            }),
            Arc::new(SizedScorer(rows)),
        )
    }

    #[test]
    fn ids_restamped_by_position() {
        let catalog = build(3, 4, 3).expect("catalog");
        for (i, entry) in catalog.entries().iter().enumerate() {
            assert_eq!(entry.id, i);
        }
    }

    #[test]
    fn stats_group_by_source() {
        let stats = build(3, 4, 3).expect("catalog").stats();
        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.by_source.get("Cleaned Sheet"), Some(&2));
        assert_eq!(stats.by_source.get("case-studies"), Some(&1));
        assert_eq!(stats.index_dimension, 4);
    }

    #[test]
    fn sources_are_sorted_and_distinct() {
        let catalog = build(3, 4, 3).expect("catalog");
        assert_eq!(catalog.sources(), vec!["Cleaned Sheet", "case-studies"]);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let err = build(3, 8, 3).unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn vector_count_mismatch_rejected() {
        let err = build(2, 4, 3).unwrap_err();
        assert!(err.to_string().contains("2 vectors for 3 entries"));
    }

    #[test]
    fn keyword_row_mismatch_tolerated() {
        assert!(build(3, 4, 1).is_ok());
    }

    #[test]
    fn catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
