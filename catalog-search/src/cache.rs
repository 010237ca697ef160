//! In-memory result cache for a searcher.
//!
//! Caches the final ranked results keyed by the (trimmed query, `k`,
//! threshold) triple. Uses [`moka`] for async-friendly caching with
//! configurable TTL and automatic eviction. Each searcher owns its own
//! cache, so results never outlive the catalog snapshot they came from.

use std::time::Duration;

use moka::future::Cache;

use crate::types::{RankedResult, SearchRequest};

/// Composite cache key: trimmed query, result cap and threshold bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    k: Option<usize>,
    min_score_bits: u64,
}

impl CacheKey {
    /// Build a deterministic cache key from a request.
    ///
    /// Surrounding whitespace is ignored. Case is kept because encoders
    /// are free to treat it as significant.
    pub fn new(request: &SearchRequest) -> Self {
        Self {
            query: request.query.trim().to_owned(),
            k: request.k,
            min_score_bits: request.min_score.to_bits(),
        }
    }
}

/// Bounded, time-limited cache of ranked result sets.
#[derive(Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, Vec<RankedResult>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl ResultCache {
    /// Create a cache holding at most `capacity` result sets for `ttl_seconds`.
    ///
    /// Returns `None` when `ttl_seconds` is 0, which disables caching.
    pub fn new(ttl_seconds: u64, capacity: u64) -> Option<Self> {
        if ttl_seconds == 0 {
            return None;
        }
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();
        Some(Self { inner })
    }

    /// Look up cached results for the given key.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<RankedResult>> {
        self.inner.get(key).await
    }

    /// Insert ranked results into the cache.
    pub async fn insert(&self, key: CacheKey, results: Vec<RankedResult>) {
        self.inner.insert(key, results).await;
    }
}
