//! # catalog-search
//!
//! Hybrid retrieval and ranking over a precomputed catalog of tools,
//! courses, service providers and case studies.
//!
//! A query is matched two ways at once: by vector distance in an embedding
//! space and by keyword (TF-IDF) similarity. The two signals are fused into
//! one relevance score, boosted when the query names a category, filtered
//! by threshold, deduplicated, and returned as contiguous category groups.
//!
//! ## Design
//!
//! - The catalog is an immutable snapshot shared through `Arc`; queries
//!   never lock
//! - Encoding, vector search and keyword scoring sit behind traits in
//!   [`engine`], with reference implementations in [`backends`]
//! - Vector search and keyword scoring run concurrently on the blocking pool
//! - Optional in-memory result cache with configurable TTL
//! - Per-candidate failures are logged and skipped; only backend failures
//!   fail a query
//!
//! ## Privacy
//!
//! - Query text is logged only at trace level and never appears in errors

pub mod backends;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod types;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

pub use catalog::{Catalog, CatalogStats};
pub use config::{FusionWeights, IntentRule, SearchConfig};
pub use engine::{KeywordScorer, QueryEncoder, VectorIndex};
pub use error::{Result, SearchError};
pub use types::{CatalogEntry, Category, RankedResult, SearchRequest, VectorHit};

use cache::{CacheKey, ResultCache};

/// Search `catalog` once with the given configuration.
///
/// Validates the configuration and the request, then runs the full
/// pipeline. For repeated queries against the same snapshot prefer
/// [`CatalogSearcher`], which validates the configuration once and can
/// cache results.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration,
/// [`SearchError::InvalidQuery`] for a rejected request, and
/// [`SearchError::Encoding`] or [`SearchError::Backend`] if retrieval fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example(catalog: std::sync::Arc<catalog_search::Catalog>) -> catalog_search::Result<()> {
/// let config = catalog_search::SearchConfig::default();
/// let request = catalog_search::SearchRequest::new("crm for nonprofits").with_k(5);
/// let results = catalog_search::search(catalog, &request, &config).await?;
/// for result in &results {
///     println!("{} {:.3}", result.category, result.score);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    catalog: Arc<Catalog>,
    request: &SearchRequest,
    config: &SearchConfig,
) -> Result<Vec<RankedResult>> {
    config.validate()?;
    request.validate(config.min_query_chars)?;
    orchestrator::search::orchestrate_search(catalog, request, config).await
}

/// Reusable search handle over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogSearcher {
    catalog: Arc<Catalog>,
    config: SearchConfig,
    cache: Option<ResultCache>,
}

impl CatalogSearcher {
    /// Create a searcher, validating `config` up front.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(catalog: Arc<Catalog>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let cache = ResultCache::new(config.cache_ttl_seconds, config.cache_capacity);
        Ok(Self {
            catalog,
            config,
            cache,
        })
    }

    /// Run a search, answering from the cache when possible.
    ///
    /// # Errors
    ///
    /// Same as [`search`], minus configuration errors.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<RankedResult>> {
        request.validate(self.config.min_query_chars)?;
        tracing::trace!(query = %request.query, k = ?request.k, "catalog search");

        let key = self.cache.as_ref().map(|_| CacheKey::new(request));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key).await {
                tracing::debug!(count = hit.len(), "returning cached results");
                return Ok(hit);
            }
        }

        let results = orchestrator::search::orchestrate_search(
            Arc::clone(&self.catalog),
            request,
            &self.config,
        )
        .await?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, results.clone()).await;
        }
        Ok(results)
    }

    /// The snapshot this searcher reads.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The validated configuration every search runs with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
