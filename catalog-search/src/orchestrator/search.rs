//! Core search orchestrator: concurrent retrieval, fusion, boost, dedup, stack.
//!
//! Vector search (including query encoding) and keyword scoring run
//! concurrently on the blocking pool, then the synchronous ranking pipeline
//! turns their outputs into the final category-stacked list.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{Category, RankedResult, SearchRequest, VectorHit};

use super::dedup::deduplicate;
use super::intent::{apply_boosts, detect_intents};
use super::scoring::fuse_candidates;
use super::stacking::stack;

/// Orchestrate a hybrid search over `catalog`.
///
/// # Pipeline
///
/// 1. Return early with no results if the catalog is empty
/// 2. Encode the query and search the vector index, concurrently with
///    keyword scoring, joined with [`futures::future::join`]
/// 3. Hand both outputs to [`rank_candidates`]
///
/// The request is assumed to be validated by the caller.
///
/// # Errors
///
/// Returns [`SearchError::Encoding`] or [`SearchError::Backend`] if the
/// encoder or either backend fails. Per-candidate problems never fail the
/// query.
pub async fn orchestrate_search(
    catalog: Arc<Catalog>,
    request: &SearchRequest,
    config: &SearchConfig,
) -> Result<Vec<RankedResult>, SearchError> {
    if catalog.is_empty() {
        tracing::debug!("catalog is empty; returning no results");
        return Ok(Vec::new());
    }

    let pool = config.vector_pool_size(request.k, catalog.len());

    let vector_task = {
        let catalog = Arc::clone(&catalog);
        let query = request.query.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<VectorHit>, SearchError> {
            let vector = catalog.encoder().encode(&query)?;
            catalog.index().search(&vector, pool)
        })
    };

    let keyword_task = {
        let catalog = Arc::clone(&catalog);
        let query = request.query.clone();
        tokio::task::spawn_blocking(move || catalog.keywords().score_all(&query))
    };

    let (hits, keyword_scores) = futures::future::join(vector_task, keyword_task).await;
    let hits = hits.map_err(|e| SearchError::Backend(format!("vector search task failed: {e}")))??;
    let keyword_scores = keyword_scores
        .map_err(|e| SearchError::Backend(format!("keyword scoring task failed: {e}")))??;

    tracing::debug!(
        hits = hits.len(),
        keyword_rows = keyword_scores.len(),
        "retrieval complete"
    );

    Ok(rank_candidates(&catalog, &hits, &keyword_scores, request, config))
}

/// Rank retrieved candidates.
///
/// # Pipeline
///
/// 1. Fuse vector distance and keyword similarity per hit
/// 2. Detect query intents and boost matching categories
/// 3. Drop candidates below `request.min_score` (after boosting)
/// 4. Deduplicate (exact values first-seen, tool names best-score)
/// 5. Group by category, rank groups, promote intent categories
/// 6. Concatenate and truncate to `request.k`
pub fn rank_candidates(
    catalog: &Catalog,
    hits: &[VectorHit],
    keyword_scores: &[f64],
    request: &SearchRequest,
    config: &SearchConfig,
) -> Vec<RankedResult> {
    let mut candidates = fuse_candidates(catalog, hits, keyword_scores, &config.weights);

    let intents = detect_intents(&request.query, &config.intent_rules);
    apply_boosts(&mut candidates, &intents);

    let before = candidates.len();
    candidates.retain(|c| c.score >= request.min_score);
    let qualifying = candidates.len();

    let deduped = deduplicate(candidates);
    tracing::debug!(
        candidates = before,
        qualifying,
        unique = deduped.len(),
        intents = intents.len(),
        "candidates scored"
    );

    let promoted: Vec<Category> = intents.iter().map(|i| i.category).collect();
    stack(deduped, &promoted, request.k)
}
