//! Weighted fusion of vector and keyword similarity.
//!
//! Assigns scores based on:
//! - Vector distance mapped into (0, 1]: `semantic = 1 / (1 + d)`
//! - Keyword similarity in [0, 1]
//!
//! Formula: `fused = w_semantic * semantic + w_keyword * keyword`
//! with default weights 0.7 / 0.3.

use crate::catalog::Catalog;
use crate::config::FusionWeights;
use crate::types::{Candidate, VectorHit};

use super::classify::classify;

/// Map a non-negative vector distance into (0, 1].
///
/// Distance 0 maps to 1.0 and the result decreases monotonically.
/// Negative distances are clamped to 0.
pub fn semantic_similarity(distance: f64) -> f64 {
    1.0 / (1.0 + distance.max(0.0))
}

/// Fuse a semantic and a keyword similarity into one relevance score.
pub fn fuse(semantic: f64, keyword: f64, weights: &FusionWeights) -> f64 {
    weights.semantic * semantic + weights.keyword * keyword
}

/// Keyword similarity for catalog entry `id`.
///
/// Ids outside the keyword matrix score 0.0 rather than failing.
pub fn keyword_score_at(scores: &[f64], id: usize) -> f64 {
    scores.get(id).copied().unwrap_or(0.0)
}

/// Turn vector hits into classified, scored candidates.
///
/// Candidates keep the order of `hits` (ascending distance). Hits whose id
/// is outside the catalog are skipped. A candidate whose fused score is not
/// finite is logged and excluded without affecting the others.
pub fn fuse_candidates(
    catalog: &Catalog,
    hits: &[VectorHit],
    keyword_scores: &[f64],
    weights: &FusionWeights,
) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(hits.len());

    for hit in hits {
        let Some(entry) = catalog.get(hit.id) else {
            tracing::debug!(id = hit.id, "vector hit outside catalog; skipping");
            continue;
        };

        let semantic_score = semantic_similarity(hit.distance);
        let keyword_score = keyword_score_at(keyword_scores, hit.id);
        let fused = fuse(semantic_score, keyword_score, weights);

        if !fused.is_finite() {
            tracing::warn!(
                id = hit.id,
                distance = hit.distance,
                keyword_score,
                "non-finite fused score; excluding candidate"
            );
            continue;
        }

        candidates.push(Candidate {
            category: classify(entry),
            entry: std::sync::Arc::clone(entry),
            semantic_score,
            keyword_score,
            base_score: fused,
            score: fused,
            boosted: false,
        });
    }

    candidates
}
