//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls score fusion weights, the default relevance
//! threshold, the intent-boost rule table, the vector candidate pool and
//! result caching.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{Category, DEFAULT_MIN_SCORE};

/// Weights used to fuse vector and keyword similarity.
///
/// `fused = semantic * semantic_similarity + keyword * keyword_similarity`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    /// Weight of the vector similarity subscore.
    pub semantic: f64,
    /// Weight of the keyword similarity subscore.
    pub keyword: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            semantic: 0.7,
            keyword: 0.3,
        }
    }
}

/// One row of the intent-boost table.
///
/// When any trigger phrase occurs in the query (case-insensitive substring
/// match), every candidate of `category` has its score multiplied by `boost`
/// and the category's group is stacked first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRule {
    /// Literal trigger phrases.
    pub triggers: Vec<String>,
    /// Category the intent targets.
    pub category: Category,
    /// Score multiplier applied to matching candidates.
    pub boost: f64,
}

impl IntentRule {
    /// The built-in case-study intent.
    pub fn case_studies() -> Self {
        Self {
            triggers: ["case study", "case studies", "case-study", "case-studies"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            category: Category::CaseStudies,
            boost: 1.5,
        }
    }
}

/// Configuration for catalog search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fusion weights for vector and keyword similarity.
    pub weights: FusionWeights,
    /// Threshold used by callers that do not send their own.
    pub default_min_score: f64,
    /// Queries shorter than this (after trimming) are rejected.
    pub min_query_chars: usize,
    /// Ordered intent-boost table.
    pub intent_rules: Vec<IntentRule>,
    /// When set and the request has a `k`, ask the vector index for
    /// `k * multiplier` neighbours instead of the whole catalog.
    pub vector_pool_multiplier: Option<usize>,
    /// How long to cache final results in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached result sets.
    pub cache_capacity: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            default_min_score: DEFAULT_MIN_SCORE,
            min_query_chars: 2,
            intent_rules: vec![IntentRule::case_studies()],
            vector_pool_multiplier: None,
            cache_ttl_seconds: 0,
            cache_capacity: 100,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - fusion weights are finite and non-negative
    /// - `default_min_score` is within `[0, 1]`
    /// - `min_query_chars` is greater than 0
    /// - every intent rule has at least one non-blank trigger and a positive boost
    /// - `vector_pool_multiplier`, when set, is greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        let FusionWeights { semantic, keyword } = self.weights;
        if !semantic.is_finite() || !keyword.is_finite() || semantic < 0.0 || keyword < 0.0 {
            return Err(SearchError::Config(
                "fusion weights must be finite and non-negative".into(),
            ));
        }
        if !self.default_min_score.is_finite() || !(0.0..=1.0).contains(&self.default_min_score) {
            return Err(SearchError::Config(
                "default_min_score must be within [0, 1]".into(),
            ));
        }
        if self.min_query_chars == 0 {
            return Err(SearchError::Config(
                "min_query_chars must be greater than 0".into(),
            ));
        }
        for rule in &self.intent_rules {
            if rule.triggers.iter().all(|t| t.trim().is_empty()) {
                return Err(SearchError::Config(format!(
                    "intent rule for {} needs at least one trigger",
                    rule.category
                )));
            }
            if !rule.boost.is_finite() || rule.boost <= 0.0 {
                return Err(SearchError::Config(format!(
                    "intent boost for {} must be greater than 0",
                    rule.category
                )));
            }
        }
        if self.vector_pool_multiplier == Some(0) {
            return Err(SearchError::Config(
                "vector_pool_multiplier must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Number of neighbours to request from the vector index.
    pub fn vector_pool_size(&self, k: Option<usize>, catalog_len: usize) -> usize {
        match (k, self.vector_pool_multiplier) {
            (Some(k), Some(multiplier)) => k.saturating_mul(multiplier).min(catalog_len),
            _ => catalog_len,
        }
    }
}
