//! Core types for catalog entries, scored candidates and ranked results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::SearchError;

/// A single record of the precomputed catalog.
///
/// Entries are immutable once loaded. `id` is the entry's position in the
/// snapshot, which is also its row in the vector index and the keyword
/// matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Position of this entry in the catalog snapshot.
    #[serde(default)]
    pub id: usize,
    /// Source label, e.g. the name of the sheet the record came from.
    #[serde(alias = "sheet")]
    pub source: String,
    /// Ordered display field values.
    #[serde(default)]
    pub values: Vec<String>,
    /// Industry (case studies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Problem type (case studies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    /// Case study identifier (case studies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_id: Option<u64>,
    /// Case study summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Word count of the source document (case studies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    /// Short description of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Image path or URL attached to the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogEntry {
    /// Build an entry with only a source label and display values.
    pub fn new(source: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            source: source.into(),
            values,
            ..Default::default()
        }
    }

    /// The content field used by category rules: the first display value.
    pub fn content_field(&self) -> &str {
        self.values.first().map_or("", String::as_str)
    }
}

/// The fixed set of result categories.
///
/// Declaration order is the enumeration order used as the tie-break when
/// category groups have equal best scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Tools and software.
    Tools,
    /// Training programs and courses.
    Courses,
    /// Service providers, vendors and companies.
    ServiceProviders,
    /// Case studies.
    CaseStudies,
    /// Anything no rule matched.
    Other,
}

impl Category {
    /// Returns the wire label of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Courses => "courses",
            Self::ServiceProviders => "service-providers",
            Self::CaseStudies => "case-studies",
            Self::Other => "other",
        }
    }

    /// Returns all categories in enumeration order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Tools,
            Self::Courses,
            Self::ServiceProviders,
            Self::CaseStudies,
            Self::Other,
        ]
    }

    /// Position of this category in [`Category::all`].
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Tools => 0,
            Self::Courses => 1,
            Self::ServiceProviders => 2,
            Self::CaseStudies => 3,
            Self::Other => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One neighbour returned by a vector index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorHit {
    /// Distance from the query vector (lower is closer).
    pub distance: f64,
    /// Catalog entry id.
    pub id: usize,
}

/// A transient, per-query scored reference to a catalog entry.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The catalog entry this candidate refers to.
    pub entry: Arc<CatalogEntry>,
    /// Category assigned by the classifier.
    pub category: Category,
    /// Vector similarity in (0, 1].
    pub semantic_score: f64,
    /// Keyword similarity in [0, 1].
    pub keyword_score: f64,
    /// Fused score before any intent boost.
    pub base_score: f64,
    /// Final score after intent boosting.
    pub score: f64,
    /// Whether an intent boost was applied.
    pub boosted: bool,
}

/// A single ranked result handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    /// The source catalog entry.
    pub entry: Arc<CatalogEntry>,
    /// Computed category.
    pub category: Category,
    /// Final fused (and possibly boosted) score.
    pub score: f64,
    /// Fused score before any intent boost. Below the request threshold
    /// only when the boost is what admitted the result.
    pub base_score: f64,
    /// Vector similarity subscore.
    pub semantic_score: f64,
    /// Keyword similarity subscore.
    pub keyword_score: f64,
    /// Whether intent boosting changed this result's score.
    pub boosted: bool,
}

impl From<Candidate> for RankedResult {
    fn from(candidate: Candidate) -> Self {
        Self {
            entry: candidate.entry,
            category: candidate.category,
            score: candidate.score,
            base_score: candidate.base_score,
            semantic_score: candidate.semantic_score,
            keyword_score: candidate.keyword_score,
            boosted: candidate.boosted,
        }
    }
}

/// Minimum relevance score applied when the caller does not give one.
pub const DEFAULT_MIN_SCORE: f64 = 0.30;

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

/// A caller's search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Optional result cap; `None` returns every qualifying result.
    #[serde(default)]
    pub k: Option<usize>,
    /// Minimum relevance score threshold in [0, 1].
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl SearchRequest {
    /// Build a request with the default threshold and no result cap.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            k: None,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    /// Set the result cap.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Set the minimum score threshold.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Validates the request contract.
    ///
    /// Checks:
    /// - the trimmed query has at least `min_query_chars` characters
    /// - `k`, when given, is greater than 0
    /// - `min_score` is finite and within `[0, 1]`
    pub fn validate(&self, min_query_chars: usize) -> Result<(), SearchError> {
        let length = self.query.trim().chars().count();
        if length == 0 {
            return Err(SearchError::InvalidQuery("query must not be empty".into()));
        }
        if length < min_query_chars {
            return Err(SearchError::InvalidQuery(format!(
                "query must be at least {min_query_chars} characters long"
            )));
        }
        if self.k == Some(0) {
            return Err(SearchError::InvalidQuery(
                "k must be greater than 0".into(),
            ));
        }
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(SearchError::InvalidQuery(
                "min_score must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
