//! Sparse TF-IDF keyword similarity.
//!
//! The vectorizer reproduces the weighting the keyword matrix was built
//! with: lowercase word tokens of two or more word characters, stop words
//! removed, optional word bigrams over the remaining tokens, raw term counts
//! times idf, L2 normalisation. Cosine
//! similarity against the normalised document rows is then a dot product.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::engine::KeywordScorer;
use crate::error::SearchError;

/// Query-side TF-IDF transform over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    ngram_max: usize,
    stop_words: HashSet<String>,
}

impl TfIdfVectorizer {
    /// Build a vectorizer from a term → column map and per-column idf weights.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if a column is out of range of
    /// `idf` or `ngram_max` is not 1 or 2.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f32>,
        ngram_max: usize,
    ) -> Result<Self, SearchError> {
        if !(1..=2).contains(&ngram_max) {
            return Err(SearchError::Snapshot(format!(
                "ngram_max must be 1 or 2, got {ngram_max}"
            )));
        }
        if let Some((term, column)) = vocabulary.iter().find(|(_, c)| **c >= idf.len()) {
            return Err(SearchError::Snapshot(format!(
                "term {term:?} maps to column {column} but only {} idf weights exist",
                idf.len()
            )));
        }
        Ok(Self {
            vocabulary,
            idf,
            ngram_max,
            stop_words: HashSet::new(),
        })
    }

    /// Drop these (lowercase) words before terms and bigrams are formed.
    #[must_use]
    pub fn with_stop_words(mut self, stop_words: HashSet<String>) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Number of columns (terms) in the vocabulary space.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Transform text into a sorted, L2-normalised sparse vector.
    ///
    /// Text with no in-vocabulary terms yields an empty vector.
    pub fn transform(&self, text: &str) -> Vec<(usize, f32)> {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in terms(text, self.ngram_max, &self.stop_words) {
            if let Some(&column) = self.vocabulary.get(&term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column]))
            .collect();
        weighted.sort_by_key(|(column, _)| *column);
        normalize(&mut weighted);
        weighted
    }
}

/// Lowercased word tokens with at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_owned)
        .collect()
}

fn terms(text: &str, ngram_max: usize, stop_words: &HashSet<String>) -> Vec<String> {
    let mut tokens = tokenize(text);
    tokens.retain(|token| !stop_words.contains(token));
    let mut terms = tokens.clone();
    if ngram_max >= 2 {
        terms.extend(tokens.windows(2).map(|pair| pair.join(" ")));
    }
    terms
}

fn normalize(vector: &mut [(usize, f32)]) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

/// Keyword scorer over a sparse document-term matrix.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    vectorizer: Arc<TfIdfVectorizer>,
    rows: Vec<Vec<(usize, f32)>>,
}

impl TfIdfScorer {
    /// Build a scorer from one sparse row per catalog entry.
    ///
    /// Rows are L2-normalised here so that dot products are cosines.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Snapshot`] if a row references a column
    /// outside the vectorizer's vocabulary space.
    pub fn new(
        vectorizer: Arc<TfIdfVectorizer>,
        rows: Vec<Vec<(usize, f32)>>,
    ) -> Result<Self, SearchError> {
        let dimension = vectorizer.dimension();
        let mut normalized = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if let Some((column, _)) = row.iter().find(|(c, _)| *c >= dimension) {
                return Err(SearchError::Snapshot(format!(
                    "keyword row {index} references column {column}, vocabulary has {dimension}"
                )));
            }
            row.sort_by_key(|(column, _)| *column);
            normalize(&mut row);
            normalized.push(row);
        }
        Ok(Self {
            vectorizer,
            rows: normalized,
        })
    }

    /// The vectorizer shared with the query encoder.
    pub fn vectorizer(&self) -> &Arc<TfIdfVectorizer> {
        &self.vectorizer
    }
}

impl KeywordScorer for TfIdfScorer {
    fn score_all(&self, query: &str) -> Result<Vec<f64>, SearchError> {
        let query_vector: HashMap<usize, f32> =
            self.vectorizer.transform(query).into_iter().collect();
        if query_vector.is_empty() {
            return Ok(vec![0.0; self.rows.len()]);
        }

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let dot: f32 = row
                    .iter()
                    .filter_map(|(column, weight)| query_vector.get(column).map(|q| q * weight))
                    .sum();
                f64::from(dot).clamp(0.0, 1.0)
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
