//! Loading the precomputed catalog snapshot from disk.
//!
//! A snapshot is four JSON artifacts produced offline:
//!
//! | File | Contents |
//! |------|----------|
//! | `metadata.json` | One [`CatalogEntry`] per document, in row order |
//! | `embeddings.json` | Embedding dimension and one vector per document |
//! | `keywords.json` | TF-IDF vocabulary, idf weights, n-gram range, sparse rows |
//! | `projection.json` | Query encoder projection matrix (vocabulary x dimension) |
//!
//! Any missing or corrupt artifact, or a shape that does not line up with
//! the others, is fatal. A keyword matrix with a different row count is
//! tolerated: entries without a row score 0.0 on keywords.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use catalog_search::backends::{FlatIndex, ProjectionEncoder, TfIdfScorer, TfIdfVectorizer};
use catalog_search::{Catalog, CatalogEntry};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::error::{FinderError, Result};

/// Document embeddings as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsFile {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

/// TF-IDF keyword model and document matrix as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordsFile {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f32>,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    /// Words dropped before terms and bigrams are formed.
    #[serde(default)]
    pub stop_words: HashSet<String>,
    /// Sparse `(column, weight)` pairs, one row per document.
    pub rows: Vec<Vec<(usize, f32)>>,
}

fn default_ngram_max() -> usize {
    2
}

/// Query encoder projection matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionFile {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

/// All four snapshot artifacts, parsed but not yet assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotArtifacts {
    pub entries: Vec<CatalogEntry>,
    pub embeddings: EmbeddingsFile,
    pub keywords: KeywordsFile,
    pub projection: ProjectionFile,
}

/// Resolved artifact paths for a snapshot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub metadata: PathBuf,
    pub embeddings: PathBuf,
    pub keywords: PathBuf,
    pub projection: PathBuf,
}

impl SnapshotPaths {
    #[must_use]
    pub fn resolve(config: &SnapshotConfig) -> Self {
        let dir = config.resolved_dir();
        Self {
            metadata: dir.join(&config.metadata_file),
            embeddings: dir.join(&config.embeddings_file),
            keywords: dir.join(&config.keywords_file),
            projection: dir.join(&config.projection_file),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FinderError::Snapshot(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| FinderError::Snapshot(format!("failed to parse {}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string(value)
        .map_err(|e| FinderError::Snapshot(format!("failed to serialize {}: {e}", path.display())))?;
    std::fs::write(path, content)?;
    Ok(())
}

impl SnapshotArtifacts {
    /// Read and parse every artifact named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Snapshot`] if any file is missing or corrupt.
    pub fn read(config: &SnapshotConfig) -> Result<Self> {
        let paths = SnapshotPaths::resolve(config);
        let artifacts = Self {
            entries: read_json(&paths.metadata)?,
            embeddings: read_json(&paths.embeddings)?,
            keywords: read_json(&paths.keywords)?,
            projection: read_json(&paths.projection)?,
        };
        tracing::debug!(
            entries = artifacts.entries.len(),
            dimension = artifacts.embeddings.dimension,
            vocabulary = artifacts.keywords.idf.len(),
            "snapshot artifacts read"
        );
        Ok(artifacts)
    }

    /// Write every artifact to the locations named by `config`, creating the
    /// snapshot directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn write(&self, config: &SnapshotConfig) -> Result<()> {
        std::fs::create_dir_all(config.resolved_dir())?;
        let paths = SnapshotPaths::resolve(config);
        write_json(&paths.metadata, &self.entries)?;
        write_json(&paths.embeddings, &self.embeddings)?;
        write_json(&paths.keywords, &self.keywords)?;
        write_json(&paths.projection, &self.projection)?;
        Ok(())
    }

    /// Build the searchable catalog from the parsed artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Snapshot`] if the artifacts disagree on shape:
    /// vector count vs entry count, projection rows vs vocabulary size,
    /// projection columns vs embedding dimension.
    pub fn into_catalog(self) -> Result<Catalog> {
        let Self {
            entries,
            embeddings,
            keywords,
            projection,
        } = self;

        if embeddings.vectors.len() != entries.len() {
            return Err(FinderError::Snapshot(format!(
                "{} embeddings for {} entries",
                embeddings.vectors.len(),
                entries.len()
            )));
        }
        if projection.rows != keywords.idf.len() {
            return Err(FinderError::Snapshot(format!(
                "projection has {} rows but the vocabulary has {} terms",
                projection.rows,
                keywords.idf.len()
            )));
        }
        if projection.cols != embeddings.dimension {
            return Err(FinderError::Snapshot(format!(
                "projection has {} columns but embeddings have dimension {}",
                projection.cols, embeddings.dimension
            )));
        }
        if keywords.rows.len() != entries.len() {
            tracing::warn!(
                keyword_rows = keywords.rows.len(),
                entries = entries.len(),
                "keyword matrix row count differs from entry count; missing rows score 0"
            );
        }

        let vectorizer = Arc::new(
            TfIdfVectorizer::new(keywords.vocabulary, keywords.idf, keywords.ngram_max)
                .map_err(snapshot_error)?
                .with_stop_words(keywords.stop_words),
        );
        let encoder = ProjectionEncoder::new(
            Arc::clone(&vectorizer),
            projection.data,
            projection.cols,
        )
        .map_err(snapshot_error)?;
        let index = FlatIndex::new(embeddings.dimension, embeddings.vectors).map_err(snapshot_error)?;
        let scorer = TfIdfScorer::new(vectorizer, keywords.rows).map_err(snapshot_error)?;

        Catalog::new(entries, Arc::new(encoder), Arc::new(index), Arc::new(scorer))
            .map_err(snapshot_error)
    }
}

fn snapshot_error(e: catalog_search::SearchError) -> FinderError {
    FinderError::Snapshot(e.to_string())
}

/// Read the snapshot named by `config` and assemble a catalog.
///
/// # Errors
///
/// Returns [`FinderError::Snapshot`] for any missing, corrupt or
/// inconsistent artifact.
pub fn load_catalog(config: &SnapshotConfig) -> Result<Catalog> {
    let catalog = SnapshotArtifacts::read(config)?.into_catalog()?;
    tracing::info!(documents = catalog.len(), "catalog snapshot loaded");
    Ok(catalog)
}
