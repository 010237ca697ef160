//! Shared helpers for integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use catalog_finder::config::{FinderConfig, SnapshotConfig};
use catalog_finder::snapshot::{EmbeddingsFile, KeywordsFile, ProjectionFile, SnapshotArtifacts};
use catalog_search::backends::tfidf::tokenize;
use catalog_search::backends::{ProjectionEncoder, TfIdfVectorizer};
use catalog_search::{CatalogEntry, QueryEncoder};

fn entry(source: &str, values: &[&str]) -> CatalogEntry {
    CatalogEntry::new(source, values.iter().map(|v| (*v).to_owned()).collect())
}

/// A small catalog spanning every category.
pub(crate) fn sample_entries() -> Vec<CatalogEntry> {
    vec![
        entry(
            "Cleaned Sheet",
            &["AI Tools", "CRM for donor management", "Salesforce"],
        ),
        entry(
            "Training Program",
            &["Course", "Data analytics course for nonprofits", "Data Analytics 101"],
        ),
        entry(
            "case-studies",
            &[
                "Armman - maternal health outreach (India)",
                "Mobile health messaging for mothers",
            ],
        ),
        entry(
            "Service Provider Profiles",
            &["Tech4Good Partners", "CRM implementation vendor"],
        ),
        entry(
            "case-studies",
            &[
                "Educate Girls predictive targeting to enroll girls",
                "Machine learning to find out of school girls",
            ],
        ),
    ]
}

/// Build snapshot artifacts whose document embeddings come from the same
/// encoder used for queries (identity projection over a unigram TF-IDF
/// vocabulary).
pub(crate) fn artifacts_for(entries: Vec<CatalogEntry>) -> SnapshotArtifacts {
    let texts: Vec<String> = entries.iter().map(|e| e.values.join(" ")).collect();

    let mut vocabulary: HashMap<String, usize> = HashMap::new();
    let mut document_frequency: Vec<usize> = Vec::new();
    for text in &texts {
        let mut seen = HashSet::new();
        for token in tokenize(text) {
            let next = vocabulary.len();
            let column = *vocabulary.entry(token).or_insert(next);
            if column == document_frequency.len() {
                document_frequency.push(0);
            }
            if seen.insert(column) {
                document_frequency[column] += 1;
            }
        }
    }
    let n = texts.len() as f32;
    let idf: Vec<f32> = document_frequency
        .iter()
        .map(|df| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0)
        .collect();

    let dimension = idf.len();
    let mut projection = vec![0.0_f32; dimension * dimension];
    for i in 0..dimension {
        projection[i * dimension + i] = 1.0;
    }

    let vectorizer = Arc::new(
        TfIdfVectorizer::new(vocabulary.clone(), idf.clone(), 1).expect("vectorizer"),
    );
    let encoder = ProjectionEncoder::new(Arc::clone(&vectorizer), projection.clone(), dimension)
        .expect("encoder");
    let vectors = texts
        .iter()
        .map(|t| encoder.encode(t))
        .collect::<Result<Vec<_>, _>>()
        .expect("document embeddings");
    let rows = texts.iter().map(|t| vectorizer.transform(t)).collect();

    SnapshotArtifacts {
        entries,
        embeddings: EmbeddingsFile { dimension, vectors },
        keywords: KeywordsFile {
            vocabulary,
            idf,
            ngram_max: 1,
            stop_words: HashSet::new(),
            rows,
        },
        projection: ProjectionFile {
            rows: dimension,
            cols: dimension,
            data: projection,
        },
    }
}

/// Write the sample snapshot into a fresh temp dir and return a config
/// pointing at it. Keep the `TempDir` alive for the test's duration.
pub(crate) fn sample_snapshot() -> (FinderConfig, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let snapshot = SnapshotConfig {
        dir: Some(dir.path().join("snapshot")),
        ..Default::default()
    };
    artifacts_for(sample_entries())
        .write(&snapshot)
        .expect("write snapshot");

    let config = FinderConfig {
        snapshot,
        ..Default::default()
    };
    (config, dir)
}
