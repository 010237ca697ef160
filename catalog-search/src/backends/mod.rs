//! Reference retrieval backends.
//!
//! Each module provides a struct implementing one of the traits in
//! [`crate::engine`], built from precomputed snapshot data.

pub mod flat;
pub mod projection;
pub mod tfidf;

pub use flat::FlatIndex;
pub use projection::ProjectionEncoder;
pub use tfidf::{TfIdfScorer, TfIdfVectorizer};
