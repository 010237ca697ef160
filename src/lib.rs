//! Catalog finder: hybrid search over a catalog of tools, courses and case
//! studies.
//!
//! The ranking itself lives in the `catalog-search` crate. This crate wraps
//! it for deployment:
//! - **Snapshot**: loads precomputed embeddings, keyword weights and metadata
//! - **Service**: readiness, statistics and presented search results
//! - **Presentation**: titles, type labels, URLs and slugs for each result
//! - **Host bridge**: a newline-delimited JSON protocol over stdin/stdout

pub mod config;
pub mod error;
pub mod finder_dirs;
pub mod host;
pub mod present;
pub mod service;
pub mod snapshot;

pub use config::FinderConfig;
pub use error::{FinderError, Result};
pub use present::{PresentedResult, Presenter};
pub use service::{CatalogService, SearchParams, SearchResponse};
