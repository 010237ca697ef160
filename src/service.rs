//! The catalog search service: readiness, statistics and presented search.
//!
//! A [`CatalogService`] is built once at startup. If the snapshot cannot be
//! loaded the service still comes up, in a not-ready state, and answers
//! every catalog operation with [`FinderError::NotReady`] so the host can
//! report the problem instead of exiting.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use catalog_search::orchestrator::classify::classify;
use catalog_search::{Catalog, CatalogSearcher, Category, SearchRequest};
use serde::{Deserialize, Serialize};

use crate::config::FinderConfig;
use crate::error::{FinderError, Result};
use crate::present::{PresentedResult, Presenter};
use crate::snapshot::load_catalog;

/// Crate version reported by health checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether the service can answer searches.
#[derive(Debug)]
pub enum ServiceState {
    Ready(CatalogSearcher),
    /// Initialization failed; the reason is reported to callers.
    NotReady(String),
}

/// Search parameters as sent by a client.
///
/// `min_score` falls back to the configured default threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl SearchParams {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            k: None,
            min_score: None,
        }
    }

    fn into_request(self, default_min_score: f64) -> SearchRequest {
        SearchRequest {
            query: self.query,
            k: self.k,
            min_score: self.min_score.unwrap_or(default_min_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` when the catalog is loaded, otherwise `unhealthy`.
    pub status: String,
    pub version: String,
    pub search_engine_loaded: bool,
    pub total_documents: usize,
    /// Initialization failure, when not ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_documents: usize,
    /// Document count per source sheet.
    pub sources: BTreeMap<String, usize>,
    /// Document count per computed category.
    pub categories: BTreeMap<Category, usize>,
    pub index_dimension: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesReport {
    /// Source sheet labels present in the catalog.
    pub categories: Vec<String>,
    pub category_counts: BTreeMap<String, usize>,
    pub description: String,
}

/// A presented search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    /// Always `all`: the service never restricts by category.
    pub detected_category: String,
    pub execution_time_ms: f64,
    pub results: Vec<PresentedResult>,
}

#[derive(Debug)]
pub struct CatalogService {
    state: ServiceState,
    presenter: Presenter,
    default_min_score: f64,
}

impl CatalogService {
    /// Load the snapshot named by `config` and build the service.
    ///
    /// Never fails: any initialization error yields a not-ready service.
    #[must_use]
    pub fn load(config: &FinderConfig) -> Self {
        let state = match Self::init(config) {
            Ok(searcher) => ServiceState::Ready(searcher),
            Err(e) => {
                tracing::error!(error = %e, "catalog service failed to initialize");
                ServiceState::NotReady(e.to_string())
            }
        };
        Self::with_state(state, config)
    }

    fn init(config: &FinderConfig) -> Result<CatalogSearcher> {
        config.validate()?;
        let catalog = load_catalog(&config.snapshot)?;
        Ok(CatalogSearcher::new(Arc::new(catalog), config.search.clone())?)
    }

    /// Build a ready service over an already assembled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn from_catalog(catalog: Arc<Catalog>, config: &FinderConfig) -> Result<Self> {
        config.validate()?;
        let searcher = CatalogSearcher::new(catalog, config.search.clone())?;
        Ok(Self::with_state(ServiceState::Ready(searcher), config))
    }

    /// Build a service that reports `reason` for every catalog operation.
    #[must_use]
    pub fn not_ready(reason: impl Into<String>, config: &FinderConfig) -> Self {
        Self::with_state(ServiceState::NotReady(reason.into()), config)
    }

    fn with_state(state: ServiceState, config: &FinderConfig) -> Self {
        Self {
            state,
            presenter: Presenter::new(config.links.clone()),
            default_min_score: config.search.default_min_score,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    fn searcher(&self) -> Result<&CatalogSearcher> {
        match &self.state {
            ServiceState::Ready(searcher) => Ok(searcher),
            ServiceState::NotReady(reason) => Err(FinderError::NotReady(reason.clone())),
        }
    }

    #[must_use]
    pub fn health(&self) -> HealthReport {
        match &self.state {
            ServiceState::Ready(searcher) => HealthReport {
                status: "healthy".to_owned(),
                version: VERSION.to_owned(),
                search_engine_loaded: true,
                total_documents: searcher.catalog().len(),
                reason: None,
            },
            ServiceState::NotReady(reason) => HealthReport {
                status: "unhealthy".to_owned(),
                version: VERSION.to_owned(),
                search_engine_loaded: false,
                total_documents: 0,
                reason: Some(reason.clone()),
            },
        }
    }

    /// # Errors
    ///
    /// Returns [`FinderError::NotReady`] if the catalog is not loaded.
    pub fn stats(&self) -> Result<StatsReport> {
        let catalog = self.searcher()?.catalog();
        let stats = catalog.stats();

        let mut categories = BTreeMap::new();
        for entry in catalog.entries() {
            *categories.entry(classify(entry)).or_insert(0) += 1;
        }

        Ok(StatsReport {
            total_documents: stats.total_documents,
            sources: stats.by_source,
            categories,
            index_dimension: stats.index_dimension,
        })
    }

    /// # Errors
    ///
    /// Returns [`FinderError::NotReady`] if the catalog is not loaded.
    pub fn categories(&self) -> Result<CategoriesReport> {
        let stats = self.searcher()?.catalog().stats();
        Ok(CategoriesReport {
            categories: stats.by_source.keys().cloned().collect(),
            category_counts: stats.by_source,
            description: "Available search categories in the system".to_owned(),
        })
    }

    /// Run a search and present the results.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NotReady`] if the catalog is not loaded,
    /// [`FinderError::Search`] for an invalid request or a backend failure.
    pub async fn search(&self, params: SearchParams) -> Result<SearchResponse> {
        let searcher = self.searcher()?;
        let request = params.into_request(self.default_min_score);

        let started = Instant::now();
        let ranked = searcher.search(&request).await?;
        let results = self.presenter.present_all(&ranked);
        let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            results = results.len(),
            execution_time_ms,
            "search completed"
        );

        Ok(SearchResponse {
            query: request.query,
            total_results: results.len(),
            detected_category: "all".to_owned(),
            execution_time_ms,
            results,
        })
    }
}
