//! Snapshot loading through to presented search responses.

use catalog_finder::config::FinderConfig;
use catalog_finder::service::ServiceState;
use catalog_finder::snapshot::SnapshotPaths;
use catalog_finder::{CatalogService, FinderError, SearchParams};
use catalog_search::Category;

use crate::helpers::sample_snapshot;

fn params(query: &str, k: usize) -> SearchParams {
    SearchParams {
        k: Some(k),
        min_score: Some(0.0),
        ..SearchParams::new(query)
    }
}

#[test]
fn loads_written_snapshot() {
    let (config, _dir) = sample_snapshot();
    let service = CatalogService::load(&config);
    assert!(service.is_ready());

    let health = service.health();
    assert_eq!(health.status, "healthy");
    assert!(health.search_engine_loaded);
    assert_eq!(health.total_documents, 5);
    assert!(health.reason.is_none());
}

#[test]
fn stats_count_sources_and_categories() {
    let (config, _dir) = sample_snapshot();
    let service = CatalogService::load(&config);
    let stats = service.stats().expect("stats");

    assert_eq!(stats.total_documents, 5);
    assert_eq!(stats.sources.get("case-studies"), Some(&2));
    assert_eq!(stats.categories.get(&Category::CaseStudies), Some(&2));
    assert_eq!(stats.categories.get(&Category::Tools), Some(&1));
    assert_eq!(stats.categories.get(&Category::Courses), Some(&1));
    assert_eq!(stats.categories.get(&Category::ServiceProviders), Some(&1));
    assert!(stats.index_dimension > 0);

    let categories = service.categories().expect("categories");
    assert_eq!(categories.categories.len(), 4);
    assert_eq!(categories.category_counts.get("Cleaned Sheet"), Some(&1));
}

#[tokio::test]
async fn tool_results_link_to_tool_pages() {
    let (config, _dir) = sample_snapshot();
    let service = CatalogService::load(&config);

    let response = service.search(params("crm", 5)).await.expect("search");
    assert_eq!(response.query, "crm");
    assert_eq!(response.detected_category, "all");
    assert_eq!(response.total_results, response.results.len());
    assert!(response.execution_time_ms >= 0.0);

    let tool = response
        .results
        .iter()
        .find(|r| r.category == Category::Tools)
        .expect("tool result");
    assert_eq!(tool.title, "Salesforce");
    assert_eq!(tool.category_type, "TOOL");
    assert_eq!(tool.url, "https://dt4si.com/tools/salesforce");
    assert_eq!(tool.slug, "salesforce");
    assert_eq!(tool.source, "Cleaned Sheet");
}

#[tokio::test]
async fn case_study_query_promotes_case_studies() {
    let (config, _dir) = sample_snapshot();
    let service = CatalogService::load(&config);

    let response = service
        .search(params("armman case study", 3))
        .await
        .expect("search");

    assert_eq!(response.results.len(), 3);
    let ranks: Vec<usize> = response.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    let first = &response.results[0];
    assert_eq!(first.category_type, "CASE STUDY");
    assert!(first.boosted);
    assert_eq!(first.title, "Armman maternal health outreach");
    assert_eq!(first.url, "https://dt4si.com/case-studies/armman");
    assert_eq!(first.slug, "armman");
    assert_eq!(response.results[1].category, Category::CaseStudies);
}

#[tokio::test]
async fn configured_threshold_applies_when_omitted() {
    let (mut config, _dir) = sample_snapshot();
    config.search.default_min_score = 1.0;
    let service = CatalogService::load(&config);

    let response = service
        .search(SearchParams::new("crm"))
        .await
        .expect("search");
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn invalid_query_is_a_search_error() {
    let (config, _dir) = sample_snapshot();
    let service = CatalogService::load(&config);

    let err = service.search(SearchParams::new("x")).await.unwrap_err();
    assert!(matches!(err, FinderError::Search(_)));
}

#[test]
fn corrupt_metadata_leaves_service_not_ready() {
    let (config, _dir) = sample_snapshot();
    let paths = SnapshotPaths::resolve(&config.snapshot);
    std::fs::write(&paths.metadata, "{").expect("corrupt metadata");

    let service = CatalogService::load(&config);
    match service.state() {
        ServiceState::NotReady(reason) => assert!(reason.contains("snapshot")),
        ServiceState::Ready(_) => panic!("corrupt snapshot must not load"),
    }
}

#[test]
fn config_file_round_trip_points_at_snapshot() {
    let (config, dir) = sample_snapshot();
    let path = dir.path().join("config.toml");
    config.save_to_file(&path).expect("save config");

    let loaded = FinderConfig::from_file(&path).expect("load config");
    assert_eq!(loaded.snapshot.dir, config.snapshot.dir);
    assert!(CatalogService::load(&loaded).is_ready());
}
