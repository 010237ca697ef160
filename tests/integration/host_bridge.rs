//! Host command round-trips over the channel and the line bridge.

use std::sync::Arc;

use catalog_finder::CatalogService;
use catalog_finder::host::channel::command_channel;
use catalog_finder::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use catalog_finder::host::stdio::run_bridge;

use crate::helpers::sample_snapshot;

fn ready_service() -> (Arc<CatalogService>, tempfile::TempDir) {
    let (config, dir) = sample_snapshot();
    let service = CatalogService::load(&config);
    assert!(service.is_ready());
    (Arc::new(service), dir)
}

#[tokio::test]
async fn search_command_returns_presented_results() {
    let (service, _dir) = ready_service();
    let (client, server) = command_channel(8, service);
    let server_handle = tokio::spawn(server.run());

    let response = client
        .send(CommandEnvelope::new(
            "search-1",
            CommandName::CatalogSearch,
            serde_json::json!({"query": "crm", "k": 2, "min_score": 0.0}),
        ))
        .await
        .expect("send");

    assert!(response.ok, "error: {:?}", response.error);
    assert_eq!(response.request_id, "search-1");
    assert_eq!(response.payload["query"], "crm");
    let results = response.payload["results"].as_array().expect("results");
    assert!(!results.is_empty() && results.len() <= 2);
    assert_eq!(results[0]["rank"], 1);

    drop(client);
    server_handle.await.expect("server exits");
}

#[tokio::test]
async fn stats_and_health_commands_report_catalog() {
    let (service, _dir) = ready_service();
    let (client, server) = command_channel(8, service);
    let server_handle = tokio::spawn(server.run());

    let health = client
        .send(CommandEnvelope::new("h", CommandName::CatalogHealth, serde_json::json!({})))
        .await
        .expect("health");
    assert_eq!(health.payload["status"], "healthy");
    assert_eq!(health.payload["total_documents"], 5);

    let stats = client
        .send(CommandEnvelope::new("s", CommandName::CatalogStats, serde_json::json!({})))
        .await
        .expect("stats");
    assert_eq!(stats.payload["categories"]["case-studies"], 2);

    drop(client);
    server_handle.await.expect("server exits");
}

#[tokio::test]
async fn bad_search_payload_is_error_response() {
    let (service, _dir) = ready_service();
    let (client, server) = command_channel(8, service);
    let server_handle = tokio::spawn(server.run());

    let response = client
        .send(CommandEnvelope::new(
            "bad",
            CommandName::CatalogSearch,
            serde_json::json!({"k": 3}),
        ))
        .await
        .expect("send");
    assert!(!response.ok);
    assert_eq!(response.payload, serde_json::Value::Null);

    drop(client);
    server_handle.await.expect("server exits");
}

#[tokio::test]
async fn line_bridge_serves_a_session() {
    let (service, _dir) = ready_service();
    let input = concat!(
        r#"{"v":1,"request_id":"1","command":"host.version"}"#,
        "\n",
        r#"{"v":1,"request_id":"2","command":"catalog.search","payload":{"query":"armman case study","min_score":0.0}}"#,
        "\n",
        r#"{"v":1,"request_id":"3","command":"runtime.stop"}"#,
        "\n",
    );

    let mut output = Vec::new();
    run_bridge(service, input.as_bytes(), &mut output)
        .await
        .expect("bridge");

    let responses: Vec<ResponseEnvelope> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|l| serde_json::from_str(l).expect("response"))
        .collect();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.ok));
    assert_eq!(
        responses[1].payload["results"][0]["category_type"],
        "CASE STUDY"
    );
}
