//! Host command channel and router.
//!
//! Clients send validated [`CommandEnvelope`]s over an mpsc channel; a
//! single server task routes each one to the [`CatalogService`] and answers
//! through a oneshot. Failures become error envelopes, never panics.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::{FinderError, Result};
use crate::host::contract::{CONTRACT_VERSION, CommandEnvelope, CommandName, ResponseEnvelope};
use crate::service::{CatalogService, SearchParams, VERSION};

struct HostCommandRequest {
    envelope: CommandEnvelope,
    response_tx: oneshot::Sender<ResponseEnvelope>,
}

#[derive(Clone)]
pub struct HostCommandClient {
    request_tx: mpsc::Sender<HostCommandRequest>,
}

impl HostCommandClient {
    /// Send a command and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Channel`] if the envelope is invalid or the
    /// server is gone.
    pub async fn send(&self, envelope: CommandEnvelope) -> Result<ResponseEnvelope> {
        envelope.validate().map_err(|e| {
            FinderError::Channel(format!(
                "invalid host command envelope {}: {}",
                envelope.request_id, e
            ))
        })?;

        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(HostCommandRequest {
                envelope,
                response_tx,
            })
            .await
            .map_err(|e| FinderError::Channel(format!("failed to send host command request: {e}")))?;

        response_rx
            .await
            .map_err(|e| FinderError::Channel(format!("host command response dropped: {e}")))
    }
}

pub struct HostCommandServer {
    request_rx: mpsc::Receiver<HostCommandRequest>,
    service: Arc<CatalogService>,
}

#[must_use]
pub fn command_channel(
    request_capacity: usize,
    service: Arc<CatalogService>,
) -> (HostCommandClient, HostCommandServer) {
    let (request_tx, request_rx) = mpsc::channel(request_capacity.max(1));
    (
        HostCommandClient { request_tx },
        HostCommandServer {
            request_rx,
            service,
        },
    )
}

impl HostCommandServer {
    /// Serve requests until every client is dropped.
    ///
    /// Each request is routed on its own task, so a slow search does not
    /// hold up pings or health checks.
    pub async fn run(mut self) {
        while let Some(request) = self.request_rx.recv().await {
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                let response = route(&service, &request.envelope).await;
                let _ = request.response_tx.send(response);
            });
        }
    }
}

/// Route a command envelope to the service and build its response.
pub async fn route(service: &CatalogService, envelope: &CommandEnvelope) -> ResponseEnvelope {
    let request_id = envelope.request_id.clone();
    match dispatch(service, envelope).await {
        Ok(payload) => ResponseEnvelope::ok(request_id, payload),
        Err(e) => {
            tracing::warn!(
                command = envelope.command.as_str(),
                request_id = %request_id,
                error = %e,
                "host command failed"
            );
            ResponseEnvelope::error(request_id, e.to_string())
        }
    }
}

async fn dispatch(service: &CatalogService, envelope: &CommandEnvelope) -> Result<serde_json::Value> {
    match envelope.command {
        CommandName::HostPing => Ok(serde_json::json!({"pong": true})),
        CommandName::HostVersion => Ok(serde_json::json!({
            "contract_version": CONTRACT_VERSION,
            "version": VERSION,
        })),
        CommandName::CatalogHealth => to_payload(&service.health()),
        CommandName::CatalogStats => to_payload(&service.stats()?),
        CommandName::CatalogCategories => to_payload(&service.categories()?),
        CommandName::CatalogSearch => {
            let params = parse_search_params(&envelope.payload)?;
            to_payload(&service.search(params).await?)
        }
        CommandName::RuntimeStop => Ok(serde_json::json!({"accepted": true})),
    }
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| FinderError::Channel(format!("failed to serialize response payload: {e}")))
}

fn parse_search_params(payload: &serde_json::Value) -> Result<SearchParams> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        FinderError::Search(catalog_search::SearchError::InvalidQuery(format!(
            "catalog.search payload must be {{query, k?, min_score?}}: {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::FinderConfig;

    fn not_ready() -> Arc<CatalogService> {
        Arc::new(CatalogService::not_ready("no snapshot", &FinderConfig::default()))
    }

    fn envelope(command: CommandName, payload: serde_json::Value) -> CommandEnvelope {
        CommandEnvelope::new("req-1", command, payload)
    }

    #[tokio::test]
    async fn ping_responds_pong() {
        let resp = route(&not_ready(), &envelope(CommandName::HostPing, serde_json::json!({}))).await;
        assert!(resp.ok);
        assert_eq!(resp.payload["pong"], true);
        assert_eq!(resp.request_id, "req-1");
    }

    #[tokio::test]
    async fn version_reports_contract() {
        let resp = route(&not_ready(), &envelope(CommandName::HostVersion, serde_json::json!({}))).await;
        assert!(resp.ok);
        assert_eq!(resp.payload["contract_version"], CONTRACT_VERSION);
    }

    #[tokio::test]
    async fn health_works_when_not_ready() {
        let resp = route(&not_ready(), &envelope(CommandName::CatalogHealth, serde_json::json!({}))).await;
        assert!(resp.ok);
        assert_eq!(resp.payload["status"], "unhealthy");
        assert_eq!(resp.payload["reason"], "no snapshot");
    }

    #[tokio::test]
    async fn search_when_not_ready_is_error_envelope() {
        let resp = route(
            &not_ready(),
            &envelope(CommandName::CatalogSearch, serde_json::json!({"query": "crm"})),
        )
        .await;
        assert!(!resp.ok);
        assert!(resp.error.unwrap_or_default().contains("not ready"));
    }

    #[test]
    fn search_payload_requires_query() {
        assert!(parse_search_params(&serde_json::json!({"k": 3})).is_err());
        let params = parse_search_params(&serde_json::json!({"query": "crm", "k": 3})).expect("parse");
        assert_eq!(params.k, Some(3));
    }

    #[tokio::test]
    async fn client_rejects_invalid_envelope() {
        let (client, server) = command_channel(4, not_ready());
        let server_handle = tokio::spawn(server.run());

        let mut bad = envelope(CommandName::HostPing, serde_json::json!({}));
        bad.v = 9;
        assert!(matches!(client.send(bad).await, Err(FinderError::Channel(_))));

        let ok = client
            .send(envelope(CommandName::HostPing, serde_json::json!({})))
            .await
            .expect("send");
        assert!(ok.ok);

        drop(client);
        server_handle.await.expect("server exits when clients drop");
    }
}
