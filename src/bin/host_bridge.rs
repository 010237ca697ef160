//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! This binary loads the catalog snapshot, then reads `CommandEnvelope`
//! messages as newline-delimited JSON from stdin and writes one
//! `ResponseEnvelope` per line to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::path::PathBuf;
use std::sync::Arc;

use catalog_finder::host::stdio::run_stdio_bridge;
use catalog_finder::{CatalogService, FinderConfig};

/// Environment variable naming an explicit config file.
const CONFIG_ENV: &str = "CATALOG_FINDER_CONFIG";

fn load_config() -> FinderConfig {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(FinderConfig::default_config_path);

    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file; using defaults");
        return FinderConfig::default();
    }

    match FinderConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config file; using defaults");
            FinderConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout is reserved for the JSON protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("catalog-host starting");

    let config = load_config();
    let service = tokio::task::spawn_blocking(move || CatalogService::load(&config))
        .await
        .map_err(|e| anyhow::anyhow!("catalog load task failed: {e}"))?;

    if service.is_ready() {
        tracing::info!(documents = service.health().total_documents, "catalog loaded");
    } else {
        tracing::warn!("catalog not loaded; search commands will report not ready");
    }

    run_stdio_bridge(Arc::new(service)).await.map_err(|e| {
        tracing::error!(error = %e, "catalog-host exited with error");
        anyhow::anyhow!("catalog-host failed: {e}")
    })?;

    tracing::info!("catalog-host shut down cleanly");
    Ok(())
}
