//! # Policy Compliance Dashboard
//!
//! HTTP API behind the Azure Policy compliance dashboard.
//!
//! ## Overview
//!
//! The service provides:
//!
//! 1. **Data-source settings** - One or more Azure data sources, each referencing Key Vault secrets by name
//! 2. **Settings form** - Draft editing of the settings with per-field validation before save
//! 3. **Compliance views** - Summary cards, per-initiative distribution, recent activity, filters and trends
//! 4. **Remediation advisor** - Generated remediation steps and exception requests for non-compliant policies
//!
//! ## Features
//!
//! - **Tagged authentication variants**: client secret, client certificate or managed identity
//! - **Atomic settings writes**: the settings file is replaced, never partially written
//! - **Prometheus metrics**: Exposes metrics for monitoring and observability
//! - **Health probes**: HTTP endpoints for liveness and readiness checks

use anyhow::{Context, Result};
use policy_compliance_dashboard::{
    compliance::MockComplianceData,
    config::ServerConfig,
    datasource::ConfigurationStore,
    observability::{self, metrics},
    remediation::{ChatCompletionClient, RemediationAdvisor},
    server::{start_server, ServerState},
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider before any TLS client is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = ServerConfig::from_env();
    observability::init_logging(&config)?;

    info!(
        build_timestamp = env!("BUILD_TIMESTAMP"),
        build_datetime = env!("BUILD_DATETIME"),
        build_git_hash = env!("BUILD_GIT_HASH"),
        "Starting Policy Compliance Dashboard"
    );
    info!(config = ?config, "Loaded configuration");

    // Initialize metrics
    metrics::register_metrics()?;

    if config.remediation.api_key.is_none() {
        warn!("REMEDIATION_API_KEY is not set, completion requests are sent without authorization");
    }
    let completion = ChatCompletionClient::new(&config.remediation)
        .context("Failed to create remediation completion client")?;

    let store = ConfigurationStore::file(config.settings_file.clone());
    let port = config.http_port;
    let state = Arc::new(
        ServerState::new(
            config,
            store,
            Arc::new(MockComplianceData::new()),
            RemediationAdvisor::new(Arc::new(completion)),
        )
        .await,
    );

    start_server(port, state).await
}
