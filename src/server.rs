//! # HTTP Server
//!
//! HTTP server for the dashboard API, metrics and health checks.
//!
//! Provides endpoints:
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - Liveness probe (always returns 200)
//! - `/readyz` - Readiness probe (returns 200 once state is initialized)
//! - `/api/settings/**` - Data-source settings and the draft settings form
//! - `/api/dashboard/**`, `/api/trends` - Compliance views
//! - `/api/remediation` - Remediation advisor
//!
//! The server runs on port 8080 by default (configurable via `HTTP_PORT` environment variable).

mod dashboard;
mod remediation;
mod settings;

use crate::compliance::ComplianceDataProvider;
use crate::config::ServerConfig;
use crate::datasource::{ConfigurationStore, FieldError, SettingsForm, ValidationErrors};
use crate::remediation::RemediationAdvisor;
use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct ServerState {
    pub config: ServerConfig,
    pub store: ConfigurationStore,
    /// Draft settings form shared by every request (single operator)
    pub form: Mutex<SettingsForm>,
    pub compliance: Arc<dyn ComplianceDataProvider>,
    pub advisor: RemediationAdvisor,
    pub is_ready: Arc<AtomicBool>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("is_ready", &self.is_ready.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Build state with the draft form seeded from the store
    pub async fn new(
        config: ServerConfig,
        store: ConfigurationStore,
        compliance: Arc<dyn ComplianceDataProvider>,
        advisor: RemediationAdvisor,
    ) -> Self {
        let form = SettingsForm::from_set(store.load().await);
        Self {
            config,
            store,
            form: Mutex::new(form),
            compliance,
            advisor,
            is_ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Error body returned by API handlers
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// API error mapped onto an HTTP status
#[derive(Debug)]
pub(crate) enum ApiError {
    Validation(ValidationErrors),
    Unprocessable(String),
    Conflict(String),
    NotFound(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: errors.to_string(),
                    errors: errors.into_vec(),
                },
            ),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message.into()),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message.into()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.into()),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message.into()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<String> for ErrorBody {
    fn from(error: String) -> Self {
        Self {
            error,
            errors: Vec::new(),
        }
    }
}

/// Full application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route("/api/settings/schema", get(settings::get_schema))
        .route("/api/settings/form", get(settings::get_form))
        .route("/api/settings/form/reload", post(settings::reload_form))
        .route("/api/settings/form/entries", post(settings::add_entry))
        .route(
            "/api/settings/form/entries/{index}",
            axum::routing::delete(settings::remove_entry).patch(settings::patch_entry),
        )
        .route(
            "/api/settings/form/entries/{index}/auth-method",
            put(settings::switch_auth_method),
        )
        .route("/api/settings/form/submit", post(settings::submit_form))
        .route("/api/dashboard/summary", get(dashboard::summary))
        .route("/api/dashboard/distribution", get(dashboard::distribution))
        .route("/api/dashboard/highlights", get(dashboard::highlights))
        .route("/api/dashboard/items", get(dashboard::items))
        .route("/api/dashboard/catalog", get(dashboard::catalog))
        .route("/api/trends", get(dashboard::trends))
        .route("/api/remediation", post(remediation::advise))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the router until the process exits
///
/// # Errors
/// Fails when the port cannot be bound or the server stops with an I/O error
pub async fn start_server(port: u16, state: Arc<ServerState>) -> Result<(), anyhow::Error> {
    let app = router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

    info!("HTTP server listening on {}", addr);
    state.is_ready.store(true, Ordering::Relaxed);

    axum::serve(listener, app)
        .await
        .context("HTTP server stopped unexpectedly")?;

    Ok(())
}

fn gather() -> Vec<prometheus::proto::MetricFamily> {
    use crate::observability::metrics::REGISTRY;
    REGISTRY.gather()
}

async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        buffer,
    )
}

async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn readyz_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    if state.is_ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
