//! # Metrics
//!
//! Prometheus metrics for monitoring the dashboard.
//!
//! ## Metrics Exposed
//!
//! - `policy_dashboard_settings_loads_total` - Settings loads by outcome
//! - `policy_dashboard_settings_saves_total` - Settings saves by outcome
//! - `policy_dashboard_configurations` - Number of data-source configurations last loaded or saved
//! - `policy_dashboard_remediation_requests_total` - Remediation advice requests by outcome
//! - `policy_dashboard_remediation_duration_seconds` - Duration of completion service calls
//! - `policy_dashboard_view_requests_total` - Dashboard view requests by view
//! - `policy_dashboard_form_mutations_total` - Settings form edits by action

use anyhow::Result;
use prometheus::{Histogram, IntCounterVec, IntGauge, Registry};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static SETTINGS_LOADS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "policy_dashboard_settings_loads_total",
            "Total number of settings loads by outcome (loaded, missing, invalid, empty, read_error)",
        ),
        &["outcome"],
    )
    .expect("Failed to create SETTINGS_LOADS_TOTAL metric - this should never happen")
});

static SETTINGS_SAVES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "policy_dashboard_settings_saves_total",
            "Total number of settings saves by outcome (saved, invalid, error)",
        ),
        &["outcome"],
    )
    .expect("Failed to create SETTINGS_SAVES_TOTAL metric - this should never happen")
});

static CONFIGURATIONS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "policy_dashboard_configurations",
        "Number of data-source configurations last loaded or saved",
    )
    .expect("Failed to create CONFIGURATIONS metric - this should never happen")
});

static REMEDIATION_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "policy_dashboard_remediation_requests_total",
            "Total number of remediation advice requests by outcome (success, invalid, failed)",
        ),
        &["outcome"],
    )
    .expect("Failed to create REMEDIATION_REQUESTS_TOTAL metric - this should never happen")
});

static REMEDIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "policy_dashboard_remediation_duration_seconds",
            "Duration of remediation completion calls in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
    )
    .expect("Failed to create REMEDIATION_DURATION metric - this should never happen")
});

static VIEW_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "policy_dashboard_view_requests_total",
            "Total number of dashboard view requests by view",
        ),
        &["view"],
    )
    .expect("Failed to create VIEW_REQUESTS_TOTAL metric - this should never happen")
});

static FORM_MUTATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "policy_dashboard_form_mutations_total",
            "Total number of settings form edits by action (add, remove, switch, edit, reload)",
        ),
        &["action"],
    )
    .expect("Failed to create FORM_MUTATIONS_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(SETTINGS_LOADS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SETTINGS_SAVES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CONFIGURATIONS.clone()))?;
    REGISTRY.register(Box::new(REMEDIATION_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REMEDIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(VIEW_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(FORM_MUTATIONS_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_settings_loads(outcome: &str) {
    SETTINGS_LOADS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn increment_settings_saves(outcome: &str) {
    SETTINGS_SAVES_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn set_configurations(count: usize) {
    CONFIGURATIONS.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn increment_remediation_requests(outcome: &str) {
    REMEDIATION_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn observe_remediation_duration(duration: f64) {
    REMEDIATION_DURATION.observe(duration);
}

pub fn increment_view_requests(view: &str) {
    VIEW_REQUESTS_TOTAL.with_label_values(&[view]).inc();
}

pub fn increment_form_mutations(action: &str) {
    FORM_MUTATIONS_TOTAL.with_label_values(&[action]).inc();
}
