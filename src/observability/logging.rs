//! # Logging
//!
//! Tracing subscriber setup. `RUST_LOG` takes precedence over the configured
//! `LOG_LEVEL`; `LOG_FORMAT=json` switches to structured JSON lines.

use crate::config::ServerConfig;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a configured level, e.g. `policy_compliance_dashboard=info`
pub fn default_directive(log_level: &str) -> String {
    let level = match log_level.trim().to_ascii_lowercase().as_str() {
        level @ ("error" | "warn" | "info" | "debug" | "trace") => level.to_string(),
        _ => "info".to_string(),
    };
    format!("policy_compliance_dashboard={level},tower_http={level}")
}

/// Install the global tracing subscriber
///
/// # Errors
/// Fails when a global subscriber is already installed
pub fn init_logging(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_format.eq_ignore_ascii_case("json") {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize JSON logging: {e}"))
    } else {
        builder
            .with_ansi(config.log_enable_color)
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
    }
}
