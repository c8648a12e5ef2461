//! # Server Configuration
//!
//! Process-level settings loaded from environment variables.

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_HIGHLIGHTS_LIMIT, DEFAULT_HTTP_PORT, DEFAULT_REMEDIATION_API_URL,
    DEFAULT_REMEDIATION_MODEL, DEFAULT_REMEDIATION_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Clone)]
pub struct ServerConfig {
    /// HTTP port for the dashboard API, metrics and probes
    pub http_port: u16,
    /// Path of the data-source settings file
    /// Relative paths are resolved against the process working directory
    pub settings_file: PathBuf,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable color in text format logs
    pub log_enable_color: bool,
    /// Remediation completion settings
    pub remediation: RemediationServiceConfig,
    /// Rows returned by the recent activity table when no limit is requested
    pub highlights_limit: usize,
}

/// Connection settings for the OpenAI-compatible completion service
#[derive(Clone)]
pub struct RemediationServiceConfig {
    /// Chat completion endpoint URL
    pub api_url: String,
    /// Model name sent with each request
    pub model: String,
    /// Bearer token; requests are sent without authorization when unset
    pub api_key: Option<String>,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RemediationServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemediationServiceConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_port", &self.http_port)
            .field("settings_file", &self.settings_file)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("remediation", &self.remediation)
            .finish_non_exhaustive()
    }
}

impl Default for RemediationServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_REMEDIATION_API_URL.to_string(),
            model: DEFAULT_REMEDIATION_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_REMEDIATION_TIMEOUT_SECS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            settings_file: PathBuf::from(CONFIG_FILE_NAME),
            log_level: "INFO".to_string(),
            log_format: "text".to_string(),
            log_enable_color: false,
            remediation: RemediationServiceConfig::default(),
            highlights_limit: DEFAULT_HIGHLIGHTS_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: env_var_or_default("HTTP_PORT", DEFAULT_HTTP_PORT),
            settings_file: PathBuf::from(env_var_or_default_str("SETTINGS_FILE", CONFIG_FILE_NAME)),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "text"),
            log_enable_color: env_var_or_default_bool("LOG_ENABLE_COLOR", false),
            remediation: RemediationServiceConfig {
                api_url: env_var_or_default_str("REMEDIATION_API_URL", DEFAULT_REMEDIATION_API_URL),
                model: env_var_or_default_str("REMEDIATION_MODEL", DEFAULT_REMEDIATION_MODEL),
                api_key: std::env::var("REMEDIATION_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                timeout_secs: env_var_or_default(
                    "REMEDIATION_TIMEOUT_SECS",
                    DEFAULT_REMEDIATION_TIMEOUT_SECS,
                ),
            },
            highlights_limit: env_var_or_default("HIGHLIGHTS_LIMIT", DEFAULT_HIGHLIGHTS_LIMIT),
        }
    }
}

impl RemediationServiceConfig {
    /// Get per-request timeout duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
