//! # Constants
//!
//! Shared constants used throughout the dashboard.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default HTTP server port for the dashboard API, metrics and health probes
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// File name of the persisted data-source settings document
/// Resolved relative to the process working directory unless overridden
pub const CONFIG_FILE_NAME: &str = "azure-data-sources.config.json";

/// Public Azure Resource Manager endpoint used as the default `apiEndpoint`
pub const DEFAULT_API_ENDPOINT: &str = "https://management.azure.com";

/// Label used in charts for compliance items without a policy initiative
pub const UNASSIGNED_INITIATIVE: &str = "Unassigned";

/// Default number of rows in the recent activity table
pub const DEFAULT_HIGHLIGHTS_LIMIT: usize = 7;

/// Minimum length (characters) of remediation advisor inputs
pub const REMEDIATION_INPUT_MIN_CHARS: usize = 10;

/// Maximum length (characters) of remediation advisor inputs
pub const REMEDIATION_INPUT_MAX_CHARS: usize = 5000;

/// Default OpenAI-compatible chat completion endpoint for the remediation advisor
pub const DEFAULT_REMEDIATION_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model requested from the completion service
pub const DEFAULT_REMEDIATION_MODEL: &str = "gpt-4o-mini";

/// Default timeout for a single completion request (seconds)
pub const DEFAULT_REMEDIATION_TIMEOUT_SECS: u64 = 60;

/// User-visible notice returned when remediation generation fails for any reason
pub const REMEDIATION_FAILURE_NOTICE: &str =
    "Failed to generate remediation steps. Please try again.";
