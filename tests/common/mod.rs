//! Common test utilities
//!
//! Shared fixtures for the integration tests: rustls setup, sample
//! configurations, and a fully wired server state backed by a temp settings file.

#![allow(dead_code, reason = "Each test crate uses a different subset of helpers")]

use async_trait::async_trait;
use policy_compliance_dashboard::compliance::MockComplianceData;
use policy_compliance_dashboard::config::ServerConfig;
use policy_compliance_dashboard::datasource::ConfigurationStore;
use policy_compliance_dashboard::remediation::{
    CompletionError, CompletionService, RemediationAdvice, RemediationAdvisor, RemediationRequest,
};
use policy_compliance_dashboard::server::ServerState;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Once};

static RUSTLS_INIT: Once = Once::new();

pub const SUBSCRIPTION_ID: &str = "12345678-1234-1234-1234-123456789012";
pub const THUMBPRINT: &str = "0123456789abcdef0123456789abcdef01234567";

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

pub fn client_secret_config() -> Value {
    json!({
        "configName": "Production",
        "keyVaultUri": "https://prod-vault.vault.azure.net/",
        "subscriptionId": SUBSCRIPTION_ID,
        "apiEndpoint": "https://management.azure.com",
        "apiAuthMethod": "clientSecretInKv",
        "tenantIdSecretName": "prod-tenant-id",
        "clientIdSecretName": "prod-client-id",
        "clientSecretName": "prod-client-secret"
    })
}

pub fn client_certificate_config() -> Value {
    json!({
        "configName": "Staging",
        "keyVaultUri": "https://staging-vault.vault.azure.net/",
        "subscriptionId": "87654321-4321-4321-4321-210987654321",
        "apiAuthMethod": "clientCertificateInKv",
        "tenantIdSecretName": "staging-tenant-id",
        "clientIdSecretName": "staging-client-id",
        "certificateThumbprintSecretName": THUMBPRINT
    })
}

pub fn managed_identity_config() -> Value {
    json!({
        "keyVaultUri": "https://shared-vault.vault.azure.net/",
        "subscriptionId": SUBSCRIPTION_ID,
        "apiEndpoint": "",
        "apiAuthMethod": "managedIdentityInKv",
        "managedIdentityClientIdSecretName": "uami-client-id"
    })
}

/// Completion service returning canned advice, or failing when `fail` is set
#[derive(Debug, Default)]
pub struct CannedCompletion {
    pub fail: bool,
}

#[async_trait]
impl CompletionService for CannedCompletion {
    async fn generate(
        &self,
        _request: &RemediationRequest,
    ) -> Result<RemediationAdvice, CompletionError> {
        if self.fail {
            return Err(CompletionError::MissingContent);
        }
        Ok(RemediationAdvice {
            remediation_steps: "1. Disable public network access on the storage account.".to_string(),
            exception_request: "Request a time-boxed exception for the analytics pipeline.".to_string(),
        })
    }
}

/// Settings file inside a fresh temp directory; the directory lives as long as the guard
pub struct TempSettings {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl TempSettings {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("azure-data-sources.config.json");
        Self { dir, path }
    }

    pub fn store(&self) -> ConfigurationStore {
        ConfigurationStore::file(self.path.clone())
    }

    pub fn read_json(&self) -> Value {
        let contents = std::fs::read_to_string(&self.path).expect("settings file exists");
        serde_json::from_str(&contents).expect("settings file is JSON")
    }
}

/// Server state wired to a temp settings file, sample data and a canned advisor
pub async fn test_state(settings: &TempSettings, completion_fails: bool) -> Arc<ServerState> {
    let config = ServerConfig {
        settings_file: settings.path.clone(),
        ..ServerConfig::default()
    };
    let advisor = RemediationAdvisor::new(Arc::new(CannedCompletion {
        fail: completion_fails,
    }));
    Arc::new(
        ServerState::new(
            config,
            settings.store(),
            Arc::new(MockComplianceData::new()),
            advisor,
        )
        .await,
    )
}
