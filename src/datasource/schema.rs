//! # Data Source Configuration Schema
//!
//! Shape and validation rules of a data-source configuration.
//!
//! A configuration is a set of common fields (Key Vault URI, subscription ID,
//! optional API endpoint and display name) plus exactly one authentication
//! variant selected by the `apiAuthMethod` discriminant:
//!
//! | `apiAuthMethod`         | Variant fields                                                              |
//! |-------------------------|-----------------------------------------------------------------------------|
//! | `clientSecretInKv`      | `tenantIdSecretName`, `clientIdSecretName`, `clientSecretName`              |
//! | `clientCertificateInKv` | `tenantIdSecretName`, `clientIdSecretName`, `certificateThumbprintSecretName` |
//! | `managedIdentityInKv`   | `managedIdentityClientIdSecretName` (optional)                              |
//!
//! Every variant field holds the *name* of a Key Vault secret, never a secret value.
//!
//! ## Example
//!
//! ```json
//! {
//!   "configName": "Production",
//!   "keyVaultUri": "https://prod-vault.vault.azure.net/",
//!   "subscriptionId": "12345678-1234-1234-1234-123456789012",
//!   "apiEndpoint": "https://management.azure.com",
//!   "apiAuthMethod": "clientSecretInKv",
//!   "tenantIdSecretName": "tenant-id",
//!   "clientIdSecretName": "client-id",
//!   "clientSecretName": "client-secret"
//! }
//! ```

use super::errors::{field_path, ValidationErrors};
use super::validation::{is_absolute_uri, is_certificate_thumbprint, is_uuid};
use crate::constants::DEFAULT_API_ENDPOINT;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One data-source entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
    /// User-friendly name for this configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    /// Azure Key Vault URI holding the credential secrets
    pub key_vault_uri: String,
    /// Azure subscription ID (UUID)
    pub subscription_id: String,
    /// Azure management API endpoint; empty means the public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    /// Authentication method and its secret references
    #[serde(flatten)]
    pub auth: ApiAuthMethod,
}

/// Authentication variant, tagged by `apiAuthMethod`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", tag = "apiAuthMethod")]
pub enum ApiAuthMethod {
    /// Service principal with a client secret stored in Key Vault
    ClientSecretInKv(ClientSecretAuth),
    /// Service principal with a client certificate stored in Key Vault
    ClientCertificateInKv(ClientCertificateAuth),
    /// Azure managed identity, optionally user-assigned
    ManagedIdentityInKv(ManagedIdentityAuth),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretAuth {
    pub tenant_id_secret_name: String,
    pub client_id_secret_name: String,
    pub client_secret_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientCertificateAuth {
    pub tenant_id_secret_name: String,
    pub client_id_secret_name: String,
    pub certificate_thumbprint_secret_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedIdentityAuth {
    /// Secret holding the client ID of a user-assigned identity; empty or
    /// absent for a system-assigned identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_identity_client_id_secret_name: Option<String>,
}

/// Discriminant of [`ApiAuthMethod`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AuthMethodKind {
    ClientSecretInKv,
    ClientCertificateInKv,
    ManagedIdentityInKv,
}

/// Ordered list of configurations, as persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ConfigurationSet {
    pub configurations: Vec<DataSourceConfig>,
}

impl AuthMethodKind {
    pub const ALL: [AuthMethodKind; 3] = [
        AuthMethodKind::ClientSecretInKv,
        AuthMethodKind::ClientCertificateInKv,
        AuthMethodKind::ManagedIdentityInKv,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethodKind::ClientSecretInKv => "clientSecretInKv",
            AuthMethodKind::ClientCertificateInKv => "clientCertificateInKv",
            AuthMethodKind::ManagedIdentityInKv => "managedIdentityInKv",
        }
    }

    /// Parse a discriminant tag as written in JSON
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for AuthMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiAuthMethod {
    #[must_use]
    pub fn kind(&self) -> AuthMethodKind {
        match self {
            ApiAuthMethod::ClientSecretInKv(_) => AuthMethodKind::ClientSecretInKv,
            ApiAuthMethod::ClientCertificateInKv(_) => AuthMethodKind::ClientCertificateInKv,
            ApiAuthMethod::ManagedIdentityInKv(_) => AuthMethodKind::ManagedIdentityInKv,
        }
    }

    /// A variant of `kind` with every field empty
    #[must_use]
    pub fn empty(kind: AuthMethodKind) -> Self {
        match kind {
            AuthMethodKind::ClientSecretInKv => {
                ApiAuthMethod::ClientSecretInKv(ClientSecretAuth::default())
            }
            AuthMethodKind::ClientCertificateInKv => {
                ApiAuthMethod::ClientCertificateInKv(ClientCertificateAuth::default())
            }
            AuthMethodKind::ManagedIdentityInKv => {
                ApiAuthMethod::ManagedIdentityInKv(ManagedIdentityAuth::default())
            }
        }
    }

    fn collect_errors(&self, prefix: &str, errors: &mut ValidationErrors) {
        match self {
            ApiAuthMethod::ClientSecretInKv(auth) => {
                require_non_empty(
                    &auth.tenant_id_secret_name,
                    prefix,
                    "tenantIdSecretName",
                    "Tenant ID Secret Name is required.",
                    errors,
                );
                require_non_empty(
                    &auth.client_id_secret_name,
                    prefix,
                    "clientIdSecretName",
                    "Client ID Secret Name is required.",
                    errors,
                );
                require_non_empty(
                    &auth.client_secret_name,
                    prefix,
                    "clientSecretName",
                    "Client Secret Name is required.",
                    errors,
                );
            }
            ApiAuthMethod::ClientCertificateInKv(auth) => {
                require_non_empty(
                    &auth.tenant_id_secret_name,
                    prefix,
                    "tenantIdSecretName",
                    "Tenant ID Secret Name is required.",
                    errors,
                );
                require_non_empty(
                    &auth.client_id_secret_name,
                    prefix,
                    "clientIdSecretName",
                    "Client ID Secret Name is required.",
                    errors,
                );
                let thumbprint = &auth.certificate_thumbprint_secret_name;
                let path = field_path(prefix, "certificateThumbprintSecretName");
                if thumbprint.is_empty() {
                    errors.push(path, "Certificate Thumbprint Secret Name is required.");
                } else if !is_certificate_thumbprint(thumbprint) {
                    errors.push(
                        path,
                        "Certificate thumbprint must be exactly 40 hexadecimal characters.",
                    );
                }
            }
            // A system-assigned identity needs no secret; empty is allowed
            ApiAuthMethod::ManagedIdentityInKv(_) => {}
        }
    }
}

impl DataSourceConfig {
    /// Fresh entry used for new form rows and as the load fallback
    #[must_use]
    pub fn default_entry() -> Self {
        Self {
            config_name: None,
            key_vault_uri: String::new(),
            subscription_id: String::new(),
            api_endpoint: Some(DEFAULT_API_ENDPOINT.to_string()),
            auth: ApiAuthMethod::empty(AuthMethodKind::ClientSecretInKv),
        }
    }

    /// Validate this entry on its own
    ///
    /// # Errors
    /// Returns every invalid field, one message per field
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect_errors("", &mut errors);
        errors.into_result(())
    }

    pub(crate) fn collect_errors(&self, prefix: &str, errors: &mut ValidationErrors) {
        collect_common_errors(
            self.config_name.as_deref(),
            &self.key_vault_uri,
            &self.subscription_id,
            self.api_endpoint.as_deref(),
            prefix,
            errors,
        );
        self.auth.collect_errors(prefix, errors);
    }
}

impl ConfigurationSet {
    /// A set holding one [`DataSourceConfig::default_entry`]
    #[must_use]
    pub fn with_default_entry() -> Self {
        Self {
            configurations: vec![DataSourceConfig::default_entry()],
        }
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Validate every entry; an empty set is valid
    ///
    /// # Errors
    /// Returns every invalid field with `configurations[i].` path prefixes
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, config) in self.configurations.iter().enumerate() {
            config.collect_errors(&entry_prefix(index), &mut errors);
        }
        errors.into_result(())
    }
}

/// Validate an arbitrary JSON value as a single configuration
///
/// Fields that belong to a different authentication variant than the one named
/// by `apiAuthMethod` are ignored and do not appear in the result.
///
/// # Errors
/// Returns field-scoped errors for every invalid or missing field
pub fn validate_configuration(value: &Value) -> Result<DataSourceConfig, ValidationErrors> {
    validate_configuration_at(value, "")
}

/// Validate an arbitrary JSON value as a `{ "configurations": [...] }` document
///
/// # Errors
/// Returns field-scoped errors, prefixed with `configurations[i]`
pub fn validate_configuration_set(value: &Value) -> Result<ConfigurationSet, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(object) = value.as_object() else {
        errors.push("", "Expected an object with a \"configurations\" list.");
        return Err(errors);
    };
    let Some(items) = object.get("configurations").and_then(Value::as_array) else {
        errors.push("configurations", "Expected a list of configurations.");
        return Err(errors);
    };

    let mut configurations = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match validate_configuration_at(item, &entry_prefix(index)) {
            Ok(config) => configurations.push(config),
            Err(entry_errors) => errors.extend(entry_errors),
        }
    }
    errors.into_result(ConfigurationSet { configurations })
}

fn validate_configuration_at(
    value: &Value,
    prefix: &str,
) -> Result<DataSourceConfig, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some(object) = value.as_object() else {
        errors.push(prefix, "Expected a configuration object.");
        return Err(errors);
    };

    let mut reader = ObjectReader {
        object,
        prefix,
        errors: &mut errors,
    };
    let config_name = reader
        .optional_string("configName")
        .filter(|name| !name.is_empty());
    let key_vault_uri = reader.string("keyVaultUri");
    let subscription_id = reader.string("subscriptionId");
    let api_endpoint = reader.optional_string("apiEndpoint");
    let auth = reader.auth_method().map(|kind| match kind {
        AuthMethodKind::ClientSecretInKv => ApiAuthMethod::ClientSecretInKv(ClientSecretAuth {
            tenant_id_secret_name: reader.string("tenantIdSecretName"),
            client_id_secret_name: reader.string("clientIdSecretName"),
            client_secret_name: reader.string("clientSecretName"),
        }),
        AuthMethodKind::ClientCertificateInKv => {
            ApiAuthMethod::ClientCertificateInKv(ClientCertificateAuth {
                tenant_id_secret_name: reader.string("tenantIdSecretName"),
                client_id_secret_name: reader.string("clientIdSecretName"),
                certificate_thumbprint_secret_name: reader
                    .string("certificateThumbprintSecretName"),
            })
        }
        AuthMethodKind::ManagedIdentityInKv => {
            ApiAuthMethod::ManagedIdentityInKv(ManagedIdentityAuth {
                managed_identity_client_id_secret_name: reader
                    .optional_string("managedIdentityClientIdSecretName"),
            })
        }
    });

    let Some(auth) = auth else {
        // Variant fields cannot be checked without a discriminant
        collect_common_errors(
            config_name.as_deref(),
            &key_vault_uri,
            &subscription_id,
            api_endpoint.as_deref(),
            prefix,
            &mut errors,
        );
        return Err(errors);
    };

    let config = DataSourceConfig {
        config_name,
        key_vault_uri,
        subscription_id,
        api_endpoint,
        auth,
    };
    config.collect_errors(prefix, &mut errors);
    errors.into_result(config)
}

/// Reads typed fields out of a JSON object, recording type errors
struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    prefix: &'a str,
    errors: &'a mut ValidationErrors,
}

impl ObjectReader<'_> {
    /// Missing and null read as empty; the rule checks report them as required
    fn string(&mut self, field: &str) -> String {
        self.optional_string(field).unwrap_or_default()
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.errors
                    .push(field_path(self.prefix, field), "Expected a string.");
                None
            }
        }
    }

    fn auth_method(&mut self) -> Option<AuthMethodKind> {
        let path = field_path(self.prefix, "apiAuthMethod");
        match self.object.get("apiAuthMethod") {
            None | Some(Value::Null) => {
                self.errors.push(path, "Authentication method is required.");
                None
            }
            Some(Value::String(tag)) => {
                let kind = AuthMethodKind::parse(tag);
                if kind.is_none() {
                    self.errors.push(path, invalid_auth_method_message());
                }
                kind
            }
            Some(_) => {
                self.errors.push(path, invalid_auth_method_message());
                None
            }
        }
    }
}

fn invalid_auth_method_message() -> String {
    let expected: Vec<&str> = AuthMethodKind::ALL.iter().map(AuthMethodKind::as_str).collect();
    format!(
        "Invalid authentication method. Expected one of: {}.",
        expected.join(", ")
    )
}

fn collect_common_errors(
    config_name: Option<&str>,
    key_vault_uri: &str,
    subscription_id: &str,
    api_endpoint: Option<&str>,
    prefix: &str,
    errors: &mut ValidationErrors,
) {
    if config_name.is_some_and(str::is_empty) {
        errors.push(
            field_path(prefix, "configName"),
            "Configuration name cannot be empty.",
        );
    }

    let path = field_path(prefix, "keyVaultUri");
    if key_vault_uri.is_empty() {
        errors.push(path, "Key Vault URI is required.");
    } else if !is_absolute_uri(key_vault_uri) {
        errors.push(path, "Invalid Key Vault URI.");
    }

    let path = field_path(prefix, "subscriptionId");
    if subscription_id.is_empty() {
        errors.push(path, "Subscription ID is required.");
    } else if !is_uuid(subscription_id) {
        errors.push(path, "Invalid Subscription ID format. Must be a UUID.");
    }

    if let Some(endpoint) = api_endpoint.filter(|e| !e.is_empty()) {
        if !is_absolute_uri(endpoint) {
            errors.push(field_path(prefix, "apiEndpoint"), "Invalid API Endpoint URL.");
        }
    }
}

fn require_non_empty(
    value: &str,
    prefix: &str,
    field: &str,
    message: &str,
    errors: &mut ValidationErrors,
) {
    if value.is_empty() {
        errors.push(field_path(prefix, field), message);
    }
}

fn entry_prefix(index: usize) -> String {
    format!("configurations[{index}]")
}
