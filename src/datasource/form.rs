//! # Settings Form
//!
//! Draft state of the multi-entry data-source settings form.
//!
//! The form always holds at least one entry. Every entry is a typed
//! [`DataSourceConfig`], so an entry can only ever carry the fields of its
//! current authentication variant; switching variants discards the old
//! variant's fields outright.

use super::errors::{FieldError, ValidationErrors};
use super::schema::{ApiAuthMethod, AuthMethodKind, ConfigurationSet, DataSourceConfig};
use super::store::{ConfigurationStore, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SAVED_MESSAGE: &str = "Settings saved successfully.";
pub const INVALID_FORM_MESSAGE: &str = "Please correct the highlighted fields and try again.";

/// Editable fields of a form entry
///
/// `apiAuthMethod` is not listed: it changes through
/// [`SettingsForm::switch_auth_method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    ConfigName,
    KeyVaultUri,
    SubscriptionId,
    ApiEndpoint,
    TenantIdSecretName,
    ClientIdSecretName,
    ClientSecretName,
    CertificateThumbprintSecretName,
    ManagedIdentityClientIdSecretName,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::ConfigName => "configName",
            FormField::KeyVaultUri => "keyVaultUri",
            FormField::SubscriptionId => "subscriptionId",
            FormField::ApiEndpoint => "apiEndpoint",
            FormField::TenantIdSecretName => "tenantIdSecretName",
            FormField::ClientIdSecretName => "clientIdSecretName",
            FormField::ClientSecretName => "clientSecretName",
            FormField::CertificateThumbprintSecretName => "certificateThumbprintSecretName",
            FormField::ManagedIdentityClientIdSecretName => "managedIdentityClientIdSecretName",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("At least one configuration is required.")]
    LastEntry,
    #[error("Configuration {index} does not exist ({len} configured).")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Field {field} does not apply to {kind} authentication.")]
    FieldNotInVariant {
        field: FormField,
        kind: AuthMethodKind,
    },
}

/// Result of a form submission, as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl SubmissionOutcome {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: SAVED_MESSAGE.to_string(),
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            message: INVALID_FORM_MESSAGE.to_string(),
            errors: errors.into_vec(),
        }
    }

    /// Outcome of a store write
    pub fn from_save(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::saved(),
            Err(StoreError::Validation(errors)) => Self {
                success: false,
                message: format!("Failed to save settings: {errors}"),
                errors: errors.into_vec(),
            },
            Err(e) => Self {
                success: false,
                message: format!("Failed to save settings: {e}"),
                errors: Vec::new(),
            },
        }
    }
}

/// Draft settings form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    configurations: Vec<DataSourceConfig>,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_set(ConfigurationSet::default())
    }
}

impl SettingsForm {
    /// Seed the form from a loaded set; an empty set yields one default entry
    pub fn from_set(set: ConfigurationSet) -> Self {
        let mut configurations = set.configurations;
        if configurations.is_empty() {
            configurations.push(DataSourceConfig::default_entry());
        }
        Self { configurations }
    }

    pub fn entries(&self) -> &[DataSourceConfig] {
        &self.configurations
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Never true for a form built through `from_set`
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Whether the remove control is enabled
    pub fn can_remove(&self) -> bool {
        self.configurations.len() > 1
    }

    /// Append a default entry and return its index
    pub fn add_entry(&mut self) -> usize {
        self.configurations.push(DataSourceConfig::default_entry());
        debug!(entries = self.configurations.len(), "Added configuration entry");
        self.configurations.len() - 1
    }

    /// Remove the entry at `index`
    ///
    /// # Errors
    /// [`FormError::LastEntry`] when only one entry remains; the form is unchanged
    pub fn remove_entry(&mut self, index: usize) -> Result<(), FormError> {
        self.check_index(index)?;
        if !self.can_remove() {
            warn!("Refusing to remove the last configuration entry");
            return Err(FormError::LastEntry);
        }
        self.configurations.remove(index);
        debug!(index, entries = self.configurations.len(), "Removed configuration entry");
        Ok(())
    }

    /// Change the authentication variant of the entry at `index`
    ///
    /// Common fields are kept. All fields of the previous variant are dropped,
    /// including the tenant and client ID secret names the secret and
    /// certificate variants share.
    ///
    /// # Errors
    /// [`FormError::IndexOutOfRange`]
    pub fn switch_auth_method(&mut self, index: usize, kind: AuthMethodKind) -> Result<(), FormError> {
        let entry = self.entry_mut(index)?;
        if entry.auth.kind() == kind {
            return Ok(());
        }
        debug!(index, from = %entry.auth.kind(), to = %kind, "Switched authentication method");
        entry.auth = ApiAuthMethod::empty(kind);
        Ok(())
    }

    /// Set one field of the entry at `index`
    ///
    /// An empty `configName` clears the name; an empty `apiEndpoint` or
    /// managed identity secret name is kept as an empty string.
    ///
    /// # Errors
    /// [`FormError::FieldNotInVariant`] when `field` belongs to another
    /// authentication variant; the entry is unchanged
    pub fn set_field(&mut self, index: usize, field: FormField, value: String) -> Result<(), FormError> {
        let entry = self.entry_mut(index)?;
        let kind = entry.auth.kind();
        let not_in_variant = || FormError::FieldNotInVariant { field, kind };

        match field {
            FormField::ConfigName => {
                entry.config_name = Some(value).filter(|name| !name.is_empty());
            }
            FormField::KeyVaultUri => entry.key_vault_uri = value,
            FormField::SubscriptionId => entry.subscription_id = value,
            FormField::ApiEndpoint => entry.api_endpoint = Some(value),
            FormField::TenantIdSecretName => match &mut entry.auth {
                ApiAuthMethod::ClientSecretInKv(auth) => auth.tenant_id_secret_name = value,
                ApiAuthMethod::ClientCertificateInKv(auth) => auth.tenant_id_secret_name = value,
                ApiAuthMethod::ManagedIdentityInKv(_) => return Err(not_in_variant()),
            },
            FormField::ClientIdSecretName => match &mut entry.auth {
                ApiAuthMethod::ClientSecretInKv(auth) => auth.client_id_secret_name = value,
                ApiAuthMethod::ClientCertificateInKv(auth) => auth.client_id_secret_name = value,
                ApiAuthMethod::ManagedIdentityInKv(_) => return Err(not_in_variant()),
            },
            FormField::ClientSecretName => match &mut entry.auth {
                ApiAuthMethod::ClientSecretInKv(auth) => auth.client_secret_name = value,
                _ => return Err(not_in_variant()),
            },
            FormField::CertificateThumbprintSecretName => match &mut entry.auth {
                ApiAuthMethod::ClientCertificateInKv(auth) => {
                    auth.certificate_thumbprint_secret_name = value;
                }
                _ => return Err(not_in_variant()),
            },
            FormField::ManagedIdentityClientIdSecretName => match &mut entry.auth {
                ApiAuthMethod::ManagedIdentityInKv(auth) => {
                    auth.managed_identity_client_id_secret_name = Some(value);
                }
                _ => return Err(not_in_variant()),
            },
        }
        Ok(())
    }

    /// Snapshot of the draft as a configuration set
    pub fn to_set(&self) -> ConfigurationSet {
        ConfigurationSet {
            configurations: self.configurations.clone(),
        }
    }

    /// Validate every entry
    ///
    /// # Errors
    /// Field errors with `configurations[i].` path prefixes
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.to_set().validate()
    }

    /// Validate and, when valid, persist the draft
    ///
    /// Validation failures never reach the store. The draft is left as it is
    /// either way.
    pub async fn submit(&self, store: &ConfigurationStore) -> SubmissionOutcome {
        if let Err(errors) = self.validate() {
            info!(errors = errors.len(), "Settings form has invalid fields, not saving");
            return SubmissionOutcome::invalid(errors);
        }
        SubmissionOutcome::from_save(store.save(&self.to_set()).await)
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index < self.configurations.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfRange {
                index,
                len: self.configurations.len(),
            })
        }
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut DataSourceConfig, FormError> {
        self.check_index(index)?;
        Ok(&mut self.configurations[index])
    }
}
