//! # Data Sources
//!
//! Azure data-source settings: the configuration schema, the JSON file store
//! and the draft settings form.
//!
//! - `schema`: configuration types and validation rules
//! - `store`: load/save of the settings document
//! - `form`: multi-entry form state machine

pub mod errors;
pub mod form;
pub mod schema;
pub mod store;
pub mod validation;

pub use errors::{FieldError, ValidationErrors};
pub use form::{FormError, FormField, SettingsForm, SubmissionOutcome};
pub use schema::{
    validate_configuration, validate_configuration_set, ApiAuthMethod, AuthMethodKind,
    ClientCertificateAuth, ClientSecretAuth, ConfigurationSet, DataSourceConfig,
    ManagedIdentityAuth,
};
pub use store::{ConfigurationStore, FileBackend, MemoryBackend, SettingsBackend, StoreError};
