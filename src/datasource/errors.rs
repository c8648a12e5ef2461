//! # Validation Errors
//!
//! Field-scoped validation errors shared by the settings schema, the settings
//! form and the remediation advisor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single invalid field: a dotted/indexed path and a user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the field, e.g. `configurations[0].keyVaultUri`
    pub path: String,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered collection of field errors
///
/// Holds at most one message per path; the first error recorded for a path wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the path already has one
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        if self.errors.iter().any(|e| e.path == path) {
            return;
        }
        self.errors.push(FieldError::new(path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message recorded for `path`, if any
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    /// Merge another collection, keeping first-wins semantics per path
    pub fn extend(&mut self, other: ValidationErrors) {
        for error in other.errors {
            self.push(error.path, error.message);
        }
    }

    /// `Ok(value)` when no errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => write!(f, "validation failed"),
            1 => write!(f, "validation failed: {}", self.errors[0]),
            n => {
                write!(f, "validation failed with {n} errors: ")?;
                for (i, error) in self.errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Join a parent path and a field name
pub(crate) fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_path_wins() {
        let mut errors = ValidationErrors::new();
        errors.push("keyVaultUri", "Key Vault URI is required.");
        errors.push("keyVaultUri", "Invalid Key Vault URI.");
        errors.push("subscriptionId", "Invalid Subscription ID format. Must be a UUID.");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.message_for("keyVaultUri"),
            Some("Key Vault URI is required.")
        );
    }

    #[test]
    fn test_display_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push("a", "first");
        errors.push("b", "second");
        assert_eq!(
            errors.to_string(),
            "validation failed with 2 errors: a: first; b: second"
        );
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut errors = ValidationErrors::new();
        errors.push("configurations[0].clientSecretName", "Client Secret Name is required.");
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([{
                "path": "configurations[0].clientSecretName",
                "message": "Client Secret Name is required."
            }])
        );
    }

    #[test]
    fn test_field_path_join() {
        assert_eq!(field_path("", "keyVaultUri"), "keyVaultUri");
        assert_eq!(
            field_path("configurations[2]", "keyVaultUri"),
            "configurations[2].keyVaultUri"
        );
    }
}
