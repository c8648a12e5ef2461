//! # Remediation Model
//!
//! Input and output of the remediation advisor.

use crate::constants::{REMEDIATION_INPUT_MAX_CHARS, REMEDIATION_INPUT_MIN_CHARS};
use crate::datasource::ValidationErrors;
use serde::{Deserialize, Serialize};

/// A non-compliant policy and the resource it was evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationRequest {
    /// Policy definition text (name, rule, or full JSON)
    pub policy_definition: String,
    /// Details of the non-compliant resource
    pub resource_details: String,
}

/// Generated remediation guidance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationAdvice {
    pub remediation_steps: String,
    pub exception_request: String,
}

impl RemediationRequest {
    pub fn new(policy_definition: impl Into<String>, resource_details: impl Into<String>) -> Self {
        Self {
            policy_definition: policy_definition.into(),
            resource_details: resource_details.into(),
        }
    }

    /// Check both inputs are within the accepted length range
    ///
    /// Lengths are counted in characters, not bytes.
    ///
    /// # Errors
    /// One error per out-of-range field
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&self.policy_definition, "policyDefinition", "Policy definition", &mut errors);
        check_length(&self.resource_details, "resourceDetails", "Resource details", &mut errors);
        errors.into_result(())
    }
}

fn check_length(value: &str, path: &str, label: &str, errors: &mut ValidationErrors) {
    let length = value.chars().count();
    if length < REMEDIATION_INPUT_MIN_CHARS {
        errors.push(
            path,
            format!("{label} must be at least {REMEDIATION_INPUT_MIN_CHARS} characters."),
        );
    } else if length > REMEDIATION_INPUT_MAX_CHARS {
        errors.push(
            path,
            format!("{label} must be at most {REMEDIATION_INPUT_MAX_CHARS} characters."),
        );
    }
}
