//! # Compliance Model
//!
//! Read-only Azure Policy compliance records and the catalog entries used to
//! label and filter them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Evaluation status of one resource against one policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    NotStarted,
    Pending,
    Exempt,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NonCompliant => "NonCompliant",
            ComplianceStatus::NotStarted => "NotStarted",
            ComplianceStatus::Pending => "Pending",
            ComplianceStatus::Exempt => "Exempt",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One policy evaluation result for one resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyComplianceItem {
    pub id: String,
    pub policy_name: String,
    /// Display name of the initiative (policy set) the policy belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_set_definition_name: Option<String>,
    pub subscription_id: String,
    pub resource_id: String,
    pub resource_type: String,
    pub resource_location: String,
    pub status: ComplianceStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub compliance_state: String,
    pub policy_definition_id: String,
    pub policy_assignment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_compliance_details: Option<String>,
}

impl PolicyComplianceItem {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInitiative {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One point of the compliance trend line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataPoint {
    /// Period label, e.g. `Jan` or `2024-01-31`
    pub date: String,
    pub compliant: u64,
    pub non_compliant: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Resource counts for the summary cards
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total_resources: u64,
    pub compliant_resources: u64,
    pub non_compliant_resources: u64,
    /// Compliant share of all resources, rounded half-up; absent when nothing
    /// has been evaluated
    pub compliance_percentage: Option<u64>,
}
