//! # Compliance Data Provider
//!
//! Source of compliance records for the dashboard views. The production wiring
//! uses [`MockComplianceData`], a fixed sample data set; a real Azure Policy
//! client would implement [`ComplianceDataProvider`] the same way.

use super::model::{
    ComplianceStatus, PolicyComplianceItem, PolicyDefinition, PolicyInitiative, Subscription,
    TrendDataPoint,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

pub trait ComplianceDataProvider: Send + Sync + std::fmt::Debug {
    fn items(&self) -> Vec<PolicyComplianceItem>;
    fn subscriptions(&self) -> Vec<Subscription>;
    fn initiatives(&self) -> Vec<PolicyInitiative>;
    fn definitions(&self) -> Vec<PolicyDefinition>;
    fn trend(&self) -> Vec<TrendDataPoint>;
}

/// Static sample data; item timestamps are relative to construction time
#[derive(Debug, Clone)]
pub struct MockComplianceData {
    items: Vec<PolicyComplianceItem>,
}

impl Default for MockComplianceData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockComplianceData {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Sample data with timestamps anchored at `now`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            items: sample_items(now),
        }
    }
}

impl ComplianceDataProvider for MockComplianceData {
    fn items(&self) -> Vec<PolicyComplianceItem> {
        self.items.clone()
    }

    fn subscriptions(&self) -> Vec<Subscription> {
        [
            ("sub-001", "Production Subscription A"),
            ("sub-002", "Development Subscription B"),
            ("sub-003", "Staging Subscription C"),
        ]
        .into_iter()
        .map(|(id, name)| Subscription {
            id: id.to_string(),
            display_name: name.to_string(),
        })
        .collect()
    }

    fn initiatives(&self) -> Vec<PolicyInitiative> {
        [
            ("init-001", "Azure Security Benchmark v3"),
            ("init-002", "HIPAA HITRUST Blueprint"),
            ("init-003", "NIST SP 800-53 Rev. 5"),
        ]
        .into_iter()
        .map(|(id, name)| PolicyInitiative {
            id: id.to_string(),
            display_name: name.to_string(),
        })
        .collect()
    }

    fn definitions(&self) -> Vec<PolicyDefinition> {
        [
            ("policy-001", "Allowed locations", "General"),
            ("policy-002", "Audit VMs that do not use managed disks", "Compute"),
            ("policy-003", "Enforce HTTPS only for App Service", "App Service"),
            ("policy-004", "Require MFA for all admin accounts", "Identity"),
            ("policy-005", "Storage accounts should restrict network access", "Storage"),
        ]
        .into_iter()
        .map(|(id, name, category)| PolicyDefinition {
            id: id.to_string(),
            display_name: name.to_string(),
            category: Some(category.to_string()),
        })
        .collect()
    }

    fn trend(&self) -> Vec<TrendDataPoint> {
        [
            ("Jan", 70, 30),
            ("Feb", 75, 25),
            ("Mar", 80, 20),
            ("Apr", 78, 22),
            ("May", 82, 18),
            ("Jun", 85, 15),
        ]
        .into_iter()
        .map(|(date, compliant, non_compliant)| TrendDataPoint {
            date: date.to_string(),
            compliant,
            non_compliant,
            total: Some(compliant + non_compliant),
        })
        .collect()
    }
}

fn tags(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn sample_items(now: DateTime<Utc>) -> Vec<PolicyComplianceItem> {
    vec![
        PolicyComplianceItem {
            id: "item-001".to_string(),
            policy_name: "Allowed locations".to_string(),
            policy_set_definition_name: Some("Azure Security Benchmark v3".to_string()),
            subscription_id: "sub-001".to_string(),
            resource_id: "/subscriptions/sub-001/resourceGroups/rg-prod/providers/Microsoft.Compute/virtualMachines/vm-prod-01".to_string(),
            resource_type: "Microsoft.Compute/virtualMachines".to_string(),
            resource_location: "eastus".to_string(),
            status: ComplianceStatus::Compliant,
            timestamp: now,
            tags: tags(&[("environment", "production"), ("app", "billing")]),
            compliance_state: "Compliant".to_string(),
            policy_definition_id: "policy-001".to_string(),
            policy_assignment_id: "assign-001".to_string(),
            non_compliance_details: None,
        },
        PolicyComplianceItem {
            id: "item-002".to_string(),
            policy_name: "Audit VMs that do not use managed disks".to_string(),
            policy_set_definition_name: Some("Azure Security Benchmark v3".to_string()),
            subscription_id: "sub-001".to_string(),
            resource_id: "/subscriptions/sub-001/resourceGroups/rg-prod/providers/Microsoft.Compute/virtualMachines/vm-prod-02".to_string(),
            resource_type: "Microsoft.Compute/virtualMachines".to_string(),
            resource_location: "westus".to_string(),
            status: ComplianceStatus::NonCompliant,
            timestamp: now - Duration::days(1),
            tags: tags(&[("environment", "production"), ("app", "inventory")]),
            compliance_state: "NonCompliant".to_string(),
            policy_definition_id: "policy-002".to_string(),
            policy_assignment_id: "assign-002".to_string(),
            non_compliance_details: Some("Virtual machine is using unmanaged disks.".to_string()),
        },
        PolicyComplianceItem {
            id: "item-003".to_string(),
            policy_name: "Enforce HTTPS only for App Service".to_string(),
            policy_set_definition_name: Some("HIPAA HITRUST Blueprint".to_string()),
            subscription_id: "sub-002".to_string(),
            resource_id: "/subscriptions/sub-002/resourceGroups/rg-dev/providers/Microsoft.Web/sites/webapp-dev-01".to_string(),
            resource_type: "Microsoft.Web/sites".to_string(),
            resource_location: "centralus".to_string(),
            status: ComplianceStatus::Compliant,
            timestamp: now - Duration::days(2),
            tags: tags(&[("environment", "development"), ("app", "portal")]),
            compliance_state: "Compliant".to_string(),
            policy_definition_id: "policy-003".to_string(),
            policy_assignment_id: "assign-003".to_string(),
            non_compliance_details: None,
        },
        PolicyComplianceItem {
            id: "item-004".to_string(),
            policy_name: "Require MFA for all admin accounts".to_string(),
            policy_set_definition_name: None,
            subscription_id: "sub-001".to_string(),
            resource_id: "/subscriptions/sub-001/providers/Microsoft.Authorization/policyAssignments/mfa-assignment".to_string(),
            resource_type: "Microsoft.Authorization/policyAssignments".to_string(),
            resource_location: "global".to_string(),
            status: ComplianceStatus::Pending,
            timestamp: now,
            tags: None,
            compliance_state: "Pending".to_string(),
            policy_definition_id: "policy-004".to_string(),
            policy_assignment_id: "assign-004".to_string(),
            non_compliance_details: None,
        },
        PolicyComplianceItem {
            id: "item-005".to_string(),
            policy_name: "Storage accounts should restrict network access".to_string(),
            policy_set_definition_name: Some("NIST SP 800-53 Rev. 5".to_string()),
            subscription_id: "sub-003".to_string(),
            resource_id: "/subscriptions/sub-003/resourceGroups/rg-staging/providers/Microsoft.Storage/storageAccounts/stagestorage001".to_string(),
            resource_type: "Microsoft.Storage/storageAccounts".to_string(),
            resource_location: "eastus2".to_string(),
            status: ComplianceStatus::NonCompliant,
            timestamp: now - Duration::days(3),
            tags: tags(&[("environment", "staging"), ("app", "analytics")]),
            compliance_state: "NonCompliant".to_string(),
            policy_definition_id: "policy-005".to_string(),
            policy_assignment_id: "assign-005".to_string(),
            non_compliance_details: Some("Storage account allows public network access.".to_string()),
        },
    ]
}
