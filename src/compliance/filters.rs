//! # Dashboard Filters
//!
//! Advanced filters for the compliance item table. Every filter is optional
//! and an empty string counts as unset. The tag value only applies together
//! with a tag key.

use super::model::{PolicyComplianceItem, PolicyInitiative};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceFilter {
    pub subscription_id: Option<String>,
    /// Initiative catalog ID, e.g. `init-001`
    pub policy_initiative_id: Option<String>,
    pub policy_definition_id: Option<String>,
    pub tag_key: Option<String>,
    pub tag_value: Option<String>,
}

fn set(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl ComplianceFilter {
    /// Number of filters that take part in matching
    pub fn active_count(&self) -> usize {
        let tag_key = set(self.tag_key.as_ref());
        [
            set(self.subscription_id.as_ref()).is_some(),
            set(self.policy_initiative_id.as_ref()).is_some(),
            set(self.policy_definition_id.as_ref()).is_some(),
            tag_key.is_some(),
            tag_key.is_some() && set(self.tag_value.as_ref()).is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Items matching every active filter, in input order
    ///
    /// Items are labelled with initiative display names, so the initiative ID
    /// is resolved through `initiatives`; an unknown ID matches nothing.
    pub fn apply(
        &self,
        items: &[PolicyComplianceItem],
        initiatives: &[PolicyInitiative],
    ) -> Vec<PolicyComplianceItem> {
        let initiative_name = set(self.policy_initiative_id.as_ref()).map(|id| {
            initiatives
                .iter()
                .find(|i| i.id == id)
                .map(|i| i.display_name.as_str())
        });

        items
            .iter()
            .filter(|item| self.matches(item, initiative_name))
            .cloned()
            .collect()
    }

    fn matches(&self, item: &PolicyComplianceItem, initiative_name: Option<Option<&str>>) -> bool {
        if let Some(subscription) = set(self.subscription_id.as_ref()) {
            if item.subscription_id != subscription {
                return false;
            }
        }
        if let Some(name) = initiative_name {
            if name.is_none() || item.policy_set_definition_name.as_deref() != name {
                return false;
            }
        }
        if let Some(definition) = set(self.policy_definition_id.as_ref()) {
            if item.policy_definition_id != definition {
                return false;
            }
        }
        if let Some(key) = set(self.tag_key.as_ref()) {
            let Some(value) = item.tag(key) else {
                return false;
            };
            if let Some(expected) = set(self.tag_value.as_ref()) {
                if value != expected {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::provider::{ComplianceDataProvider, MockComplianceData};

    fn ids(items: &[PolicyComplianceItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let data = MockComplianceData::new();
        let filter = ComplianceFilter::default();
        assert_eq!(filter.active_count(), 0);
        assert_eq!(filter.apply(&data.items(), &data.initiatives()).len(), 5);
    }

    #[test]
    fn test_initiative_id_resolves_to_display_name() {
        let data = MockComplianceData::new();
        let filter = ComplianceFilter {
            policy_initiative_id: Some("init-001".to_string()),
            ..ComplianceFilter::default()
        };
        assert_eq!(
            ids(&filter.apply(&data.items(), &data.initiatives())),
            vec!["item-001", "item-002"]
        );

        let unknown = ComplianceFilter {
            policy_initiative_id: Some("init-999".to_string()),
            ..ComplianceFilter::default()
        };
        assert!(unknown.apply(&data.items(), &data.initiatives()).is_empty());
    }

    #[test]
    fn test_tag_value_requires_tag_key() {
        let data = MockComplianceData::new();
        let value_only = ComplianceFilter {
            tag_value: Some("production".to_string()),
            ..ComplianceFilter::default()
        };
        assert_eq!(value_only.active_count(), 0);
        assert_eq!(value_only.apply(&data.items(), &data.initiatives()).len(), 5);

        let key_and_value = ComplianceFilter {
            tag_key: Some("environment".to_string()),
            tag_value: Some("production".to_string()),
            ..ComplianceFilter::default()
        };
        assert_eq!(key_and_value.active_count(), 2);
        assert_eq!(
            ids(&key_and_value.apply(&data.items(), &data.initiatives())),
            vec!["item-001", "item-002"]
        );

        let key_only = ComplianceFilter {
            tag_key: Some("app".to_string()),
            tag_value: Some(String::new()),
            ..ComplianceFilter::default()
        };
        assert_eq!(key_only.active_count(), 1);
        assert_eq!(key_only.apply(&data.items(), &data.initiatives()).len(), 4);
    }

    #[test]
    fn test_filters_combine() {
        let data = MockComplianceData::new();
        let filter = ComplianceFilter {
            subscription_id: Some("sub-001".to_string()),
            policy_definition_id: Some("policy-004".to_string()),
            ..ComplianceFilter::default()
        };
        assert_eq!(filter.active_count(), 2);
        assert_eq!(
            ids(&filter.apply(&data.items(), &data.initiatives())),
            vec!["item-004"]
        );
    }
}
