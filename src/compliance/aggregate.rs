//! # Dashboard Aggregations
//!
//! Pure functions turning compliance items into what the dashboard views show:
//! summary counts and cards, the per-initiative status distribution, and the
//! recent activity table.

use super::model::{ComplianceStatus, ComplianceSummary, PolicyComplianceItem};
use crate::constants::UNASSIGNED_INITIATIVE;
use serde::{Deserialize, Serialize};

/// One of the four summary cards
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub title: String,
    pub value: String,
    pub description: String,
}

/// Stacked bar for one initiative
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeDistribution {
    pub name: String,
    pub compliant: u64,
    pub non_compliant: u64,
    pub pending: u64,
}

/// `part / total` as a whole percentage, rounded half-up
///
/// `None` when `total` is zero.
pub fn percentage(part: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some((part * 200 + total) / (total * 2))
}

pub fn summarize(items: &[PolicyComplianceItem]) -> ComplianceSummary {
    let total = items.len() as u64;
    let count = |status: ComplianceStatus| items.iter().filter(|i| i.status == status).count() as u64;
    let compliant = count(ComplianceStatus::Compliant);
    ComplianceSummary {
        total_resources: total,
        compliant_resources: compliant,
        non_compliant_resources: count(ComplianceStatus::NonCompliant),
        compliance_percentage: percentage(compliant, total),
    }
}

/// Render a percentage, or `N/A` when nothing was evaluated
fn display_percentage(value: Option<u64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |p| format!("{p}%"))
}

pub fn summary_cards(summary: &ComplianceSummary) -> Vec<SummaryCard> {
    let total = summary.total_resources;
    vec![
        SummaryCard {
            title: "Total Resources".to_string(),
            value: total.to_string(),
            description: "Total resources evaluated".to_string(),
        },
        SummaryCard {
            title: "Compliant Resources".to_string(),
            value: summary.compliant_resources.to_string(),
            description: format!(
                "{} compliant",
                display_percentage(percentage(summary.compliant_resources, total))
            ),
        },
        SummaryCard {
            title: "Non-Compliant Resources".to_string(),
            value: summary.non_compliant_resources.to_string(),
            description: format!(
                "{} non-compliant",
                display_percentage(percentage(summary.non_compliant_resources, total))
            ),
        },
        SummaryCard {
            title: "Overall Compliance".to_string(),
            value: display_percentage(summary.compliance_percentage),
            description: "Based on evaluated resources".to_string(),
        },
    ]
}

/// Group items by initiative name in first-seen order
///
/// Items without an initiative land in the `Unassigned` bucket. Statuses other
/// than compliant, non-compliant and pending still create their bucket but are
/// not counted.
pub fn status_distribution(items: &[PolicyComplianceItem]) -> Vec<InitiativeDistribution> {
    let mut buckets: Vec<InitiativeDistribution> = Vec::new();
    for item in items {
        let name = item
            .policy_set_definition_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNASSIGNED_INITIATIVE);

        let position = match buckets.iter().position(|b| b.name == name) {
            Some(position) => position,
            None => {
                buckets.push(InitiativeDistribution {
                    name: name.to_string(),
                    compliant: 0,
                    non_compliant: 0,
                    pending: 0,
                });
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[position];
        match item.status {
            ComplianceStatus::Compliant => bucket.compliant += 1,
            ComplianceStatus::NonCompliant => bucket.non_compliant += 1,
            ComplianceStatus::Pending => bucket.pending += 1,
            ComplianceStatus::NotStarted | ComplianceStatus::Exempt => {}
        }
    }
    buckets
}

/// Most recently evaluated items first, at most `limit`
///
/// Items with equal timestamps keep their input order.
pub fn recent_highlights(items: &[PolicyComplianceItem], limit: usize) -> Vec<PolicyComplianceItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::provider::{ComplianceDataProvider, MockComplianceData};

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(2, 5), Some(40));
        assert_eq!(percentage(1, 8), Some(13));
        assert_eq!(percentage(1, 3), Some(33));
        assert_eq!(percentage(2, 3), Some(67));
        assert_eq!(percentage(0, 4), Some(0));
        assert_eq!(percentage(4, 4), Some(100));
        assert_eq!(percentage(0, 0), None);
    }

    #[test]
    fn test_summary_of_sample_data() {
        let items = MockComplianceData::new().items();
        let summary = summarize(&items);
        assert_eq!(summary.total_resources, 5);
        assert_eq!(summary.compliant_resources, 2);
        assert_eq!(summary.non_compliant_resources, 2);
        assert_eq!(summary.compliance_percentage, Some(40));

        let cards = summary_cards(&summary);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[1].description, "40% compliant");
        assert_eq!(cards[3].value, "40%");
    }

    #[test]
    fn test_empty_summary_has_no_percentage() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_resources, 0);
        assert_eq!(summary.compliance_percentage, None);

        let cards = summary_cards(&summary);
        assert_eq!(cards[3].value, "N/A");
        assert_eq!(cards[2].description, "N/A non-compliant");
    }

    #[test]
    fn test_distribution_groups_in_first_seen_order() {
        let items = MockComplianceData::new().items();
        let distribution = status_distribution(&items);
        let names: Vec<&str> = distribution.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Azure Security Benchmark v3",
                "HIPAA HITRUST Blueprint",
                "Unassigned",
                "NIST SP 800-53 Rev. 5"
            ]
        );
        assert_eq!(distribution[0].compliant, 1);
        assert_eq!(distribution[0].non_compliant, 1);
        assert_eq!(distribution[2].pending, 1);
    }

    #[test]
    fn test_highlights_newest_first_and_stable() {
        let items = MockComplianceData::new().items();
        let highlights = recent_highlights(&items, 7);
        let ids: Vec<&str> = highlights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-001", "item-004", "item-002", "item-003", "item-005"]);

        assert_eq!(recent_highlights(&items, 2).len(), 2);
        assert!(recent_highlights(&items, 0).is_empty());
    }
}
