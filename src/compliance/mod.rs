//! # Compliance
//!
//! Read-only Azure Policy compliance data and the aggregations behind the
//! dashboard views.
//!
//! - `model`: compliance items and catalog types
//! - `provider`: data source trait and the sample data set
//! - `aggregate`: summary, distribution and highlights
//! - `filters`: advanced item filters

pub mod aggregate;
pub mod filters;
pub mod model;
pub mod provider;

pub use aggregate::{
    percentage, recent_highlights, status_distribution, summarize, summary_cards,
    InitiativeDistribution, SummaryCard,
};
pub use filters::ComplianceFilter;
pub use model::{
    ComplianceStatus, ComplianceSummary, PolicyComplianceItem, PolicyDefinition, PolicyInitiative,
    Subscription, TrendDataPoint,
};
pub use provider::{ComplianceDataProvider, MockComplianceData};
