//! Compliance dashboard view handlers

use super::ServerState;
use crate::compliance::{
    recent_highlights, status_distribution, summarize, summary_cards, ComplianceFilter,
    ComplianceSummary, InitiativeDistribution, PolicyComplianceItem, PolicyDefinition,
    PolicyInitiative, Subscription, SummaryCard, TrendDataPoint,
};
use crate::observability::metrics;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SummaryView {
    summary: ComplianceSummary,
    cards: Vec<SummaryCard>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HighlightsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ItemsView {
    items: Vec<PolicyComplianceItem>,
    total: usize,
    active_filter_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CatalogView {
    subscriptions: Vec<Subscription>,
    initiatives: Vec<PolicyInitiative>,
    definitions: Vec<PolicyDefinition>,
}

pub(super) async fn summary(State(state): State<Arc<ServerState>>) -> Json<SummaryView> {
    metrics::increment_view_requests("summary");
    let summary = summarize(&state.compliance.items());
    let cards = summary_cards(&summary);
    Json(SummaryView { summary, cards })
}

pub(super) async fn distribution(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<InitiativeDistribution>> {
    metrics::increment_view_requests("distribution");
    Json(status_distribution(&state.compliance.items()))
}

pub(super) async fn highlights(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HighlightsQuery>,
) -> Json<Vec<PolicyComplianceItem>> {
    metrics::increment_view_requests("highlights");
    let limit = query.limit.unwrap_or(state.config.highlights_limit);
    Json(recent_highlights(&state.compliance.items(), limit))
}

pub(super) async fn items(
    State(state): State<Arc<ServerState>>,
    Query(filter): Query<ComplianceFilter>,
) -> Json<ItemsView> {
    metrics::increment_view_requests("items");
    let items = filter.apply(&state.compliance.items(), &state.compliance.initiatives());
    Json(ItemsView {
        total: items.len(),
        active_filter_count: filter.active_count(),
        items,
    })
}

pub(super) async fn catalog(State(state): State<Arc<ServerState>>) -> Json<CatalogView> {
    metrics::increment_view_requests("catalog");
    Json(CatalogView {
        subscriptions: state.compliance.subscriptions(),
        initiatives: state.compliance.initiatives(),
        definitions: state.compliance.definitions(),
    })
}

pub(super) async fn trends(State(state): State<Arc<ServerState>>) -> Json<Vec<TrendDataPoint>> {
    metrics::increment_view_requests("trends");
    Json(state.compliance.trend())
}
