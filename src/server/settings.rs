//! Settings store and draft settings form handlers

use super::{ApiError, ServerState};
use crate::datasource::{
    AuthMethodKind, ConfigurationSet, DataSourceConfig, FormError, FormField, SettingsForm,
    StoreError, SubmissionOutcome,
};
use crate::observability::metrics;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Draft form as rendered by the settings page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FormView {
    configurations: Vec<DataSourceConfig>,
    can_remove: bool,
}

impl From<&SettingsForm> for FormView {
    fn from(form: &SettingsForm) -> Self {
        Self {
            configurations: form.entries().to_vec(),
            can_remove: form.can_remove(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EntryAdded {
    index: usize,
    #[serde(flatten)]
    form: FormView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SwitchAuthMethod {
    api_auth_method: AuthMethodKind,
}

impl From<FormError> for ApiError {
    fn from(error: FormError) -> Self {
        match error {
            FormError::LastEntry => ApiError::Conflict(error.to_string()),
            FormError::IndexOutOfRange { .. } => ApiError::NotFound(error.to_string()),
            FormError::FieldNotInVariant { .. } => ApiError::Unprocessable(error.to_string()),
        }
    }
}

fn outcome_status(outcome: &SubmissionOutcome) -> StatusCode {
    if outcome.success {
        StatusCode::OK
    } else if !outcome.errors.is_empty() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub(super) async fn get_settings(State(state): State<Arc<ServerState>>) -> Json<ConfigurationSet> {
    Json(state.store.load().await)
}

/// Replace the persisted settings with a raw JSON document
pub(super) async fn put_settings(
    State(state): State<Arc<ServerState>>,
    Json(document): Json<Value>,
) -> (StatusCode, Json<SubmissionOutcome>) {
    let result = state.store.save_document(&document).await.map(|_| ());
    let outcome = match result {
        Err(StoreError::Validation(errors)) => SubmissionOutcome::invalid(errors),
        other => SubmissionOutcome::from_save(other),
    };
    (outcome_status(&outcome), Json(outcome))
}

pub(super) async fn get_schema() -> Json<schemars::Schema> {
    Json(schemars::schema_for!(ConfigurationSet))
}

pub(super) async fn get_form(State(state): State<Arc<ServerState>>) -> Json<FormView> {
    let form = state.form.lock().await;
    Json(FormView::from(&*form))
}

/// Discard the draft and reseed it from the store
pub(super) async fn reload_form(State(state): State<Arc<ServerState>>) -> Json<FormView> {
    let set = state.store.load().await;
    let mut form = state.form.lock().await;
    *form = SettingsForm::from_set(set);
    metrics::increment_form_mutations("reload");
    Json(FormView::from(&*form))
}

pub(super) async fn add_entry(State(state): State<Arc<ServerState>>) -> Json<EntryAdded> {
    let mut form = state.form.lock().await;
    let index = form.add_entry();
    metrics::increment_form_mutations("add");
    Json(EntryAdded {
        index,
        form: FormView::from(&*form),
    })
}

pub(super) async fn remove_entry(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<usize>,
) -> Result<Json<FormView>, ApiError> {
    let mut form = state.form.lock().await;
    form.remove_entry(index)?;
    metrics::increment_form_mutations("remove");
    Ok(Json(FormView::from(&*form)))
}

pub(super) async fn switch_auth_method(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<usize>,
    Json(body): Json<SwitchAuthMethod>,
) -> Result<Json<FormView>, ApiError> {
    let mut form = state.form.lock().await;
    form.switch_auth_method(index, body.api_auth_method)?;
    metrics::increment_form_mutations("switch");
    Ok(Json(FormView::from(&*form)))
}

/// Set several fields of one entry; all or nothing
pub(super) async fn patch_entry(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<usize>,
    Json(fields): Json<BTreeMap<FormField, String>>,
) -> Result<Json<FormView>, ApiError> {
    let mut form = state.form.lock().await;
    if index >= form.len() {
        return Err(FormError::IndexOutOfRange {
            index,
            len: form.len(),
        }
        .into());
    }
    let mut draft = form.clone();
    for (field, value) in fields {
        draft.set_field(index, field, value)?;
    }
    *form = draft;
    metrics::increment_form_mutations("edit");
    Ok(Json(FormView::from(&*form)))
}

pub(super) async fn submit_form(
    State(state): State<Arc<ServerState>>,
) -> (StatusCode, Json<SubmissionOutcome>) {
    let form = state.form.lock().await;
    let outcome = form.submit(&state.store).await;
    info!(success = outcome.success, "Settings form submitted");
    (outcome_status(&outcome), Json(outcome))
}
