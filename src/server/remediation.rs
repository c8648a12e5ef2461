//! Remediation advisor handler

use super::{ApiError, ServerState};
use crate::constants::REMEDIATION_FAILURE_NOTICE;
use crate::remediation::{AdvisorError, RemediationAdvice, RemediationRequest};
use axum::{extract::State, Json};
use std::sync::Arc;

impl From<AdvisorError> for ApiError {
    fn from(error: AdvisorError) -> Self {
        match error {
            AdvisorError::Invalid(errors) => ApiError::Validation(errors),
            AdvisorError::GenerationFailed => ApiError::BadGateway(REMEDIATION_FAILURE_NOTICE.to_string()),
        }
    }
}

pub(super) async fn advise(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RemediationRequest>,
) -> Result<Json<RemediationAdvice>, ApiError> {
    Ok(Json(state.advisor.advise(&request).await?))
}
