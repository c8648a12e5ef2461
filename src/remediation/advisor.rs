//! # Remediation Advisor
//!
//! Validates advisor input, calls the completion service and collapses every
//! generation failure into one user-facing notice. The underlying cause is
//! logged and never returned to the caller.

use super::client::CompletionService;
use super::model::{RemediationAdvice, RemediationRequest};
use crate::constants::REMEDIATION_FAILURE_NOTICE;
use crate::datasource::ValidationErrors;
use crate::observability::metrics;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("{}", REMEDIATION_FAILURE_NOTICE)]
    GenerationFailed,
}

#[derive(Debug, Clone)]
pub struct RemediationAdvisor {
    service: Arc<dyn CompletionService>,
}

impl RemediationAdvisor {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Generate remediation steps and an exception request
    ///
    /// No retry; a failed call produces no partial output.
    ///
    /// # Errors
    /// [`AdvisorError::Invalid`] for out-of-range input, otherwise
    /// [`AdvisorError::GenerationFailed`]
    pub async fn advise(&self, request: &RemediationRequest) -> Result<RemediationAdvice, AdvisorError> {
        if let Err(errors) = request.validate() {
            metrics::increment_remediation_requests("invalid");
            return Err(AdvisorError::Invalid(errors));
        }

        let start = Instant::now();
        let result = self.service.generate(request).await;
        metrics::observe_remediation_duration(start.elapsed().as_secs_f64());

        match result {
            Ok(advice) => {
                info!(
                    duration_ms = start.elapsed().as_millis(),
                    "Generated remediation advice"
                );
                metrics::increment_remediation_requests("success");
                Ok(advice)
            }
            Err(e) => {
                error!(error = %e, "Failed to generate remediation advice");
                metrics::increment_remediation_requests("failed");
                Err(AdvisorError::GenerationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remediation::client::CompletionError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingService {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CompletionService for CountingService {
        async fn generate(
            &self,
            _request: &RemediationRequest,
        ) -> Result<RemediationAdvice, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CompletionError::Status {
                    status: 500,
                    body: "upstream exploded".to_string(),
                });
            }
            Ok(RemediationAdvice {
                remediation_steps: "1. Enable managed disks".to_string(),
                exception_request: "Request a 30 day exception".to_string(),
            })
        }
    }

    fn valid_request() -> RemediationRequest {
        RemediationRequest::new(
            "Audit VMs that do not use managed disks",
            "vm-prod-02 in westus uses unmanaged disks",
        )
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_service() {
        let service = Arc::new(CountingService::default());
        let advisor = RemediationAdvisor::new(Arc::clone(&service) as Arc<dyn CompletionService>);

        let result = advisor
            .advise(&RemediationRequest::new("short", "also short"))
            .await;

        assert!(matches!(result, Err(AdvisorError::Invalid(_))));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_collapse_to_notice() {
        let service = Arc::new(CountingService {
            fail: true,
            ..CountingService::default()
        });
        let advisor = RemediationAdvisor::new(Arc::clone(&service) as Arc<dyn CompletionService>);

        let error = advisor
            .advise(&valid_request())
            .await
            .expect_err("service fails");

        assert_eq!(
            error.to_string(),
            "Failed to generate remediation steps. Please try again."
        );
        assert!(!error.to_string().contains("upstream"));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_passes_advice_through() {
        let advisor = RemediationAdvisor::new(Arc::new(CountingService::default()));
        let advice = advisor.advise(&valid_request()).await.expect("advice");
        assert_eq!(advice.remediation_steps, "1. Enable managed disks");
    }
}
