//! Pact contract tests for the OpenAI-compatible chat completions API
//!
//! These tests define the contract between the remediation advisor and the
//! completion service. They use Pact to create a mock server that simulates
//! chat completion responses.

mod common;

use common::init_rustls;
use pact_consumer::prelude::*;
use policy_compliance_dashboard::config::RemediationServiceConfig;
use policy_compliance_dashboard::remediation::{
    AdvisorError, ChatCompletionClient, CompletionService, RemediationAdvisor, RemediationRequest,
};
use serde_json::json;
use std::sync::Arc;

fn remediation_request() -> RemediationRequest {
    RemediationRequest::new(
        "Storage accounts should restrict network access",
        "stagestorage001 (Microsoft.Storage/storageAccounts, eastus2) allows public network access",
    )
}

fn client_for(mock_server_url: &str) -> ChatCompletionClient {
    // mock_server.url() returns a Url - strip trailing slash
    let mut base_url = mock_server_url.to_string();
    if base_url.ends_with('/') {
        base_url.pop();
    }
    let config = RemediationServiceConfig {
        api_url: format!("{base_url}/v1/chat/completions"),
        api_key: Some("test-key".to_string()),
        ..RemediationServiceConfig::default()
    };
    ChatCompletionClient::new(&config).expect("Failed to create completion client")
}

#[tokio::test]
async fn test_generate_remediation_contract() {
    init_rustls();
    let request = remediation_request();
    let expected_body = client_for("http://localhost").request_body(&request);

    let mut pact_builder = PactBuilder::new("Policy-Compliance-Dashboard", "Chat-Completions-API");
    pact_builder.interaction("generate remediation advice", "", |mut i| {
        i.given("the model is available and the API key is valid");
        i.request
            .method("POST")
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .header("content-type", "application/json")
            .json_body(expected_body.clone());
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "{\"remediationSteps\": \"1. Set publicNetworkAccess to Disabled.\\n2. Add a private endpoint.\", \"exceptionRequest\": \"Request a 30 day exception while the private endpoint is provisioned.\"}"
                    },
                    "finish_reason": "stop"
                }]
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let advice = client
        .generate(&request)
        .await
        .expect("completion succeeds");

    assert!(advice.remediation_steps.starts_with("1. Set publicNetworkAccess"));
    assert!(advice.exception_request.contains("30 day exception"));
}

#[tokio::test]
async fn test_upstream_error_collapses_to_notice_contract() {
    init_rustls();
    let request = remediation_request();
    let expected_body = client_for("http://localhost").request_body(&request);

    let mut pact_builder = PactBuilder::new("Policy-Compliance-Dashboard", "Chat-Completions-API");
    pact_builder.interaction("generate remediation advice while rate limited", "", |mut i| {
        i.given("the API key has exhausted its quota");
        i.request
            .method("POST")
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body(expected_body.clone());
        i.response
            .status(429)
            .header("content-type", "application/json")
            .json_body(json!({
                "error": {
                    "message": "Rate limit reached",
                    "type": "requests",
                    "code": "rate_limit_exceeded"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let advisor = RemediationAdvisor::new(Arc::new(client_for(mock_server.url().as_str())));

    let error = advisor
        .advise(&request)
        .await
        .expect_err("rate limited call fails");

    assert!(matches!(error, AdvisorError::GenerationFailed));
    assert_eq!(
        error.to_string(),
        "Failed to generate remediation steps. Please try again."
    );
}
