//! # Completion Service Client
//!
//! Boundary to the generative model that drafts remediation guidance.
//!
//! [`ChatCompletionClient`] speaks the OpenAI-compatible chat completions API:
//! one system message, one user message carrying the rendered prompt, and a
//! JSON object response format. The assistant message content must be a JSON
//! object with `remediationSteps` and `exceptionRequest` strings.

use super::model::{RemediationAdvice, RemediationRequest};
use crate::config::RemediationServiceConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an AI assistant designed to help users remediate \
non-compliant Azure policies. Respond with a JSON object containing exactly two string \
fields: \"remediationSteps\" and \"exceptionRequest\".";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion response has no message content")]
    MissingContent,
    #[error("completion content is not a remediation object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Generates remediation advice for a validated request
#[async_trait]
pub trait CompletionService: Send + Sync + std::fmt::Debug {
    async fn generate(&self, request: &RemediationRequest) -> Result<RemediationAdvice, CompletionError>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl ChatCompletionClient {
    /// # Errors
    /// Fails when the HTTP client cannot be constructed
    pub fn new(config: &RemediationServiceConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(CompletionError::Client)?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Request body sent for `request`
    pub fn request_body(&self, request: &RemediationRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": render_prompt(request) }
            ],
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn generate(&self, request: &RemediationRequest) -> Result<RemediationAdvice, CompletionError> {
        let mut builder = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(request));
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(CompletionError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(CompletionError::Transport)?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::MissingContent)?;

        debug!(model = %self.model, length = content.len(), "Received remediation completion");
        parse_advice(&content)
    }
}

/// User prompt for a remediation request
pub fn render_prompt(request: &RemediationRequest) -> String {
    format!(
        "You will be given a policy definition and details about the non-compliant resource.\n\
         \n\
         Based on this information, generate clear and concise remediation steps and a \
         suggested exception request.\n\
         \n\
         Policy Definition: {}\n\
         Resource Details: {}\n\
         \n\
         Remediation Steps:\n\
         Exception Request:",
        request.policy_definition, request.resource_details
    )
}

/// Parse assistant content, tolerating a surrounding Markdown code fence
pub fn parse_advice(content: &str) -> Result<RemediationAdvice, CompletionError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(unfenced.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RemediationRequest {
        RemediationRequest::new(
            "Storage accounts should restrict network access",
            "stagestorage001 in eastus2 allows public network access",
        )
    }

    #[test]
    fn test_request_body_shape() {
        let client = ChatCompletionClient::new(&RemediationServiceConfig::default())
            .expect("client builds");
        let body = client.request_body(&request());

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["response_format"]["type"], "json_object");
        let user = body["messages"][1]["content"].as_str().expect("user prompt");
        assert!(user.contains("Policy Definition: Storage accounts should restrict network access"));
        assert!(user.contains("Resource Details: stagestorage001"));
    }

    #[test]
    fn test_parse_advice_accepts_fenced_json() {
        let advice = parse_advice(
            "```json\n{\"remediationSteps\": \"Disable public access\", \"exceptionRequest\": \"None\"}\n```",
        )
        .expect("fenced JSON parses");
        assert_eq!(advice.remediation_steps, "Disable public access");
        assert_eq!(advice.exception_request, "None");
    }

    #[test]
    fn test_parse_advice_rejects_partial_objects() {
        let result = parse_advice("{\"remediationSteps\": \"only steps\"}");
        assert!(matches!(result, Err(CompletionError::Parse(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RemediationServiceConfig {
            api_key: Some("sk-live-secret".to_string()),
            ..RemediationServiceConfig::default()
        };
        let client = ChatCompletionClient::new(&config).expect("client builds");
        assert!(!format!("{client:?}").contains("sk-live-secret"));
    }
}
