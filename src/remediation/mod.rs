//! # Remediation
//!
//! AI remediation advisor for non-compliant policies.
//!
//! - `model`: request and advice types, input length rules
//! - `client`: completion service trait and the chat completions client
//! - `advisor`: validation, generation and failure handling

pub mod advisor;
pub mod client;
pub mod model;

pub use advisor::{AdvisorError, RemediationAdvisor};
pub use client::{ChatCompletionClient, CompletionError, CompletionService};
pub use model::{RemediationAdvice, RemediationRequest};
