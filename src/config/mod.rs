//! # Configuration
//!
//! Process configuration for the dashboard server.

mod server;

pub use server::{RemediationServiceConfig, ServerConfig};
