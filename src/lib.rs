//! Policy Compliance Dashboard Library
//!
//! Core functionality for the Azure Policy compliance dashboard: data-source
//! settings, compliance views, the remediation advisor and the HTTP API.
//! Tests are included in the module files and under `tests/`.

pub mod compliance;
pub mod config;
pub mod constants;
pub mod datasource;
pub mod observability;
pub mod remediation;
pub mod server;
