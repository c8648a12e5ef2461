//! Print the JSON Schema of the data-source settings document
//!
//! Usage: `cargo run --bin settings-schema > azure-data-sources.schema.json`

use anyhow::Result;
use policy_compliance_dashboard::datasource::ConfigurationSet;

fn main() -> Result<()> {
    let schema = schemars::schema_for!(ConfigurationSet);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
