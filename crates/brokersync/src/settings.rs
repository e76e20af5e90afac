// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings mode: push one broker settings document to listed organizations.

use std::path::Path;
use std::sync::Arc;

use brokersync_bulk::BulkOrchestrator;
use brokersync_core::{BrokerError, BrokerPlatform};
use serde_json::Value;

use crate::report::render_configure_report;

/// Reads a JSON object of broker integration settings.
pub fn read_settings(path: &Path) -> Result<Value, BrokerError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| BrokerError::Config(format!("cannot read {}: {e}", path.display())))?;
    let settings: Value = serde_json::from_str(&raw)
        .map_err(|e| BrokerError::Config(format!("invalid JSON in {}: {e}", path.display())))?;
    if !settings.is_object() {
        return Err(BrokerError::Config(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(settings)
}

/// Applies `settings` to each of `org_ids` and prints the summary.
pub async fn run_settings(
    platform: Arc<dyn BrokerPlatform>,
    org_ids: &[String],
    settings: &Value,
    use_color: bool,
) -> Result<(), BrokerError> {
    if org_ids.is_empty() {
        return Err(BrokerError::Config("--org-ids is required with --broker-settings".into()));
    }
    println!("\nSettings mode: {} organizations", org_ids.len());

    let report = BulkOrchestrator::new(platform)
        .configure_settings_for_orgs(org_ids, settings)
        .await?;
    print!("{}", render_configure_report(&report, use_color));
    println!("\nBroker settings run completed!");
    Ok(())
}
