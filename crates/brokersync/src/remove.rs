// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Removal mode.

use std::sync::Arc;

use brokersync_bulk::BulkOrchestrator;
use brokersync_core::{BrokerError, BrokerPlatform};

use crate::report::render_removal_report;

/// Removes `connection_id` from every organization in the group and prints the summary.
pub async fn run_remove(
    platform: Arc<dyn BrokerPlatform>,
    group_id: &str,
    connection_id: &str,
    dry_run: bool,
    use_color: bool,
) -> Result<(), BrokerError> {
    println!("\nRemoval mode: connection {connection_id} across group {group_id}");
    if dry_run {
        println!("DRY RUN ENABLED: No changes will be made");
    }

    let report = BulkOrchestrator::new(platform)
        .remove_connection_from_group(group_id, connection_id, dry_run)
        .await?;
    print!("{}", render_removal_report(&report, use_color));
    println!("\nRemoval process completed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brokersync_test_utils::MockPlatform;

    use super::*;

    #[tokio::test]
    async fn dry_run_issues_no_mutation() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .integration("a", "i1", "snyk-broker", Some("conn1"))
            .build();
        run_remove(Arc::new(platform.clone()), "g1", "conn1", true, false)
            .await
            .unwrap();
        assert!(platform.mutations().await.is_empty());
        assert_eq!(platform.integrations_of("a").await.len(), 1);
    }
}
