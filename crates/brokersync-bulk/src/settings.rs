// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pushing one set of broker integration settings to a list of organizations.

use brokersync_core::{BrokerError, ConfigureReport, OperationResult, Organization};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::BulkOrchestrator;

/// Reason recorded for organizations skipped by the settings run.
pub const NOT_ACCESSIBLE: &str = "Organization not accessible";

/// Reason recorded when the platform refuses the upsert.
pub const UPSERT_FAILED: &str = "Failed to configure broker integration";

impl BulkOrchestrator {
    /// Updates or creates the broker integration of every organization in
    /// `org_ids` with `settings`, in the given order.
    ///
    /// Inaccessible organizations are skipped. An error while handling one
    /// organization marks it failed and the run continues.
    pub async fn configure_settings_for_orgs(
        &self,
        org_ids: &[String],
        settings: &Value,
    ) -> Result<ConfigureReport, BrokerError> {
        info!(count = org_ids.len(), "configuring broker settings for organizations");
        let mut report = ConfigureReport::empty();

        for (i, org_id) in org_ids.iter().enumerate() {
            debug!(org_id = %org_id, index = i + 1, total = org_ids.len(), "processing organization");
            let result = match self.apply_settings(org_id, settings).await {
                Ok(result) => result,
                Err(e) => {
                    error!(org_id = %org_id, error = %e, "failed to configure organization");
                    let org = self.named_org(org_id).await;
                    OperationResult::failed(&org, e.to_string())
                }
            };
            report.record(result);
        }

        info!(
            success = report.success.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "broker settings run finished"
        );
        Ok(report)
    }

    async fn apply_settings(
        &self,
        org_id: &str,
        settings: &Value,
    ) -> Result<OperationResult, BrokerError> {
        if !self.platform.validate_organization_access(org_id).await? {
            warn!(org_id, "organization not accessible, skipping");
            return Ok(OperationResult::skipped(&Organization::named(org_id, org_id), NOT_ACCESSIBLE));
        }

        let configured = self.platform.upsert_broker_integration(org_id, settings).await?;
        let org = self.named_org(org_id).await;
        if configured {
            info!(org_id, "broker integration configured");
            Ok(OperationResult::success(&org))
        } else {
            warn!(org_id, "broker integration upsert refused");
            Ok(OperationResult::failed(&org, UPSERT_FAILED))
        }
    }

    /// Identity record with the display name, or the id when the lookup fails.
    async fn named_org(&self, org_id: &str) -> Organization {
        let name = match self.platform.get_organization_name(org_id).await {
            Ok(name) => name,
            Err(e) => {
                debug!(org_id, error = %e, "organization name lookup failed");
                org_id.to_string()
            }
        };
        Organization::named(org_id, name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brokersync_test_utils::{MockPlatform, PlatformCall};
    use serde_json::json;

    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn each_outcome_is_recorded_with_names() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .org("g1", "c", "Gamma")
            .integration("a", "i1", "snyk-broker", None)
            .deny("b")
            .fail_create("c")
            .build();
        let settings = json!({"broker_token": "tok"});

        let report = BulkOrchestrator::new(Arc::new(platform.clone()))
            .configure_settings_for_orgs(&ids(&["a", "b", "c"]), &settings)
            .await
            .unwrap();

        assert_eq!(report.success.len(), 1);
        assert_eq!(report.success[0].organization_name, "Alpha");
        assert_eq!(report.skipped[0].organization_id, "b");
        assert_eq!(report.skipped[0].reason.as_deref(), Some(NOT_ACCESSIBLE));
        assert_eq!(report.failed[0].organization_name, "Gamma");
        assert_eq!(report.failed[0].reason.as_deref(), Some(UPSERT_FAILED));

        assert_eq!(platform.integrations_of("a").await[0].settings, settings);
        assert!(platform.integrations_of("c").await.is_empty());
    }

    #[tokio::test]
    async fn denied_org_gets_no_mutation() {
        let platform = MockPlatform::builder().org("g1", "b", "Beta").deny("b").build();
        let report = BulkOrchestrator::new(Arc::new(platform.clone()))
            .configure_settings_for_orgs(&ids(&["b"]), &json!({}))
            .await
            .unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert!(platform.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn error_in_one_org_does_not_stop_the_run() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .error_on("a")
            .build();
        let report = BulkOrchestrator::new(Arc::new(platform.clone()))
            .configure_settings_for_orgs(&ids(&["a", "b"]), &json!({"k": "v"}))
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].organization_id, "a");
        assert_eq!(report.failed[0].organization_name, "Alpha");
        assert!(report.failed[0].reason.as_deref().unwrap_or_default().contains("connection reset"));
        assert_eq!(report.success.len(), 1);
        assert_eq!(report.success[0].organization_id, "b");
        assert_eq!(
            platform.mutations().await,
            [PlatformCall::UpsertBrokerIntegration { org_id: "b".into() }]
        );
    }

    #[tokio::test]
    async fn empty_list_is_an_empty_report() {
        let platform = MockPlatform::builder().build();
        let report = BulkOrchestrator::new(Arc::new(platform.clone()))
            .configure_settings_for_orgs(&[], &json!({}))
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(platform.calls().await.is_empty());
    }
}
