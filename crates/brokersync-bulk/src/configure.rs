// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replicating a broker connection across a group.

use brokersync_core::{
    BrokerError, BrokerIntegration, ConfigurePreview, ConfigureReport, OperationResult,
    Organization,
};
use tracing::{debug, error, info, warn};

use crate::{ACCESS_DENIED, BulkOrchestrator, exclude_source, id_set};

/// Everything a configure run needs, resolved before any mutation.
struct Plan {
    connection_id: String,
    source_integration: BrokerIntegration,
    targets: Vec<Organization>,
    stale_bindings: Vec<BrokerIntegration>,
}

impl BulkOrchestrator {
    /// Replicates the source organization's broker connection to every other
    /// organization in the group.
    ///
    /// Returns an empty report without touching anything when the group has
    /// no organizations, the source has no broker connection, or the source is
    /// not itself bound to the connection. Existing bindings in target
    /// organizations are deleted first; failures there become `warnings`.
    /// The source organization is never mutated.
    pub async fn configure_for_group(
        &self,
        group_id: &str,
        source_org_id: &str,
        connection_id: Option<&str>,
    ) -> Result<ConfigureReport, BrokerError> {
        info!(group_id, source_org_id, "configuring broker connection for group");
        let Some(plan) = self.plan(group_id, source_org_id, connection_id).await? else {
            return Ok(ConfigureReport::empty());
        };

        let mut report = ConfigureReport {
            connection_id: Some(plan.connection_id.clone()),
            integration_type: Some(plan.source_integration.integration_type.clone()),
            ..ConfigureReport::empty()
        };

        for binding in &plan.stale_bindings {
            if let Some(warning) = self.delete_stale(&plan.connection_id, binding).await {
                warn!(
                    org_id = %binding.organization_id,
                    integration_id = %binding.id,
                    "{warning}"
                );
                report.warnings.push(warning);
            }
        }

        for org in &plan.targets {
            let result = match self
                .configure_org(org, &plan.connection_id, &plan.source_integration.integration_type)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    error!(org_id = %org.id, error = %e, "failed to configure organization");
                    OperationResult::failed(org, e.to_string())
                }
            };
            report.record(result);
        }

        info!(
            success = report.success.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            "group configuration finished"
        );
        Ok(report)
    }

    /// What [`configure_for_group`](Self::configure_for_group) would do, with
    /// no mutation. `None` under the same preconditions that abort a run.
    pub async fn preview_configure(
        &self,
        group_id: &str,
        source_org_id: &str,
        connection_id: Option<&str>,
    ) -> Result<Option<ConfigurePreview>, BrokerError> {
        let plan = self.plan(group_id, source_org_id, connection_id).await?;
        Ok(plan.map(|plan| ConfigurePreview {
            connection_id: plan.connection_id,
            integration_type: plan.source_integration.integration_type,
            targets: plan.targets,
            stale_bindings: plan.stale_bindings,
        }))
    }

    async fn plan(
        &self,
        group_id: &str,
        source_org_id: &str,
        connection_id: Option<&str>,
    ) -> Result<Option<Plan>, BrokerError> {
        if source_org_id.trim().is_empty() {
            return Err(BrokerError::Config("source organization id must be provided".into()));
        }

        let orgs = self.platform.list_group_organizations(group_id).await?;
        if orgs.is_empty() {
            error!(group_id, "no organizations found in group");
            return Ok(None);
        }
        debug!(group_id, count = orgs.len(), "found organizations in group");

        let connection_id = match connection_id {
            Some(id) => id.to_string(),
            None => {
                let connections = self.platform.list_broker_connections(source_org_id).await?;
                let Some(first) = connections.into_iter().next() else {
                    error!(source_org_id, "no broker connections found in source organization");
                    return Ok(None);
                };
                info!(connection_id = %first.id, name = %first.name, "using first broker connection");
                first.id
            }
        };

        let bindings = self
            .platform
            .list_connection_integrations(&connection_id)
            .await?;
        let Some(source_integration) = bindings
            .iter()
            .find(|b| b.organization_id == source_org_id)
            .cloned()
        else {
            error!(
                %connection_id,
                source_org_id,
                "source organization is not bound to the broker connection"
            );
            return Ok(None);
        };
        debug!(
            %connection_id,
            integration_type = %source_integration.integration_type,
            "resolved source integration"
        );

        let targets = exclude_source(orgs, source_org_id);
        let target_ids = id_set(&targets);
        let stale_bindings: Vec<BrokerIntegration> = bindings
            .iter()
            .filter(|b| {
                b.organization_id != source_org_id
                    && target_ids.contains(b.organization_id.as_str())
            })
            .cloned()
            .collect();

        Ok(Some(Plan {
            connection_id,
            source_integration,
            targets,
            stale_bindings,
        }))
    }

    /// Deletes one stale binding; returns a warning line on failure.
    async fn delete_stale(&self, connection_id: &str, binding: &BrokerIntegration) -> Option<String> {
        debug!(org_id = %binding.organization_id, integration_id = %binding.id, "deleting existing integration");
        match self
            .platform
            .delete_broker_integration(connection_id, &binding.organization_id, &binding.id)
            .await
        {
            Ok(true) => None,
            Ok(false) => Some(format!(
                "failed to delete integration {} from organization {}",
                binding.id, binding.organization_id
            )),
            Err(e) => Some(format!(
                "failed to delete integration {} from organization {}: {e}",
                binding.id, binding.organization_id
            )),
        }
    }

    async fn configure_org(
        &self,
        org: &Organization,
        connection_id: &str,
        integration_type: &str,
    ) -> Result<OperationResult, BrokerError> {
        debug!(org_id = %org.id, name = %org.name, "processing organization");
        if !self.platform.validate_organization_access(&org.id).await? {
            warn!(org_id = %org.id, "skipping organization: access denied");
            return Ok(OperationResult::skipped(org, ACCESS_DENIED));
        }

        let created = self
            .platform
            .create_broker_integration(connection_id, &org.id, integration_type)
            .await?;
        if created {
            info!(org_id = %org.id, name = %org.name, "created broker integration");
            Ok(OperationResult::success(org))
        } else {
            warn!(org_id = %org.id, "broker integration creation failed");
            Ok(OperationResult::failed(org, "Failed to create integration"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brokersync_test_utils::{MockPlatform, PlatformCall};
    use tracing_test::traced_test;

    use crate::BulkOrchestrator;

    fn orchestrator(platform: &MockPlatform) -> BulkOrchestrator {
        BulkOrchestrator::new(Arc::new(platform.clone()))
    }

    fn group() -> brokersync_test_utils::MockPlatformBuilder {
        MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .org("g1", "c", "Gamma")
            .connection("a", "conn1")
            .binding("conn1", "a", "src", "bitbucket-server")
    }

    #[tokio::test]
    async fn replicates_to_every_target() {
        let platform = group().binding("conn1", "b", "stale", "bitbucket-server").build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();

        let ok: Vec<&str> = report.success.iter().map(|r| r.organization_id.as_str()).collect();
        assert_eq!(ok, ["b", "c"]);
        assert!(report.failed.is_empty());
        assert!(report.skipped.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.connection_id.as_deref(), Some("conn1"));
        assert_eq!(report.integration_type.as_deref(), Some("bitbucket-server"));

        let mutations = platform.mutations().await;
        assert_eq!(
            mutations[0],
            PlatformCall::DeleteBrokerIntegration {
                connection_id: "conn1".into(),
                org_id: "b".into(),
                integration_id: "stale".into(),
            }
        );
        assert_eq!(mutations.len(), 3);
        assert!(mutations.iter().all(|m| m.mutated_org() != Some("a")));
    }

    #[tokio::test]
    async fn explicit_connection_skips_lookup() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .binding("conn9", "a", "src", "github-enterprise")
            .build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", Some("conn9"))
            .await
            .unwrap();

        assert_eq!(report.success.len(), 1);
        assert_eq!(report.integration_type.as_deref(), Some("github-enterprise"));
        assert!(!platform
            .calls()
            .await
            .iter()
            .any(|c| matches!(c, PlatformCall::ListBrokerConnections(_))));
    }

    #[tokio::test]
    async fn empty_group_aborts() {
        let platform = MockPlatform::builder().connection("a", "conn1").build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(report.connection_id.is_none());
        assert_eq!(platform.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn source_without_connection_aborts() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(platform.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn unbound_source_aborts_without_changes() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "Alpha")
            .org("g1", "b", "Beta")
            .connection("a", "conn1")
            .binding("conn1", "b", "stale", "github")
            .build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(platform.mutations().await.is_empty());
        assert_eq!(platform.bindings_for("conn1").await.len(), 1);
    }

    #[tokio::test]
    async fn denied_org_is_skipped() {
        let platform = group().deny("b").build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].organization_id, "b");
        assert_eq!(report.skipped[0].reason.as_deref(), Some("Access denied"));
        assert_eq!(report.success.len(), 1);
    }

    #[tokio::test]
    async fn creation_failure_and_error_are_isolated() {
        let platform = group().fail_create("b").error_on("c").org("g1", "d", "Delta").build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();

        let failed: Vec<&str> = report.failed.iter().map(|r| r.organization_id.as_str()).collect();
        assert_eq!(failed, ["b", "c"]);
        assert_eq!(report.failed[0].reason.as_deref(), Some("Failed to create integration"));
        assert!(report.failed[1]
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("connection reset")));
        assert_eq!(report.success.len(), 1);
        assert_eq!(report.success[0].organization_id, "d");
    }

    #[tokio::test]
    #[traced_test]
    async fn deletion_failure_becomes_warning() {
        let platform = group()
            .binding("conn1", "b", "stale", "bitbucket-server")
            .fail_delete("stale")
            .build();
        let report = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("stale"));
        assert_eq!(report.success.len(), 2);
        assert!(logs_contain("failed to delete integration stale"));
    }

    #[tokio::test]
    async fn bindings_outside_group_are_left_alone() {
        let platform = group().binding("conn1", "elsewhere", "other", "bitbucket-server").build();
        orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap();
        let bindings = platform.bindings_for("conn1").await;
        assert!(bindings.iter().any(|b| b.id == "other"));
    }

    #[tokio::test]
    async fn missing_tenant_propagates() {
        let platform = group().without_tenant().build();
        let err = orchestrator(&platform)
            .configure_for_group("g1", "a", None)
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn blank_source_is_a_config_error() {
        let platform = group().build();
        let err = orchestrator(&platform)
            .configure_for_group("g1", " ", None)
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn preview_reports_plan_without_mutation() {
        let platform = group().binding("conn1", "c", "stale", "bitbucket-server").build();
        let preview = orchestrator(&platform)
            .preview_configure("g1", "a", None)
            .await
            .unwrap()
            .expect("preview");

        assert_eq!(preview.connection_id, "conn1");
        assert_eq!(preview.integration_type, "bitbucket-server");
        let targets: Vec<&str> = preview.targets.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(targets, ["b", "c"]);
        assert_eq!(preview.stale_bindings.len(), 1);
        assert_eq!(preview.stale_bindings[0].organization_id, "c");
        assert!(platform.mutations().await.is_empty());
    }

    #[tokio::test]
    async fn preview_is_none_when_run_would_abort() {
        let platform = MockPlatform::builder().org("g1", "a", "Alpha").build();
        let preview = orchestrator(&platform)
            .preview_configure("g1", "a", None)
            .await
            .unwrap();
        assert!(preview.is_none());
    }
}
