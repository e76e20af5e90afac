// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Removing a broker connection from every organization in a group.

use brokersync_core::{BrokerError, Integration, OperationResult, Organization, RemovalReport};
use tracing::{debug, error, info, warn};

use crate::{BulkOrchestrator, CONNECTION_NOT_FOUND};

impl BulkOrchestrator {
    /// Deletes every broker integration tied to `connection_id` across the group.
    ///
    /// An integration matches when its type contains `broker` and either its
    /// id is the connection id or it references the connection. With
    /// `dry_run` no delete is issued and each organization reports the count
    /// that would be removed.
    pub async fn remove_connection_from_group(
        &self,
        group_id: &str,
        connection_id: &str,
        dry_run: bool,
    ) -> Result<RemovalReport, BrokerError> {
        if connection_id.trim().is_empty() {
            return Err(BrokerError::Config("connection id must be provided".into()));
        }
        info!(group_id, connection_id, dry_run, "removing broker connection from group");

        let mut report = RemovalReport::new(dry_run);
        let orgs = self.platform.list_group_organizations(group_id).await?;
        if orgs.is_empty() {
            error!(group_id, "no organizations found in group");
            return Ok(report);
        }

        for org in &orgs {
            let result = match self.remove_from_org(org, connection_id, dry_run).await {
                Ok(result) => result,
                Err(e) => {
                    error!(org_id = %org.id, error = %e, "failed to process organization");
                    OperationResult::failed(org, e.to_string())
                }
            };
            report.record(result);
        }

        info!(
            success = report.success.len(),
            failed = report.failed.len(),
            not_found = report.not_found.len(),
            integrations = report.total_integrations(),
            dry_run,
            "connection removal finished"
        );
        Ok(report)
    }

    async fn remove_from_org(
        &self,
        org: &Organization,
        connection_id: &str,
        dry_run: bool,
    ) -> Result<OperationResult, BrokerError> {
        let matching: Vec<Integration> = self
            .platform
            .list_integrations(&org.id)
            .await?
            .into_iter()
            .filter(|i| i.references_connection(connection_id))
            .collect();

        if matching.is_empty() {
            debug!(org_id = %org.id, connection_id, "no integrations for connection");
            return Ok(OperationResult::not_found(org, CONNECTION_NOT_FOUND));
        }

        if dry_run {
            info!(org_id = %org.id, count = matching.len(), "would remove integrations");
            return Ok(OperationResult::success_with_count(org, matching.len()));
        }

        let mut failures = Vec::new();
        for integration in &matching {
            match self.platform.delete_integration(&org.id, &integration.id).await {
                Ok(true) => debug!(org_id = %org.id, integration_id = %integration.id, "removed integration"),
                Ok(false) => failures.push(integration.id.clone()),
                Err(e) => {
                    warn!(org_id = %org.id, integration_id = %integration.id, error = %e, "integration deletion errored");
                    failures.push(integration.id.clone());
                }
            }
        }

        if failures.is_empty() {
            info!(org_id = %org.id, count = matching.len(), "removed integrations");
            Ok(OperationResult::success_with_count(org, matching.len()))
        } else {
            warn!(org_id = %org.id, failed = failures.len(), "some integrations could not be removed");
            Ok(OperationResult::failed(
                org,
                format!(
                    "Failed to remove {} of {} integrations: {}",
                    failures.len(),
                    matching.len(),
                    failures.join(", ")
                ),
            ))
        }
    }
}
