// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broker connections and the tenant-scoped broker integrations bound to them.

use brokersync_core::{BrokerConnection, BrokerError, BrokerIntegration};
use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::client::{Pages, SnykClient};
use crate::types::{to_broker_connection, to_broker_integration};

/// Path of one organization's binding under a tenant-scoped connection.
fn binding_segments<'a>(
    tenant_id: &'a str,
    connection_id: &'a str,
    org_id: &'a str,
    tail: &[&'a str],
) -> Vec<&'a str> {
    let mut segments = vec![
        "tenants",
        tenant_id,
        "brokers",
        "connections",
        connection_id,
        "orgs",
        org_id,
    ];
    segments.extend_from_slice(tail);
    segments
}

impl SnykClient {
    /// Broker connections owned by an organization; empty on any non-200.
    pub async fn list_broker_connections(
        &self,
        org_id: &str,
    ) -> Result<Vec<BrokerConnection>, BrokerError> {
        debug!(org_id, "fetching broker connections");
        match self
            .get_all_pages(&["orgs", org_id, "brokers", "connections"], &self.broker_version)
            .await?
        {
            Pages::Complete(resources) => {
                let connections: Vec<BrokerConnection> =
                    resources.iter().map(to_broker_connection).collect();
                debug!(org_id, count = connections.len(), "found broker connections");
                Ok(connections)
            }
            Pages::Status(status) => {
                debug!(org_id, status = status.as_u16(), "broker connections listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Every organization binding of a connection, across the tenant.
    ///
    /// Fails with a configuration error when no tenant id is configured.
    pub async fn list_connection_integrations(
        &self,
        connection_id: &str,
    ) -> Result<Vec<BrokerIntegration>, BrokerError> {
        let tenant_id = self.tenant_id()?;
        debug!(connection_id, "fetching integrations for broker connection");
        let segments = [
            "tenants",
            tenant_id,
            "brokers",
            "connections",
            connection_id,
            "integrations",
        ];
        match self.get_all_pages(&segments, &self.broker_version).await? {
            Pages::Complete(resources) => {
                let bindings: Vec<BrokerIntegration> =
                    resources.iter().map(to_broker_integration).collect();
                debug!(connection_id, count = bindings.len(), "found connection integrations");
                Ok(bindings)
            }
            Pages::Status(status) => {
                debug!(
                    connection_id,
                    status = status.as_u16(),
                    "connection integrations listing failed"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Binds an organization to a connection. `true` only on 201.
    pub async fn create_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_type: &str,
    ) -> Result<bool, BrokerError> {
        let tenant_id = self.tenant_id()?;
        debug!(connection_id, org_id, integration_type, "creating broker integration");
        let url = self.url(
            &binding_segments(tenant_id, connection_id, org_id, &["integration"]),
            &[("version", self.broker_version.as_str())],
        )?;
        let body = json!({ "data": { "type": integration_type } });
        let response = self.send(Method::POST, url, Some(&body)).await?;
        let created = response.status == StatusCode::CREATED;
        if !created {
            debug!(
                org_id,
                status = response.status.as_u16(),
                body = %response.text(),
                "broker integration creation failed"
            );
        }
        Ok(created)
    }

    /// Removes an organization's binding to a connection. `true` only on 204.
    pub async fn delete_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        let tenant_id = self.tenant_id()?;
        debug!(connection_id, org_id, integration_id, "deleting broker integration");
        let url = self.url(
            &binding_segments(tenant_id, connection_id, org_id, &["integrations", integration_id]),
            &[("version", self.broker_version.as_str())],
        )?;
        let response = self.send(Method::DELETE, url, None).await?;
        let deleted = response.status == StatusCode::NO_CONTENT;
        if !deleted {
            debug!(
                org_id,
                integration_id,
                status = response.status.as_u16(),
                "broker integration deletion failed"
            );
        }
        Ok(deleted)
    }
}
