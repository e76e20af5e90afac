// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic organization-scoped integration CRUD.

use brokersync_core::{BrokerError, Integration};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{Pages, SnykClient};
use crate::orgs::data_on;
use crate::types::{Resource, to_integration};

/// Integration type used when creating a broker integration from scratch.
pub const BROKER_INTEGRATION_TYPE: &str = "snyk-broker";

impl SnykClient {
    /// Integrations of an organization; empty on any non-200.
    pub async fn list_integrations(&self, org_id: &str) -> Result<Vec<Integration>, BrokerError> {
        debug!(org_id, "fetching integrations");
        match self
            .get_all_pages(&["orgs", org_id, "integrations"], &self.version)
            .await?
        {
            Pages::Complete(resources) => {
                let integrations: Vec<Integration> =
                    resources.iter().map(|r| to_integration(r, org_id)).collect();
                debug!(org_id, count = integrations.len(), "found integrations");
                Ok(integrations)
            }
            Pages::Status(status) => {
                debug!(org_id, status = status.as_u16(), "integrations listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Integrations of an organization whose type matches the broker heuristic.
    pub async fn list_broker_integrations(
        &self,
        org_id: &str,
    ) -> Result<Vec<Integration>, BrokerError> {
        let brokers: Vec<Integration> = self
            .list_integrations(org_id)
            .await?
            .into_iter()
            .filter(Integration::is_broker)
            .collect();
        debug!(org_id, count = brokers.len(), "found broker integrations");
        Ok(brokers)
    }

    /// Creates an integration; returns the created record on 201.
    pub async fn create_integration(
        &self,
        org_id: &str,
        integration_type: &str,
        settings: &Value,
    ) -> Result<Option<Integration>, BrokerError> {
        debug!(org_id, integration_type, "creating integration");
        let url = self.url(
            &["orgs", org_id, "integrations"],
            &[("version", self.version.as_str())],
        )?;
        let body = json!({
            "data": {
                "type": "integration",
                "attributes": { "type": integration_type, "settings": settings }
            }
        });
        let response = self.send(Method::POST, url, Some(&body)).await?;
        self.integration_on(response.status, StatusCode::CREATED, response.body, org_id)
    }

    /// Replaces an integration's settings; returns the updated record on 200.
    pub async fn update_integration(
        &self,
        org_id: &str,
        integration_id: &str,
        settings: &Value,
    ) -> Result<Option<Integration>, BrokerError> {
        debug!(org_id, integration_id, "updating integration");
        let url = self.url(
            &["orgs", org_id, "integrations", integration_id],
            &[("version", self.version.as_str())],
        )?;
        let body = json!({
            "data": {
                "type": "integration",
                "id": integration_id,
                "attributes": { "settings": settings }
            }
        });
        let response = self.send(Method::PATCH, url, Some(&body)).await?;
        self.integration_on(response.status, StatusCode::OK, response.body, org_id)
    }

    /// Deletes an integration. `true` only on 204.
    pub async fn delete_integration(
        &self,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        debug!(org_id, integration_id, "deleting integration");
        let url = self.url(
            &["orgs", org_id, "integrations", integration_id],
            &[("version", self.version.as_str())],
        )?;
        let response = self.send(Method::DELETE, url, None).await?;
        let deleted = response.status == StatusCode::NO_CONTENT;
        if !deleted {
            debug!(org_id, integration_id, status = response.status.as_u16(), "integration deletion failed");
        }
        Ok(deleted)
    }

    /// Updates the first broker integration's settings, or creates a new one.
    pub async fn upsert_broker_integration(
        &self,
        org_id: &str,
        settings: &Value,
    ) -> Result<Option<Integration>, BrokerError> {
        let existing = self.list_broker_integrations(org_id).await?;
        match existing.first() {
            Some(integration) => {
                debug!(org_id, integration_id = %integration.id, "updating existing broker integration");
                self.update_integration(org_id, &integration.id, settings).await
            }
            None => {
                debug!(org_id, "creating new broker integration");
                self.create_integration(org_id, BROKER_INTEGRATION_TYPE, settings)
                    .await
            }
        }
    }

    fn integration_on(
        &self,
        status: StatusCode,
        expected: StatusCode,
        body: Value,
        org_id: &str,
    ) -> Result<Option<Integration>, BrokerError> {
        let Some(data) = data_on(status, expected, body) else {
            return Ok(None);
        };
        let resource: Resource =
            serde_json::from_value(data).map_err(|e| BrokerError::InvalidResponse {
                message: format!("failed to decode integration: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Some(to_integration(&resource, org_id)))
    }
}
