// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The platform trait the bulk orchestrator is written against.

use async_trait::async_trait;

use crate::error::BrokerError;
use crate::types::{BrokerConnection, BrokerIntegration, Integration, Organization};

/// The subset of the remote API the bulk workflows need.
///
/// Implementations map non-2xx statuses onto empty / `false` results and
/// reserve `Err` for transport failures and configuration errors. Every call
/// runs to completion before the next one is issued.
#[async_trait]
pub trait BrokerPlatform: Send + Sync {
    /// Human-readable name of the backing implementation.
    fn name(&self) -> &str;

    /// All organizations in a group, in API order. Empty on 401/403/404.
    async fn list_group_organizations(
        &self,
        group_id: &str,
    ) -> Result<Vec<Organization>, BrokerError>;

    /// Whether the token can read the organization.
    async fn validate_organization_access(&self, org_id: &str) -> Result<bool, BrokerError>;

    /// Display name of an organization, falling back to the id itself.
    async fn get_organization_name(&self, org_id: &str) -> Result<String, BrokerError>;

    /// Broker connections owned by one organization, in API order.
    async fn list_broker_connections(
        &self,
        org_id: &str,
    ) -> Result<Vec<BrokerConnection>, BrokerError>;

    /// Every binding of any organization to `connection_id` (tenant scoped).
    async fn list_connection_integrations(
        &self,
        connection_id: &str,
    ) -> Result<Vec<BrokerIntegration>, BrokerError>;

    /// Binds `org_id` to the connection. `Ok(false)` on any non-201 status.
    async fn create_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_type: &str,
    ) -> Result<bool, BrokerError>;

    /// Removes one binding. `Ok(false)` on any non-204 status.
    async fn delete_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError>;

    /// Generic integrations of an organization.
    async fn list_integrations(&self, org_id: &str) -> Result<Vec<Integration>, BrokerError>;

    /// Updates the organization's broker integration with `settings`, or
    /// creates one when it has none. `Ok(false)` when the API refuses.
    async fn upsert_broker_integration(
        &self,
        org_id: &str,
        settings: &serde_json::Value,
    ) -> Result<bool, BrokerError>;

    /// Deletes a generic integration. `Ok(false)` on any non-204 status.
    async fn delete_integration(
        &self,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError>;
}
