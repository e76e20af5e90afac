// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snyk REST API gateway for brokersync.
//!
//! This crate implements [`BrokerPlatform`] on top of [`SnykClient`], mapping
//! JSON:API responses onto the domain records in `brokersync-core` and hiding
//! pagination and dated API-version fallback from callers.

pub mod brokers;
pub mod client;
pub mod integrations;
pub mod orgs;
pub mod targets;
pub mod types;

use async_trait::async_trait;
use brokersync_config::ApiConfig;
use brokersync_core::{
    BrokerConnection, BrokerError, BrokerIntegration, BrokerPlatform, Integration, Organization,
};
use secrecy::SecretString;
use tracing::debug;

pub use client::{ApiResponse, JSON_API, SnykClient};
pub use integrations::BROKER_INTEGRATION_TYPE;

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "SNYK_TOKEN";

/// Resolves the API token.
///
/// # Resolution order
/// 1. `api.token` if set and non-blank
/// 2. `SNYK_TOKEN` environment variable
/// 3. Returns a configuration error if neither is available
pub fn resolve_token(api: &ApiConfig) -> Result<SecretString, BrokerError> {
    if let Some(token) = api.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(SecretString::from(token.to_string()));
    }
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => {
            debug!("using API token from {TOKEN_ENV_VAR}");
            Ok(SecretString::from(token))
        }
        _ => Err(BrokerError::Config(format!(
            "an API token is required: pass --snyk-token, set api.token or {TOKEN_ENV_VAR}"
        ))),
    }
}

impl SnykClient {
    /// Creates a client with the token resolved by [`resolve_token`].
    pub fn from_config(api: &ApiConfig) -> Result<Self, BrokerError> {
        Self::new(resolve_token(api)?, api)
    }
}

#[async_trait]
impl BrokerPlatform for SnykClient {
    fn name(&self) -> &str {
        "snyk"
    }

    async fn list_group_organizations(
        &self,
        group_id: &str,
    ) -> Result<Vec<Organization>, BrokerError> {
        SnykClient::list_group_organizations(self, group_id).await
    }

    async fn validate_organization_access(&self, org_id: &str) -> Result<bool, BrokerError> {
        SnykClient::validate_organization_access(self, org_id).await
    }

    async fn get_organization_name(&self, org_id: &str) -> Result<String, BrokerError> {
        SnykClient::get_organization_name(self, org_id).await
    }

    async fn list_broker_connections(
        &self,
        org_id: &str,
    ) -> Result<Vec<BrokerConnection>, BrokerError> {
        SnykClient::list_broker_connections(self, org_id).await
    }

    async fn list_connection_integrations(
        &self,
        connection_id: &str,
    ) -> Result<Vec<BrokerIntegration>, BrokerError> {
        SnykClient::list_connection_integrations(self, connection_id).await
    }

    async fn create_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_type: &str,
    ) -> Result<bool, BrokerError> {
        SnykClient::create_broker_integration(self, connection_id, org_id, integration_type).await
    }

    async fn delete_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        SnykClient::delete_broker_integration(self, connection_id, org_id, integration_id).await
    }

    async fn list_integrations(&self, org_id: &str) -> Result<Vec<Integration>, BrokerError> {
        SnykClient::list_integrations(self, org_id).await
    }

    async fn upsert_broker_integration(
        &self,
        org_id: &str,
        settings: &serde_json::Value,
    ) -> Result<bool, BrokerError> {
        Ok(SnykClient::upsert_broker_integration(self, org_id, settings)
            .await?
            .is_some())
    }

    async fn delete_integration(
        &self,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        SnykClient::delete_integration(self, org_id, integration_id).await
    }
}
