// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat records fetched from the platform.
//!
//! Every record is an immutable snapshot of one API response. Nothing is
//! cached between calls.

use serde::{Deserialize, Serialize};

/// An organization within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub group_id: String,
    pub is_personal: bool,
    pub access_requests_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Organization {
    /// Builds a record with only identity fields set (tests and fallbacks).
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: String::new(),
            group_id: String::new(),
            is_personal: false,
            access_requests_enabled: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// A reusable link to a deployed broker, owned by one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConnection {
    pub id: String,
    pub name: String,
    pub connection_type: String,
    pub deployment_id: String,
}

/// The binding of one organization to one broker connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerIntegration {
    pub id: String,
    pub organization_id: String,
    /// Source-control system identifier, e.g. `bitbucket-server`.
    pub integration_type: String,
}

/// A generic organization-scoped integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub organization_id: String,
    pub integration_type: String,
    #[serde(default)]
    pub settings: serde_json::Value,
    /// Broker connection this integration references, when the API exposes one.
    #[serde(default)]
    pub connection_id: Option<String>,
}

impl Integration {
    /// Broker integrations are identified by a type containing `broker`.
    pub fn is_broker(&self) -> bool {
        is_broker_type(&self.integration_type)
    }

    /// True when this is a broker integration tied to `connection_id`.
    pub fn references_connection(&self, connection_id: &str) -> bool {
        self.is_broker()
            && (self.id == connection_id
                || self.connection_id.as_deref() == Some(connection_id))
    }
}

/// Case-insensitive substring match on `broker`.
pub fn is_broker_type(integration_type: &str) -> bool {
    integration_type.to_ascii_lowercase().contains("broker")
}

/// A scan target (repository, image, ...) inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub display_name: String,
    pub url: Option<String>,
}

/// A project inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub project_type: String,
    pub status: String,
}
