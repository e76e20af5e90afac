// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory platform for deterministic workflow tests.
//!
//! `MockPlatform` implements `BrokerPlatform` over a small mutable model of
//! groups, connections, bindings and integrations. Every trait call is
//! recorded so tests can assert which mutations were (or were not) issued.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use brokersync_core::{
    BrokerConnection, BrokerError, BrokerIntegration, BrokerPlatform, Integration, Organization,
};

/// One recorded trait call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    ListGroupOrganizations(String),
    ValidateAccess(String),
    GetOrganizationName(String),
    ListBrokerConnections(String),
    ListConnectionIntegrations(String),
    CreateBrokerIntegration {
        connection_id: String,
        org_id: String,
        integration_type: String,
    },
    DeleteBrokerIntegration {
        connection_id: String,
        org_id: String,
        integration_id: String,
    },
    ListIntegrations(String),
    UpsertBrokerIntegration {
        org_id: String,
    },
    DeleteIntegration {
        org_id: String,
        integration_id: String,
    },
}

impl PlatformCall {
    /// True for calls that change remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateBrokerIntegration { .. }
                | Self::DeleteBrokerIntegration { .. }
                | Self::UpsertBrokerIntegration { .. }
                | Self::DeleteIntegration { .. }
        )
    }

    /// Organization a mutation targets, if this is one.
    pub fn mutated_org(&self) -> Option<&str> {
        match self {
            Self::CreateBrokerIntegration { org_id, .. }
            | Self::DeleteBrokerIntegration { org_id, .. }
            | Self::UpsertBrokerIntegration { org_id }
            | Self::DeleteIntegration { org_id, .. } => Some(org_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    connection_id: String,
    integration: BrokerIntegration,
}

#[derive(Debug, Default)]
struct State {
    groups: HashMap<String, Vec<Organization>>,
    connections: HashMap<String, Vec<BrokerConnection>>,
    bindings: Vec<Binding>,
    integrations: HashMap<String, Vec<Integration>>,
    denied: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_deletes: HashSet<String>,
    erroring: HashSet<String>,
    without_tenant: bool,
    next_id: usize,
    calls: Vec<PlatformCall>,
}

/// Builder for [`MockPlatform`].
#[derive(Debug, Default)]
pub struct MockPlatformBuilder {
    state: State,
}

impl MockPlatformBuilder {
    /// Add an organization to a group; listing order is insertion order.
    pub fn org(mut self, group_id: &str, org_id: &str, name: &str) -> Self {
        let mut org = Organization::named(org_id, name);
        org.group_id = group_id.to_string();
        self.state
            .groups
            .entry(group_id.to_string())
            .or_default()
            .push(org);
        self
    }

    /// Give an organization a broker connection.
    pub fn connection(mut self, org_id: &str, connection_id: &str) -> Self {
        self.state
            .connections
            .entry(org_id.to_string())
            .or_default()
            .push(BrokerConnection {
                id: connection_id.to_string(),
                name: format!("{connection_id}-name"),
                connection_type: "bitbucket-server".to_string(),
                deployment_id: format!("{connection_id}-deployment"),
            });
        self
    }

    /// Bind an organization to a connection.
    pub fn binding(
        mut self,
        connection_id: &str,
        org_id: &str,
        integration_id: &str,
        integration_type: &str,
    ) -> Self {
        self.state.bindings.push(Binding {
            connection_id: connection_id.to_string(),
            integration: BrokerIntegration {
                id: integration_id.to_string(),
                organization_id: org_id.to_string(),
                integration_type: integration_type.to_string(),
            },
        });
        self
    }

    /// Add a generic integration to an organization.
    pub fn integration(
        mut self,
        org_id: &str,
        integration_id: &str,
        integration_type: &str,
        connection_id: Option<&str>,
    ) -> Self {
        self.state
            .integrations
            .entry(org_id.to_string())
            .or_default()
            .push(Integration {
                id: integration_id.to_string(),
                organization_id: org_id.to_string(),
                integration_type: integration_type.to_string(),
                settings: serde_json::Value::Null,
                connection_id: connection_id.map(String::from),
            });
        self
    }

    /// Access validation for this organization returns `false`.
    pub fn deny(mut self, org_id: &str) -> Self {
        self.state.denied.insert(org_id.to_string());
        self
    }

    /// Broker integration creation or upsert for this organization returns `false`.
    pub fn fail_create(mut self, org_id: &str) -> Self {
        self.state.failing_creates.insert(org_id.to_string());
        self
    }

    /// Deleting this integration (binding or generic) returns `false`.
    pub fn fail_delete(mut self, integration_id: &str) -> Self {
        self.state.failing_deletes.insert(integration_id.to_string());
        self
    }

    /// Any organization-scoped call for this organization returns a transport error.
    pub fn error_on(mut self, org_id: &str) -> Self {
        self.state.erroring.insert(org_id.to_string());
        self
    }

    /// Tenant-scoped calls fail with a configuration error.
    pub fn without_tenant(mut self) -> Self {
        self.state.without_tenant = true;
        self
    }

    pub fn build(self) -> MockPlatform {
        MockPlatform {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

/// An in-memory [`BrokerPlatform`] with call capture.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    state: Arc<Mutex<State>>,
}

impl MockPlatform {
    pub fn builder() -> MockPlatformBuilder {
        MockPlatformBuilder::default()
    }

    /// Every call issued so far, in order.
    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().await.calls.clone()
    }

    /// Mutating calls issued so far, in order.
    pub async fn mutations(&self) -> Vec<PlatformCall> {
        self.calls()
            .await
            .into_iter()
            .filter(PlatformCall::is_mutation)
            .collect()
    }

    /// Current bindings on a connection.
    pub async fn bindings_for(&self, connection_id: &str) -> Vec<BrokerIntegration> {
        self.state
            .lock()
            .await
            .bindings
            .iter()
            .filter(|b| b.connection_id == connection_id)
            .map(|b| b.integration.clone())
            .collect()
    }

    /// Current generic integrations of an organization.
    pub async fn integrations_of(&self, org_id: &str) -> Vec<Integration> {
        self.state
            .lock()
            .await
            .integrations
            .get(org_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Forget recorded calls, keeping the model.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

fn transport_error(org_id: &str) -> BrokerError {
    BrokerError::Http {
        message: format!("connection reset while processing {org_id}"),
        source: None,
    }
}

fn tenant_error() -> BrokerError {
    BrokerError::Config("tenant id must be provided".into())
}

#[async_trait]
impl BrokerPlatform for MockPlatform {
    fn name(&self) -> &str {
        "mock-platform"
    }

    async fn list_group_organizations(
        &self,
        group_id: &str,
    ) -> Result<Vec<Organization>, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::ListGroupOrganizations(group_id.to_string()));
        Ok(state.groups.get(group_id).cloned().unwrap_or_default())
    }

    async fn validate_organization_access(&self, org_id: &str) -> Result<bool, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::ValidateAccess(org_id.to_string()));
        if state.erroring.contains(org_id) {
            return Err(transport_error(org_id));
        }
        Ok(!state.denied.contains(org_id))
    }

    async fn get_organization_name(&self, org_id: &str) -> Result<String, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::GetOrganizationName(org_id.to_string()));
        Ok(state
            .groups
            .values()
            .flatten()
            .find(|o| o.id == org_id)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| org_id.to_string()))
    }

    async fn list_broker_connections(
        &self,
        org_id: &str,
    ) -> Result<Vec<BrokerConnection>, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::ListBrokerConnections(org_id.to_string()));
        Ok(state.connections.get(org_id).cloned().unwrap_or_default())
    }

    async fn list_connection_integrations(
        &self,
        connection_id: &str,
    ) -> Result<Vec<BrokerIntegration>, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::ListConnectionIntegrations(connection_id.to_string()));
        if state.without_tenant {
            return Err(tenant_error());
        }
        Ok(state
            .bindings
            .iter()
            .filter(|b| b.connection_id == connection_id)
            .map(|b| b.integration.clone())
            .collect())
    }

    async fn create_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_type: &str,
    ) -> Result<bool, BrokerError> {
        let mut state = self.state.lock().await;
        state.calls.push(PlatformCall::CreateBrokerIntegration {
            connection_id: connection_id.to_string(),
            org_id: org_id.to_string(),
            integration_type: integration_type.to_string(),
        });
        if state.without_tenant {
            return Err(tenant_error());
        }
        if state.erroring.contains(org_id) {
            return Err(transport_error(org_id));
        }
        if state.failing_creates.contains(org_id) {
            return Ok(false);
        }
        state.next_id += 1;
        let id = format!("binding-{}", state.next_id);
        state.bindings.push(Binding {
            connection_id: connection_id.to_string(),
            integration: BrokerIntegration {
                id,
                organization_id: org_id.to_string(),
                integration_type: integration_type.to_string(),
            },
        });
        Ok(true)
    }

    async fn delete_broker_integration(
        &self,
        connection_id: &str,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        let mut state = self.state.lock().await;
        state.calls.push(PlatformCall::DeleteBrokerIntegration {
            connection_id: connection_id.to_string(),
            org_id: org_id.to_string(),
            integration_id: integration_id.to_string(),
        });
        if state.without_tenant {
            return Err(tenant_error());
        }
        if state.failing_deletes.contains(integration_id) {
            return Ok(false);
        }
        let before = state.bindings.len();
        state.bindings.retain(|b| {
            !(b.connection_id == connection_id
                && b.integration.organization_id == org_id
                && b.integration.id == integration_id)
        });
        Ok(state.bindings.len() < before)
    }

    async fn list_integrations(&self, org_id: &str) -> Result<Vec<Integration>, BrokerError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(PlatformCall::ListIntegrations(org_id.to_string()));
        if state.erroring.contains(org_id) {
            return Err(transport_error(org_id));
        }
        Ok(state.integrations.get(org_id).cloned().unwrap_or_default())
    }

    async fn upsert_broker_integration(
        &self,
        org_id: &str,
        settings: &serde_json::Value,
    ) -> Result<bool, BrokerError> {
        let mut state = self.state.lock().await;
        state.calls.push(PlatformCall::UpsertBrokerIntegration {
            org_id: org_id.to_string(),
        });
        if state.erroring.contains(org_id) {
            return Err(transport_error(org_id));
        }
        if state.failing_creates.contains(org_id) {
            return Ok(false);
        }
        state.next_id += 1;
        let new_id = format!("integration-{}", state.next_id);
        let integrations = state.integrations.entry(org_id.to_string()).or_default();
        match integrations.iter_mut().find(|i| i.is_broker()) {
            Some(existing) => existing.settings = settings.clone(),
            None => integrations.push(Integration {
                id: new_id,
                organization_id: org_id.to_string(),
                integration_type: "snyk-broker".to_string(),
                settings: settings.clone(),
                connection_id: settings
                    .get("broker_connection_id")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            }),
        }
        Ok(true)
    }

    async fn delete_integration(
        &self,
        org_id: &str,
        integration_id: &str,
    ) -> Result<bool, BrokerError> {
        let mut state = self.state.lock().await;
        state.calls.push(PlatformCall::DeleteIntegration {
            org_id: org_id.to_string(),
            integration_id: integration_id.to_string(),
        });
        if state.failing_deletes.contains(integration_id) {
            return Ok(false);
        }
        let Some(integrations) = state.integrations.get_mut(org_id) else {
            return Ok(false);
        };
        let before = integrations.len();
        integrations.retain(|i| i.id != integration_id);
        Ok(integrations.len() < before)
    }
}
