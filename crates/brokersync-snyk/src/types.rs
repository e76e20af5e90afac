// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON:API wire types and their mapping onto domain records.
//!
//! Attribute decoding is lenient: absent or mistyped attributes fall back to
//! empty values rather than failing the whole listing.

use brokersync_core::{BrokerConnection, BrokerIntegration, Integration, Organization, Project, Target};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A JSON:API document whose `data` is an array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDocument {
    #[serde(default)]
    pub data: Vec<Resource>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// A JSON:API document whose `data` is a single resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleDocument {
    #[serde(default)]
    pub data: Option<Resource>,
}

/// Pagination links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

/// One JSON:API resource object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Value,
    #[serde(default)]
    pub relationships: Value,
    /// Non-standard top-level members (the broker integration listing uses these).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Decodes `attributes` into `T`, falling back to `T::default()`.
    pub fn attributes<T: DeserializeOwned + Default>(&self) -> T {
        if self.attributes.is_null() {
            return T::default();
        }
        serde_json::from_value(self.attributes.clone()).unwrap_or_else(|e| {
            debug!(id = %self.id, error = %e, "unexpected attribute shape, using defaults");
            T::default()
        })
    }

    /// A string member looked up at top level first, then under `attributes`.
    fn member(&self, key: &str) -> Option<String> {
        self.extra
            .get(key)
            .or_else(|| self.attributes.get(key))
            .and_then(Value::as_str)
            .map(String::from)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrgAttributes {
    name: String,
    slug: String,
    group_id: Option<String>,
    is_personal: bool,
    access_requests_enabled: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConnectionAttributes {
    name: String,
    connection_type: String,
    deployment_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntegrationAttributes {
    #[serde(rename = "type")]
    kind: String,
    settings: Value,
    broker_connection_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TargetAttributes {
    display_name: String,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectAttributes {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    status: String,
}

pub fn to_organization(resource: &Resource) -> Organization {
    let attrs: OrgAttributes = resource.attributes();
    Organization {
        id: resource.id.clone(),
        name: attrs.name,
        slug: attrs.slug,
        group_id: attrs.group_id.unwrap_or_default(),
        is_personal: attrs.is_personal,
        access_requests_enabled: attrs.access_requests_enabled,
        created_at: attrs.created_at,
        updated_at: attrs.updated_at,
    }
}

pub fn to_broker_connection(resource: &Resource) -> BrokerConnection {
    let attrs: ConnectionAttributes = resource.attributes();
    BrokerConnection {
        id: resource.id.clone(),
        name: attrs.name,
        connection_type: attrs.connection_type,
        deployment_id: attrs.deployment_id,
    }
}

pub fn to_broker_integration(resource: &Resource) -> BrokerIntegration {
    BrokerIntegration {
        id: resource.id.clone(),
        organization_id: resource.member("org_id").unwrap_or_default(),
        integration_type: resource.member("integration_type").unwrap_or_default(),
    }
}

pub fn to_integration(resource: &Resource, org_id: &str) -> Integration {
    let attrs: IntegrationAttributes = resource.attributes();
    let connection_id = attrs
        .broker_connection_id
        .or_else(|| {
            attrs
                .settings
                .get("broker_connection_id")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .or_else(|| {
            resource
                .relationships
                .pointer("/broker_connection/data/id")
                .and_then(Value::as_str)
                .map(String::from)
        });
    Integration {
        id: resource.id.clone(),
        organization_id: org_id.to_string(),
        integration_type: attrs.kind,
        settings: attrs.settings,
        connection_id,
    }
}

pub fn to_target(resource: &Resource) -> Target {
    let attrs: TargetAttributes = resource.attributes();
    Target {
        id: resource.id.clone(),
        display_name: attrs.display_name,
        url: attrs.url,
    }
}

pub fn to_project(resource: &Resource) -> Project {
    let attrs: ProjectAttributes = resource.attributes();
    Project {
        id: resource.id.clone(),
        name: attrs.name,
        project_type: attrs.kind,
        status: attrs.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(value: Value) -> Resource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn organization_from_resource() {
        let r = resource(json!({
            "id": "org-1",
            "type": "org",
            "attributes": {
                "name": "Payments",
                "slug": "payments",
                "group_id": "grp-1",
                "is_personal": false,
                "access_requests_enabled": true,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-02-01T00:00:00Z"
            }
        }));
        let org = to_organization(&r);
        assert_eq!(org.id, "org-1");
        assert_eq!(org.name, "Payments");
        assert_eq!(org.group_id, "grp-1");
        assert!(org.access_requests_enabled);
    }

    #[test]
    fn organization_tolerates_missing_attributes() {
        let org = to_organization(&resource(json!({"id": "org-2"})));
        assert_eq!(org.id, "org-2");
        assert_eq!(org.name, "");
        assert!(!org.is_personal);
    }

    #[test]
    fn organization_tolerates_null_group() {
        let org = to_organization(&resource(json!({
            "id": "org-3",
            "attributes": {"name": "Solo", "group_id": null}
        })));
        assert_eq!(org.name, "Solo");
        assert_eq!(org.group_id, "");
    }

    #[test]
    fn broker_integration_reads_top_level_members() {
        let r = resource(json!({
            "id": "int-1",
            "org_id": "org-9",
            "integration_type": "bitbucket-server"
        }));
        let bi = to_broker_integration(&r);
        assert_eq!(bi.organization_id, "org-9");
        assert_eq!(bi.integration_type, "bitbucket-server");
    }

    #[test]
    fn broker_integration_falls_back_to_attributes() {
        let r = resource(json!({
            "id": "int-2",
            "type": "broker_integration",
            "attributes": {"org_id": "org-5", "integration_type": "gitlab"}
        }));
        let bi = to_broker_integration(&r);
        assert_eq!(bi.organization_id, "org-5");
        assert_eq!(bi.integration_type, "gitlab");
    }

    #[test]
    fn integration_connection_link_sources() {
        let via_attr = resource(json!({
            "id": "i1", "attributes": {"type": "snyk-broker", "broker_connection_id": "c1"}
        }));
        let via_settings = resource(json!({
            "id": "i2", "attributes": {"type": "snyk-broker", "settings": {"broker_connection_id": "c2"}}
        }));
        let via_relationship = resource(json!({
            "id": "i3",
            "attributes": {"type": "snyk-broker"},
            "relationships": {"broker_connection": {"data": {"id": "c3", "type": "broker_connection"}}}
        }));
        assert_eq!(to_integration(&via_attr, "o").connection_id.as_deref(), Some("c1"));
        assert_eq!(to_integration(&via_settings, "o").connection_id.as_deref(), Some("c2"));
        assert_eq!(to_integration(&via_relationship, "o").connection_id.as_deref(), Some("c3"));
        assert_eq!(to_integration(&via_attr, "o").organization_id, "o");
    }

    #[test]
    fn list_document_without_links() {
        let doc: ListDocument = serde_json::from_value(json!({"data": [{"id": "a"}]})).unwrap();
        assert_eq!(doc.data.len(), 1);
        assert!(doc.links.is_none());
    }
}
