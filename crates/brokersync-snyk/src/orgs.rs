// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Organization listing, access checks, details and settings.

use brokersync_core::{BrokerError, Organization};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{Pages, SnykClient};
use crate::types::{ListDocument, SingleDocument, to_organization};

impl SnykClient {
    /// Organizations visible to the token (first page only).
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, BrokerError> {
        debug!("fetching organizations");
        let response = self.get(&["orgs"], &self.version).await?;
        if response.status != StatusCode::OK {
            debug!(status = response.status.as_u16(), "organizations listing failed");
            return Ok(Vec::new());
        }
        let document: ListDocument = response.decode()?;
        let orgs: Vec<Organization> = document.data.iter().map(to_organization).collect();
        debug!(count = orgs.len(), "found organizations");
        Ok(orgs)
    }

    /// Every organization in a group, following `links.next` to the end.
    ///
    /// 401, 403 and 404 (and any other non-200 status) yield an empty list:
    /// callers cannot tell "no access" from "empty group".
    pub async fn list_group_organizations(
        &self,
        group_id: &str,
    ) -> Result<Vec<Organization>, BrokerError> {
        if group_id.trim().is_empty() {
            return Err(BrokerError::Config("group id must be provided".into()));
        }
        debug!(group_id, "fetching organizations for group");

        match self
            .get_all_pages(&["groups", group_id, "orgs"], &self.version)
            .await?
        {
            Pages::Complete(resources) => {
                let orgs: Vec<Organization> = resources.iter().map(to_organization).collect();
                debug!(group_id, count = orgs.len(), "fetched group organizations");
                Ok(orgs)
            }
            Pages::Status(status) => {
                match status.as_u16() {
                    404 => debug!(group_id, "group not found"),
                    401 | 403 => debug!(group_id, "access denied to group"),
                    code => debug!(group_id, status = code, "group organizations listing failed"),
                }
                Ok(Vec::new())
            }
        }
    }

    /// Tries the organization with each fallback version in order.
    ///
    /// 200 grants access; 401/403 denies it immediately; 404 and any other
    /// status move on to the next version. Exhausting the list denies access.
    pub async fn validate_organization_access(&self, org_id: &str) -> Result<bool, BrokerError> {
        debug!(org_id, "validating organization access");
        for version in &self.fallback_versions {
            let response = self.get(&["orgs", org_id], version).await?;
            match response.status.as_u16() {
                200 => {
                    debug!(org_id, version = %version, "organization accessible");
                    return Ok(true);
                }
                401 | 403 => {
                    debug!(org_id, version = %version, "access denied to organization");
                    return Ok(false);
                }
                404 => debug!(org_id, version = %version, "organization not found with version"),
                code => debug!(org_id, version = %version, status = code, "unexpected status probing organization"),
            }
        }

        debug!(org_id, "organization access failed with all API versions");
        Ok(false)
    }

    /// Organization details from a single versioned request; `None` on any non-200.
    pub async fn get_organization_details(
        &self,
        org_id: &str,
    ) -> Result<Option<Organization>, BrokerError> {
        debug!(org_id, "fetching organization details");
        let response = self.get(&["orgs", org_id], &self.version).await?;
        if response.status != StatusCode::OK {
            return Ok(None);
        }
        let document: SingleDocument = response.decode()?;
        Ok(document.data.as_ref().map(to_organization))
    }

    /// Organization name, or the id itself when details are unavailable.
    pub async fn get_organization_name(&self, org_id: &str) -> Result<String, BrokerError> {
        Ok(self
            .get_organization_details(org_id)
            .await?
            .map(|org| org.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| org_id.to_string()))
    }

    /// Raw organization settings resource; `None` on any non-200.
    pub async fn get_organization_settings(
        &self,
        org_id: &str,
    ) -> Result<Option<Value>, BrokerError> {
        debug!(org_id, "fetching organization settings");
        let response = self
            .get(&["orgs", org_id, "settings"], &self.version)
            .await?;
        Ok(data_on(response.status, StatusCode::OK, response.body))
    }

    /// Patches organization settings; returns the updated resource on 200.
    pub async fn update_organization_settings(
        &self,
        org_id: &str,
        settings: &Value,
    ) -> Result<Option<Value>, BrokerError> {
        debug!(org_id, "updating organization settings");
        let url = self.url(
            &["orgs", org_id, "settings"],
            &[("version", self.version.as_str())],
        )?;
        let body = json!({ "data": { "type": "settings", "attributes": settings } });
        let response = self.send(Method::PATCH, url, Some(&body)).await?;
        Ok(data_on(response.status, StatusCode::OK, response.body))
    }
}

/// The `data` member of `body` when `status` matches `expected`.
pub(crate) fn data_on(status: StatusCode, expected: StatusCode, body: Value) -> Option<Value> {
    if status != expected {
        return None;
    }
    match body {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    }
}
