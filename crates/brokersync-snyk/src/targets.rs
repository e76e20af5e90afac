// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Target and project listings.

use brokersync_core::{BrokerError, Project, Target};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::SnykClient;
use crate::types::{ListDocument, SingleDocument, to_project, to_target};

impl SnykClient {
    /// Targets of an organization, probing each fallback version in order.
    ///
    /// Returns an empty list when the organization is not accessible or no
    /// version answers with 200.
    pub async fn list_targets(&self, org_id: &str) -> Result<Vec<Target>, BrokerError> {
        debug!(org_id, "fetching targets");
        if !self.validate_organization_access(org_id).await? {
            debug!(org_id, "organization is not accessible");
            return Ok(Vec::new());
        }

        for version in &self.fallback_versions {
            if let Some(targets) = self.list_targets_with_version(org_id, version).await? {
                debug!(org_id, version = %version, count = targets.len(), "fetched targets");
                return Ok(targets);
            }
        }

        debug!(org_id, "failed to fetch targets with all API versions");
        Ok(Vec::new())
    }

    async fn list_targets_with_version(
        &self,
        org_id: &str,
        version: &str,
    ) -> Result<Option<Vec<Target>>, BrokerError> {
        let response = self.get(&["orgs", org_id, "targets"], version).await?;
        if response.status != StatusCode::OK {
            debug!(org_id, version, status = response.status.as_u16(), "targets listing failed");
            return Ok(None);
        }
        let document: ListDocument = response.decode()?;
        Ok(Some(document.data.iter().map(to_target).collect()))
    }

    /// Projects of an organization; empty on any non-200.
    pub async fn list_projects(&self, org_id: &str) -> Result<Vec<Project>, BrokerError> {
        debug!(org_id, "fetching projects");
        let response = self
            .get(&["orgs", org_id, "projects"], &self.version)
            .await?;
        if response.status != StatusCode::OK {
            return Ok(Vec::new());
        }
        let document: ListDocument = response.decode()?;
        let projects: Vec<Project> = document.data.iter().map(to_project).collect();
        debug!(org_id, count = projects.len(), "found projects");
        Ok(projects)
    }

    /// One project; `None` on any non-200.
    pub async fn get_project_details(
        &self,
        org_id: &str,
        project_id: &str,
    ) -> Result<Option<Project>, BrokerError> {
        debug!(org_id, project_id, "fetching project details");
        let response = self
            .get(&["orgs", org_id, "projects", project_id], &self.version)
            .await?;
        if response.status != StatusCode::OK {
            return Ok(None);
        }
        let document: SingleDocument = response.decode()?;
        Ok(document.data.as_ref().map(to_project))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_support::test_client;

    async fn grant_access(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "o1"}})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn targets_fall_back_to_older_version() {
        let server = MockServer::start().await;
        grant_access(&server).await;

        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1/targets"))
            .and(query_param("version", "2024-10-15"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1/targets"))
            .and(query_param("version", "2023-05-29"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "t1", "type": "target", "attributes": {"display_name": "org/repo", "url": "https://git.example.com/org/repo"}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let targets = client.list_targets("o1").await.unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].display_name, "org/repo");
    }

    #[tokio::test]
    async fn targets_skip_inaccessible_org() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1/targets"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.list_targets("o1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn projects_and_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "p1", "type": "project", "attributes": {"name": "api", "type": "npm", "status": "active"}}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/orgs/o1/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "p1", "type": "project", "attributes": {"name": "api", "type": "npm", "status": "active"}}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let projects = client.list_projects("o1").await.unwrap();
        assert_eq!(projects[0].project_type, "npm");
        let project = client.get_project_details("o1", "p1").await.unwrap().unwrap();
        assert_eq!(project.status, "active");
        assert!(client.get_project_details("o1", "missing").await.unwrap().is_none());
    }
}
