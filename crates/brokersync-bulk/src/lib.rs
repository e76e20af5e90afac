// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group-wide broker connection workflows.
//!
//! [`BulkOrchestrator`] replicates a source organization's broker connection
//! to every other organization in a group, previews that run, removes a
//! connection from a whole group, and pushes broker integration settings to
//! an explicit list of organizations. Organizations are processed one at a time
//! in listing order; a failure in one organization is recorded and the loop
//! moves on.

pub mod configure;
pub mod removal;
pub mod settings;

use std::collections::HashSet;
use std::sync::Arc;

use brokersync_core::{BrokerError, BrokerPlatform, Organization};
use tracing::debug;

/// Reason recorded for organizations the token cannot access.
pub const ACCESS_DENIED: &str = "Access denied";

/// Reason recorded when an organization has no integration on the connection.
pub const CONNECTION_NOT_FOUND: &str = "Connection not found";

/// Runs the bulk workflows against a [`BrokerPlatform`].
#[derive(Clone)]
pub struct BulkOrchestrator {
    platform: Arc<dyn BrokerPlatform>,
}

impl BulkOrchestrator {
    pub fn new(platform: Arc<dyn BrokerPlatform>) -> Self {
        Self { platform }
    }

    /// Every organization in the group except the source, in listing order.
    pub async fn target_organizations(
        &self,
        group_id: &str,
        source_org_id: &str,
    ) -> Result<Vec<Organization>, BrokerError> {
        let orgs = self.platform.list_group_organizations(group_id).await?;
        let targets = exclude_source(orgs, source_org_id);
        debug!(group_id, count = targets.len(), "computed target organizations");
        Ok(targets)
    }
}

/// Set difference by id: `orgs` minus `source_org_id`, order kept.
pub(crate) fn exclude_source(orgs: Vec<Organization>, source_org_id: &str) -> Vec<Organization> {
    orgs.into_iter().filter(|o| o.id != source_org_id).collect()
}

/// Ids of `orgs`, for membership checks.
pub(crate) fn id_set(orgs: &[Organization]) -> HashSet<&str> {
    orgs.iter().map(|o| o.id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use brokersync_test_utils::MockPlatform;

    use super::*;

    #[test]
    fn exclude_source_keeps_order() {
        let orgs = vec![
            Organization::named("c", "C"),
            Organization::named("a", "A"),
            Organization::named("b", "B"),
        ];
        let ids: Vec<String> = exclude_source(orgs, "a").into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["c", "b"]);
    }

    #[test]
    fn exclude_unknown_source_is_identity() {
        let orgs = vec![Organization::named("a", "A")];
        assert_eq!(exclude_source(orgs.clone(), "zz"), orgs);
    }

    #[tokio::test]
    async fn target_organizations_skips_source() {
        let platform = MockPlatform::builder()
            .org("g1", "a", "A")
            .org("g1", "b", "B")
            .org("g1", "c", "C")
            .build();
        let orchestrator = BulkOrchestrator::new(Arc::new(platform));

        let targets = orchestrator.target_organizations("g1", "b").await.unwrap();
        let ids: Vec<&str> = targets.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
