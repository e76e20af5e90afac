// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-organization outcomes and the reports the bulk workflows return.
//!
//! Reports are plain data for the console layer; nothing here is persisted.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{BrokerIntegration, Organization};

/// Outcome bucket for one organization in one run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failed,
    Skipped,
    NotFound,
}

/// The result of processing one organization.
///
/// `reason` is present exactly when `status` is not [`OutcomeStatus::Success`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub organization_id: String,
    pub organization_name: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Integrations removed, or that would be removed under a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrations: Option<usize>,
}

impl OperationResult {
    pub fn success(org: &Organization) -> Self {
        Self::build(org, OutcomeStatus::Success, None)
    }

    pub fn success_with_count(org: &Organization, count: usize) -> Self {
        Self {
            integrations: Some(count),
            ..Self::build(org, OutcomeStatus::Success, None)
        }
    }

    pub fn failed(org: &Organization, reason: impl Into<String>) -> Self {
        Self::build(org, OutcomeStatus::Failed, Some(reason.into()))
    }

    pub fn skipped(org: &Organization, reason: impl Into<String>) -> Self {
        Self::build(org, OutcomeStatus::Skipped, Some(reason.into()))
    }

    pub fn not_found(org: &Organization, reason: impl Into<String>) -> Self {
        Self::build(org, OutcomeStatus::NotFound, Some(reason.into()))
    }

    fn build(org: &Organization, status: OutcomeStatus, reason: Option<String>) -> Self {
        Self {
            organization_id: org.id.clone(),
            organization_name: org.name.clone(),
            status,
            reason,
            integrations: None,
        }
    }
}

/// Result of replicating a broker connection across a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureReport {
    /// Connection that was replicated; `None` when the run aborted early.
    pub connection_id: Option<String>,
    /// Integration type copied from the source organization.
    pub integration_type: Option<String>,
    pub success: Vec<OperationResult>,
    pub failed: Vec<OperationResult>,
    pub skipped: Vec<OperationResult>,
    /// Tolerated failures from the cleanup pass, one line each.
    pub warnings: Vec<String>,
}

impl ConfigureReport {
    /// An aborted run: no work attempted, every bucket empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn record(&mut self, result: OperationResult) {
        match result.status {
            OutcomeStatus::Success => self.success.push(result),
            OutcomeStatus::Skipped => self.skipped.push(result),
            OutcomeStatus::Failed | OutcomeStatus::NotFound => self.failed.push(result),
        }
    }
}

/// Result of removing a broker connection from every organization in a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    pub success: Vec<OperationResult>,
    pub failed: Vec<OperationResult>,
    pub not_found: Vec<OperationResult>,
    pub dry_run: bool,
}

impl RemovalReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: OperationResult) {
        match result.status {
            OutcomeStatus::Success => self.success.push(result),
            OutcomeStatus::NotFound => self.not_found.push(result),
            OutcomeStatus::Failed | OutcomeStatus::Skipped => self.failed.push(result),
        }
    }

    /// Total integrations removed (or that would be removed).
    pub fn total_integrations(&self) -> usize {
        self.success.iter().filter_map(|r| r.integrations).sum()
    }
}

/// What a configure run would do, computed without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurePreview {
    pub connection_id: String,
    pub integration_type: String,
    pub targets: Vec<Organization>,
    /// Existing bindings on the connection the cleanup pass would delete.
    pub stale_bindings: Vec<BrokerIntegration>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn reason_present_iff_not_success() {
        let org = Organization::named("o1", "One");
        assert!(OperationResult::success(&org).reason.is_none());
        assert!(OperationResult::success_with_count(&org, 2).reason.is_none());
        assert!(OperationResult::failed(&org, "boom").reason.is_some());
        assert!(OperationResult::skipped(&org, "Access denied").reason.is_some());
        assert!(OperationResult::not_found(&org, "none").reason.is_some());
    }

    #[test]
    fn outcome_status_uses_snake_case() {
        assert_eq!(OutcomeStatus::NotFound.to_string(), "not_found");
        assert_eq!(OutcomeStatus::from_str("skipped").unwrap(), OutcomeStatus::Skipped);
        let json = serde_json::to_string(&OutcomeStatus::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }

    #[test]
    fn configure_report_routes_by_status() {
        let org = Organization::named("o1", "One");
        let mut report = ConfigureReport::empty();
        assert!(report.is_empty());
        report.record(OperationResult::success(&org));
        report.record(OperationResult::skipped(&org, "Access denied"));
        report.record(OperationResult::failed(&org, "x"));
        assert_eq!(report.success.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.failed.len(), 1);
    }

    #[test]
    fn removal_report_totals_counts() {
        let a = Organization::named("a", "A");
        let b = Organization::named("b", "B");
        let mut report = RemovalReport::new(true);
        report.record(OperationResult::success_with_count(&a, 2));
        report.record(OperationResult::success_with_count(&b, 1));
        report.record(OperationResult::not_found(&b, "none"));
        assert!(report.dry_run);
        assert_eq!(report.total_integrations(), 3);
        assert_eq!(report.not_found.len(), 1);
    }

    #[test]
    fn operation_result_omits_absent_fields() {
        let org = Organization::named("o1", "One");
        let json = serde_json::to_string(&OperationResult::success(&org)).unwrap();
        assert!(!json.contains("reason"));
        assert!(!json.contains("integrations"));
    }
}
