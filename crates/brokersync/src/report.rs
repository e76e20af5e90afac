// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console rendering of run results.
//!
//! Every renderer returns the full text so callers decide where it goes.
//! With `use_color` false the output uses bracketed plain markers.

use std::fmt::Write;

use brokersync_core::{
    BrokerConnection, ConfigurePreview, ConfigureReport, OperationResult, OutcomeStatus,
    Organization, RemovalReport,
};
use colored::Colorize;

fn marker(status: OutcomeStatus, use_color: bool) -> String {
    match (status, use_color) {
        (OutcomeStatus::Success, true) => "✓".green().to_string(),
        (OutcomeStatus::Failed, true) => "✗".red().to_string(),
        (OutcomeStatus::Skipped, true) => "-".yellow().to_string(),
        (OutcomeStatus::NotFound, true) => "?".cyan().to_string(),
        (OutcomeStatus::Success, false) => "[OK]".to_string(),
        (OutcomeStatus::Failed, false) => "[FAIL]".to_string(),
        (OutcomeStatus::Skipped, false) => "[SKIP]".to_string(),
        (OutcomeStatus::NotFound, false) => "[MISS]".to_string(),
    }
}

fn heading(text: &str, use_color: bool) -> String {
    if use_color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// One organization per line as `name (id)`.
pub fn org_list(orgs: &[Organization]) -> String {
    orgs.iter()
        .map(|o| format!("  - {} ({})\n", o.name, o.id))
        .collect()
}

/// Numbered connection listing with type and deployment.
pub fn connection_list(connections: &[BrokerConnection]) -> String {
    let mut out = String::new();
    for (i, c) in connections.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} ({})", i + 1, c.name, c.id);
        let _ = writeln!(out, "     Type: {}", c.connection_type);
        let _ = writeln!(out, "     Deployment: {}", c.deployment_id);
    }
    out
}

fn result_line(out: &mut String, result: &OperationResult, detail: Option<String>, use_color: bool) {
    let _ = write!(
        out,
        "  {} {} ({})",
        marker(result.status, use_color),
        result.organization_name,
        result.organization_id
    );
    if let Some(detail) = detail {
        let _ = write!(out, ": {detail}");
    }
    out.push('\n');
}

fn section(
    out: &mut String,
    title: &str,
    results: &[OperationResult],
    use_color: bool,
    detail: impl Fn(&OperationResult) -> Option<String>,
) {
    if results.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", heading(title, use_color));
    for result in results {
        result_line(out, result, detail(result), use_color);
    }
}

/// Summary of a configure run.
pub fn render_configure_report(report: &ConfigureReport, use_color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", heading("Configuration Results:", use_color));
    let _ = writeln!(out, "  Success: {}", report.success.len());
    let _ = writeln!(out, "  Failed: {}", report.failed.len());
    let _ = writeln!(out, "  Skipped: {}", report.skipped.len());

    section(&mut out, "Successfully configured organizations:", &report.success, use_color, |_| None);
    section(&mut out, "Failed to configure organizations:", &report.failed, use_color, |r| {
        r.reason.clone()
    });
    section(&mut out, "Skipped organizations:", &report.skipped, use_color, |r| r.reason.clone());

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\n{}", heading("Cleanup warnings:", use_color));
        for warning in &report.warnings {
            let line = if use_color {
                warning.yellow().to_string()
            } else {
                format!("[WARN] {warning}")
            };
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// What a configure dry run would do.
pub fn render_preview(preview: &ConfigurePreview, use_color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        heading(
            &format!("DRY RUN: Would configure broker for {} organizations", preview.targets.len()),
            use_color
        )
    );
    let _ = writeln!(
        out,
        "Connection {} with integration type {}",
        preview.connection_id, preview.integration_type
    );
    out.push_str("Target organizations:\n");
    out.push_str(&org_list(&preview.targets));
    if !preview.stale_bindings.is_empty() {
        out.push_str("Existing integrations that would be replaced:\n");
        for binding in &preview.stale_bindings {
            let _ = writeln!(out, "  - {} in {}", binding.id, binding.organization_id);
        }
    }
    out.push_str("\nDry run completed. No changes were made.\n");
    out
}

/// Summary of a removal run.
pub fn render_removal_report(report: &RemovalReport, use_color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", heading("Removal Results:", use_color));
    let _ = writeln!(out, "  Success: {}", report.success.len());
    let _ = writeln!(out, "  Failed: {}", report.failed.len());
    let _ = writeln!(out, "  Not Found: {}", report.not_found.len());

    let verb = if report.dry_run { "would remove" } else { "removed" };
    section(&mut out, "Organizations updated:", &report.success, use_color, |r| {
        Some(format!("{verb} {} integration(s)", r.integrations.unwrap_or(0)))
    });
    section(&mut out, "Failed removals:", &report.failed, use_color, |r| r.reason.clone());
    section(&mut out, "Connection not found in:", &report.not_found, use_color, |_| None);
    out
}

#[cfg(test)]
mod tests {
    use brokersync_core::BrokerIntegration;

    use super::*;

    fn org(id: &str, name: &str) -> Organization {
        Organization::named(id, name)
    }

    #[test]
    fn configure_report_plain() {
        let mut report = ConfigureReport::empty();
        report.record(OperationResult::success(&org("b", "Beta")));
        report.record(OperationResult::failed(&org("c", "Gamma"), "Failed to create integration"));
        report.record(OperationResult::skipped(&org("d", "Delta"), "Access denied"));
        report.warnings.push("failed to delete integration x from organization b".into());

        let text = render_configure_report(&report, false);
        assert!(text.contains("Success: 1"));
        assert!(text.contains("[OK] Beta (b)"));
        assert!(text.contains("[FAIL] Gamma (c): Failed to create integration"));
        assert!(text.contains("[SKIP] Delta (d): Access denied"));
        assert!(text.contains("[WARN] failed to delete integration x"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let text = render_configure_report(&ConfigureReport::empty(), false);
        assert!(!text.contains("Skipped organizations:"));
        assert!(!text.contains("Cleanup warnings:"));
    }

    #[test]
    fn removal_dry_run_wording() {
        let mut report = RemovalReport::new(true);
        report.record(OperationResult::success_with_count(&org("b", "Beta"), 2));
        report.record(OperationResult::not_found(&org("a", "Alpha"), "Connection not found"));

        let text = render_removal_report(&report, false);
        assert!(text.contains("[OK] Beta (b): would remove 2 integration(s)"));
        assert!(text.contains("[MISS] Alpha (a)"));
        assert!(!text.contains("Alpha (a):"));
    }

    #[test]
    fn removal_real_run_wording() {
        let mut report = RemovalReport::new(false);
        report.record(OperationResult::success_with_count(&org("b", "Beta"), 1));
        assert!(render_removal_report(&report, false).contains("removed 1 integration(s)"));
    }

    #[test]
    fn preview_lists_targets_and_stale_bindings() {
        let preview = ConfigurePreview {
            connection_id: "conn1".into(),
            integration_type: "gitlab".into(),
            targets: vec![org("b", "Beta"), org("c", "Gamma")],
            stale_bindings: vec![BrokerIntegration {
                id: "old".into(),
                organization_id: "b".into(),
                integration_type: "gitlab".into(),
            }],
        };
        let text = render_preview(&preview, false);
        assert!(text.contains("Would configure broker for 2 organizations"));
        assert!(text.contains("  - Gamma (c)"));
        assert!(text.contains("  - old in b"));
        assert!(text.contains("No changes were made."));
    }

    #[test]
    fn connection_listing_is_numbered() {
        let connections = vec![BrokerConnection {
            id: "conn1".into(),
            name: "primary".into(),
            connection_type: "github".into(),
            deployment_id: "d1".into(),
        }];
        let text = connection_list(&connections);
        assert!(text.starts_with("  1. primary (conn1)\n"));
        assert!(text.contains("Deployment: d1"));
    }

    #[test]
    fn colored_markers_differ_from_plain() {
        colored::control::set_override(true);
        let colored = marker(OutcomeStatus::Success, true);
        colored::control::unset_override();
        assert!(colored.contains('✓'));
        assert_eq!(marker(OutcomeStatus::Success, false), "[OK]");
    }
}
