// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configure mode: the step-by-step group rollout.

use std::sync::Arc;

use brokersync_bulk::BulkOrchestrator;
use brokersync_core::{BrokerConnection, BrokerError, BrokerPlatform};
use tracing::warn;

use crate::report::{connection_list, org_list, render_configure_report, render_preview};

/// Inputs for one configure run.
#[derive(Debug, Clone, Copy)]
pub struct ConfigureArgs<'a> {
    pub group_id: &'a str,
    pub source_org_id: &'a str,
    pub connection_id: Option<&'a str>,
    pub dry_run: bool,
}

/// The explicit connection if it is among `connections`, else the first one.
fn select_connection<'a>(
    connections: &'a [BrokerConnection],
    explicit: Option<&str>,
) -> Option<&'a BrokerConnection> {
    match explicit {
        Some(id) => connections.iter().find(|c| c.id == id),
        None => connections.first(),
    }
}

/// Runs configure mode, printing each step. Early exits are not errors.
pub async fn run_configure(
    platform: Arc<dyn BrokerPlatform>,
    args: ConfigureArgs<'_>,
    use_color: bool,
) -> Result<(), BrokerError> {
    let orchestrator = BulkOrchestrator::new(Arc::clone(&platform));

    println!("\nStep 1: Fetching organizations for group {}...", args.group_id);
    let all_orgs = platform.list_group_organizations(args.group_id).await?;
    println!("Found {} organizations in group", all_orgs.len());

    println!(
        "\nStep 2: Identifying target organizations (excluding source org {})...",
        args.source_org_id
    );
    let targets = orchestrator
        .target_organizations(args.group_id, args.source_org_id)
        .await?;
    println!("Found {} target organizations:", targets.len());
    print!("{}", org_list(&targets));
    if targets.is_empty() {
        println!("No target organizations found. Exiting.");
        return Ok(());
    }

    println!(
        "\nStep 3: Fetching broker connections from source organization {}...",
        args.source_org_id
    );
    let connections = platform.list_broker_connections(args.source_org_id).await?;
    if connections.is_empty() {
        println!(
            "No broker connections found in source organization {}",
            args.source_org_id
        );
        println!("   Please ensure the source organization has broker connections configured");
        return Ok(());
    }
    println!("Found {} broker connections:", connections.len());
    print!("{}", connection_list(&connections));

    let Some(selected) = select_connection(&connections, args.connection_id) else {
        println!(
            "Broker connection {} not found",
            args.connection_id.unwrap_or_default()
        );
        return Ok(());
    };
    println!(
        "\nStep 4: Using broker connection: {} ({})",
        selected.name, selected.id
    );

    if args.dry_run {
        match orchestrator
            .preview_configure(args.group_id, args.source_org_id, Some(selected.id.as_str()))
            .await?
        {
            Some(preview) => print!("{}", render_preview(&preview, use_color)),
            None => println!("Source organization is not bound to {}; nothing to replicate.", selected.id),
        }
        return Ok(());
    }

    println!(
        "\nStep 5: Configuring broker for {} target organizations...",
        targets.len()
    );
    let report = orchestrator
        .configure_for_group(args.group_id, args.source_org_id, Some(selected.id.as_str()))
        .await?;
    if report.connection_id.is_none() {
        warn!(connection_id = %selected.id, "configuration aborted before any change");
        println!("Configuration aborted: source organization is not bound to {}.", selected.id);
        return Ok(());
    }
    print!("{}", render_configure_report(&report, use_color));
    println!("\nBroker configuration completed!");
    Ok(())
}
