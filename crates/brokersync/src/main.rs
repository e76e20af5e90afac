// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Brokersync - replicate a Snyk broker connection across a group.
//!
//! This is the binary entry point. It loads configuration, applies flag
//! overrides, installs logging, and runs the configure, removal or settings
//! workflow.

mod configure;
mod logging;
mod remove;
mod report;
mod settings;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use brokersync_config::BrokersyncConfig;
use brokersync_core::{BrokerError, BrokerPlatform};
use brokersync_snyk::SnykClient;
use clap::Parser;
use tracing::{error, info};

/// Replicate a broker connection from a source organization to every other
/// organization in a group, or remove one from the whole group.
#[derive(Parser, Debug)]
#[command(name = "brokersync", version, about, long_about = None)]
struct Cli {
    /// Snyk API token.
    #[arg(long)]
    snyk_token: Option<String>,

    /// Snyk tenant ID.
    #[arg(long)]
    tenant_id: Option<String>,

    /// Snyk group ID.
    #[arg(long)]
    group_id: Option<String>,

    /// Source organization ID with the broker connection (required for configuration).
    #[arg(long, required_unless_present_any = ["remove_connection", "broker_settings"])]
    source_org_id: Option<String>,

    /// Specific broker connection ID to use.
    #[arg(long)]
    broker_connection_id: Option<String>,

    /// Remove this broker connection ID from all organizations in the group.
    #[arg(long, value_name = "CONNECTION_ID")]
    remove_connection: Option<String>,

    /// Apply the broker integration settings in this JSON file to --org-ids.
    #[arg(long, value_name = "PATH", conflicts_with = "remove_connection", requires = "org_ids")]
    broker_settings: Option<PathBuf>,

    /// Comma-separated organization IDs for --broker-settings.
    #[arg(long, value_delimiter = ',')]
    org_ids: Vec<String>,

    /// Show what would change without making changes.
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Load configuration from this TOML file instead of the default hierarchy.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Applies flag values on top of the loaded configuration.
    fn apply_overrides(&self, config: &mut BrokersyncConfig) {
        if let Some(token) = &self.snyk_token {
            config.api.token = Some(token.clone());
        }
        if let Some(tenant) = &self.tenant_id {
            config.api.tenant_id = Some(tenant.clone());
        }
        if self.debug {
            config.log.level = "debug".to_string();
        }
    }

    fn group_id(&self) -> Result<&str, BrokerError> {
        self.group_id
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| BrokerError::Config("--group-id is required".into()))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => brokersync_config::load_and_validate_path(path),
        None => brokersync_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            brokersync_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = logging::init_logging(&config.log) {
        eprintln!("brokersync: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        error!(error = %e, "run aborted");
        eprintln!("brokersync: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, config: &BrokersyncConfig) -> Result<(), BrokerError> {
    if let Some(path) = &cli.broker_settings {
        let settings = settings::read_settings(path)?;
        let client = SnykClient::from_config(&config.api)?;
        info!(base_url = client.base_url(), "snyk client initialized");
        let use_color = std::io::stdout().is_terminal();
        return settings::run_settings(Arc::new(client), &cli.org_ids, &settings, use_color).await;
    }

    let group_id = cli.group_id()?;
    let client = SnykClient::from_config(&config.api)?;
    info!(base_url = client.base_url(), "snyk client initialized");
    let platform: Arc<dyn BrokerPlatform> = Arc::new(client);
    let use_color = std::io::stdout().is_terminal();

    println!("Starting mass broker configuration");
    println!("{}", "=".repeat(50));

    match &cli.remove_connection {
        Some(connection_id) => {
            remove::run_remove(platform, group_id, connection_id, cli.dry_run, use_color).await
        }
        None => {
            let source_org_id = cli
                .source_org_id
                .as_deref()
                .ok_or_else(|| BrokerError::Config("--source-org-id is required".into()))?;
            configure::run_configure(
                platform,
                configure::ConfigureArgs {
                    group_id,
                    source_org_id,
                    connection_id: cli.broker_connection_id.as_deref(),
                    dry_run: cli.dry_run,
                },
                use_color,
            )
            .await
        }
    }
}
