// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console and run-log tracing setup.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use brokersync_config::LogConfig;
use brokersync_core::BrokerError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directive for a level: our crates at `level`, the rest at `warn`.
fn default_directive(level: &str) -> String {
    format!("brokersync={level},warn")
}

/// Opens the run log for appending, creating it if needed.
fn open_run_log(path: &Path) -> Result<File, BrokerError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| BrokerError::Config(format!("cannot open log file {}: {e}", path.display())))
}

/// Installs the global subscriber: stderr console plus the plain-text run log.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(log: &LogConfig) -> Result<(), BrokerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&log.level)));
    let file = open_run_log(Path::new(&log.file))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .map_err(|e| BrokerError::Internal(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn directive_scopes_level_to_our_crates() {
        assert_eq!(default_directive("debug"), "brokersync=debug,warn");
        assert!(EnvFilter::try_new(default_directive("info")).is_ok());
    }

    #[test]
    fn run_log_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broker_config.log");
        std::fs::write(&path, "first run\n").unwrap();

        let mut file = open_run_log(&path).unwrap();
        writeln!(file, "second run").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first run\nsecond run\n");
    }

    #[test]
    fn unopenable_log_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_run_log(&dir.path().join("missing").join("run.log")).unwrap_err();
        assert!(err.is_config());
    }
}
