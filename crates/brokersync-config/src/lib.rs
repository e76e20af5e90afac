// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for brokersync.
//!
//! TOML configuration with strict key checking (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `BROKERSYNC_*` environment overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use brokersync_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API base: {}", config.api.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ApiConfig, BrokersyncConfig, LogConfig};

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<BrokersyncConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<BrokersyncConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<BrokersyncConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_PATH) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_PATH).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_CONFIG_PATH) {
        sources.push((loader::SYSTEM_CONFIG_PATH.to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    #[cfg(target_os = "linux")]
    fn user_config_is_collected_for_spans() {
        let dir = tempfile::tempdir().expect("tempdir");
        let user_dir = dir.path().join("brokersync");
        std::fs::create_dir_all(&user_dir).expect("mkdir");
        std::fs::write(user_dir.join("brokersync.toml"), "[api]\ntenant_di = \"t\"\n")
            .expect("write");

        // SAFETY: serialized with every other env-mutating test.
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir.path()) };
        let sources = collect_toml_sources();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        assert!(sources.iter().any(|(path, content)| {
            path.ends_with("brokersync/brokersync.toml") && content.contains("tenant_di")
        }));
    }
}
