// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use chrono::NaiveDate;

use crate::diagnostic::ConfigError;
use crate::model::BrokersyncConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &BrokersyncConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let api = &config.api;

    let base_url = api.base_url.trim();
    let host = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => {}
        _ => errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` must be an http(s) URL with a host"),
        }),
    }

    for (key, value) in [("api.version", &api.version), ("api.broker_version", &api.broker_version)] {
        if !is_api_version(value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` is not a dated API version (YYYY-MM-DD)"),
            });
        }
    }

    if api.fallback_versions.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.fallback_versions must list at least one version".to_string(),
        });
    }
    for (i, version) in api.fallback_versions.iter().enumerate() {
        if !is_api_version(version) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "api.fallback_versions[{i}] `{version}` is not a dated API version (YYYY-MM-DD)"
                ),
            });
        }
    }

    if api.page_limit == 0 || api.page_limit > 100 {
        errors.push(ConfigError::Validation {
            message: format!("api.page_limit must be between 1 and 100, got {}", api.page_limit),
        });
    }

    if api.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be greater than zero".to_string(),
        });
    }

    if api.tenant_id.as_deref().is_some_and(|t| t.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "api.tenant_id must not be empty when set".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.log.file.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "log.file must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A dated version string, `YYYY-MM-DD`, optionally followed by `~stability`.
pub fn is_api_version(value: &str) -> bool {
    let date = value.split_once('~').map_or(value, |(date, _)| date);
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
