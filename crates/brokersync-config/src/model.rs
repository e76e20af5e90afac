// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for brokersync.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level brokersync configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Command-line flags are applied on top by the binary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokersyncConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Console and run-log settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Remote REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// REST base URL, including the `/rest` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token. `None` requires `--snyk-token` or `BROKERSYNC_API_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Tenant id, required by the tenant-scoped broker endpoints.
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size for paginated listings (the API caps it at 100).
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Dated API version for organization, project and integration calls.
    #[serde(default = "default_version")]
    pub version: String,

    /// Dated API version for broker connection and broker integration calls.
    #[serde(default = "default_broker_version")]
    pub broker_version: String,

    /// Versions tried in order when checking organization access or listing targets.
    #[serde(default = "default_fallback_versions")]
    pub fallback_versions: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            tenant_id: None,
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
            version: default_version(),
            broker_version: default_broker_version(),
            fallback_versions: default_fallback_versions(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.snyk.io/rest".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    100
}

fn default_version() -> String {
    "2024-10-15".to_string()
}

fn default_broker_version() -> String {
    "2025-09-28".to_string()
}

fn default_fallback_versions() -> Vec<String> {
    vec![
        "2024-10-15".to_string(),
        "2023-05-29".to_string(),
        "2023-06-18".to_string(),
    ]
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only run log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "broker_config.log".to_string()
}
