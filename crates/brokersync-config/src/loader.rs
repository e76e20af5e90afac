// SPDX-FileCopyrightText: 2026 Brokersync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./brokersync.toml` > `~/.config/brokersync/brokersync.toml`
//! > `/etc/brokersync/brokersync.toml` with environment variable overrides via
//! the `BROKERSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BrokersyncConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/brokersync/brokersync.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "brokersync.toml";

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("brokersync/brokersync.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/brokersync/brokersync.toml` (system-wide)
/// 3. `~/.config/brokersync/brokersync.toml` (user XDG config)
/// 4. `./brokersync.toml` (local directory)
/// 5. `BROKERSYNC_*` environment variables
pub fn load_config() -> Result<BrokersyncConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BrokersyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokersyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BrokersyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrokersyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BrokersyncConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `BROKERSYNC_API_TENANT_ID` maps to `api.tenant_id`, not `api.tenant.id`.
pub fn env_provider() -> Env {
    Env::prefixed("BROKERSYNC_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("api_", "api.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
