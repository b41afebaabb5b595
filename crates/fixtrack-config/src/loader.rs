// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./fixtrack.toml` > `~/.config/fixtrack/fixtrack.toml`
//! > `/etc/fixtrack/fixtrack.toml` with environment variable overrides via the
//! `FIXTRACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FixtrackConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/fixtrack/fixtrack.toml` (system-wide)
/// 3. `~/.config/fixtrack/fixtrack.toml` (user XDG config)
/// 4. `./fixtrack.toml` (local directory)
/// 5. `FIXTRACK_*` environment variables
pub fn load_config() -> Result<FixtrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(Toml::file("/etc/fixtrack/fixtrack.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("fixtrack/fixtrack.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("fixtrack.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FixtrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FixtrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `FIXTRACK_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("FIXTRACK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FIXTRACK_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("auth_", "auth.", 1);
        mapped.into()
    })
}
