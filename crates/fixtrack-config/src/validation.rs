// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Figment and serde guarantee shape and types; this module checks the
//! values. All failures are collected so a bad config reports everything
//! wrong at once instead of one error per restart.

use thiserror::Error;

use crate::model::FixtrackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single configuration problem, tied to the offending key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error at `{field}`: {message}")]
pub struct ConfigError {
    /// Dotted path of the offending key, e.g. `storage.database_path`.
    pub field: String,
    /// Human-readable description of what is wrong.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a deserialized config, collecting every problem found.
pub fn validate_config(config: &FixtrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.operation_timeout_secs == 0 {
        errors.push(ConfigError::new(
            "service.operation_timeout_secs",
            "must be greater than zero",
        ));
    }
    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::new(
            "service.log_level",
            format!(
                "unknown level `{}`, expected one of: {}",
                config.service.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::new(
            "storage.database_path",
            "must not be empty",
        ));
    }

    if config.auth.session_ttl_secs == 0 {
        errors.push(ConfigError::new(
            "auth.session_ttl_secs",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convert a Figment extraction failure into per-key config errors.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| {
            let field = if e.path.is_empty() {
                "<root>".to_string()
            } else {
                e.path.join(".")
            };
            ConfigError::new(field, e.kind.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&FixtrackConfig::default()).is_ok());
    }

    #[test]
    fn all_problems_reported_at_once() {
        let mut config = FixtrackConfig::default();
        config.service.operation_timeout_secs = 0;
        config.service.log_level = "loud".into();
        config.storage.database_path = "  ".into();
        config.auth.session_ttl_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors
            .iter()
            .any(|e| e.field == "service.log_level" && e.message.contains("loud")));
    }
}
