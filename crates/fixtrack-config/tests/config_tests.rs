// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Fixtrack configuration system.

use fixtrack_config::model::FixtrackConfig;
use fixtrack_config::validation::ConfigError;
use fixtrack_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_fixtrack_config() {
    let toml = r#"
[service]
operation_timeout_secs = 10
log_level = "debug"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[auth]
session_ttl_secs = 3600
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.operation_timeout_secs, 10);
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.auth.session_ttl_secs, 3600);
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.operation_timeout_secs, 30);
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.storage.database_path, "fixtrack.db");
    assert!(config.storage.wal_mode);
    assert_eq!(config.auth.session_ttl_secs, 8 * 60 * 60);
}

/// Unknown field in a section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_section_produces_error() {
    let toml = r#"
[storage]
databse_path = "typo.db"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("databse_path"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[metrics]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("metrics"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A later layer overrides an earlier one, as the env provider would.
#[test]
fn later_layer_overrides_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[storage]
database_path = "from-toml.db"
"#;

    let config: FixtrackConfig = Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("storage.database_path", "from-env.db"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.storage.database_path, "from-env.db");
}

/// Keys containing underscores survive the env-style dotted mapping.
#[test]
fn dotted_key_with_underscore_reaches_nested_field() {
    use figment::{providers::Serialized, Figment};

    let config: FixtrackConfig = Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(("service.operation_timeout_secs", 7))
        .extract()
        .expect("should set nested field via dot notation");

    assert_eq!(config.service.operation_timeout_secs, 7);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: FixtrackConfig = Figment::new()
        .merge(Serialized::defaults(FixtrackConfig::default()))
        .merge(Toml::file("/nonexistent/path/fixtrack.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.storage.database_path, "fixtrack.db");
}

/// Invalid type (string where number expected) produces a clear message.
#[test]
fn invalid_type_message_names_the_field() {
    let toml = r#"
[auth]
session_ttl_secs = "forever"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("session_ttl_secs"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// load_and_validate_str surfaces value-level problems with the field path.
#[test]
fn validation_errors_carry_field_paths() {
    let toml = r#"
[service]
operation_timeout_secs = 0
log_level = "loud"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad values should fail");
    assert!(errors
        .iter()
        .any(|e| e.field == "service.operation_timeout_secs"));
    assert!(errors.iter().any(|e| e.field == "service.log_level"));
}

/// Deserialization failures are reported through the same error type.
#[test]
fn figment_errors_convert_to_config_errors() {
    let toml = r#"
[storage]
databse_path = "typo.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty());
    for error in &errors {
        let rendered = format!("{error}");
        assert!(rendered.starts_with("config error at"));
    }
}

/// ConfigError is constructible and displays field and message.
#[test]
fn config_error_display() {
    let error = ConfigError::new("storage.database_path", "must not be empty");
    assert_eq!(
        format!("{error}"),
        "config error at `storage.database_path`: must not be empty"
    );
}

/// Duration helpers convert seconds into std Durations.
#[test]
fn duration_helpers() {
    let config = FixtrackConfig::default();
    assert_eq!(config.service.operation_timeout().as_secs(), 30);
    assert_eq!(config.auth.session_ttl().as_secs(), 28_800);
}
