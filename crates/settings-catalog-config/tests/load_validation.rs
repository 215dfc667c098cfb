//! Load validation tests for settings-catalog-config.
// crates/settings-catalog-config/tests/load_validation.rs
// =============================================================================
// Module: Load Validation Tests
// Description: File loading, size, encoding, and path limits.
// Purpose: Ensure configuration loading fails closed on bad inputs.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only diagnostics and assertions are permitted."
)]

use settings_catalog_config::AuditSinkKind;
use settings_catalog_config::ConfigError;
use settings_catalog_config::SettingsCatalogConfig;
use settings_catalog_core::Limits;

mod common;

use crate::common::TestResult;
use crate::common::assert_invalid;
use crate::common::write_config;

// ============================================================================
// SECTION: Successful Loads
// ============================================================================

/// Tests a complete config file loads and converts to core limits.
#[test]
fn loads_complete_config() -> TestResult {
    let (_dir, path) = write_config(
        br#"
[limits]
max_depth = 64
max_input_bytes = 65536

[audit]
sink = "file"
path = "logs/settings-audit.jsonl"
"#,
    )?;
    let config = SettingsCatalogConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.limits()
        != (Limits {
            max_depth: 64,
            max_input_bytes: 65536,
        })
    {
        return Err(format!("unexpected limits: {:?}", config.limits()));
    }
    if config.audit.sink != AuditSinkKind::File {
        return Err("expected file sink".to_string());
    }
    match config.audit.file_path() {
        Some(file) if file.ends_with("settings-audit.jsonl") => Ok(()),
        other => Err(format!("unexpected audit path: {other:?}")),
    }
}

/// Tests an empty file yields defaults.
#[test]
fn empty_file_yields_defaults() -> TestResult {
    let (_dir, path) = write_config(b"")?;
    let config = SettingsCatalogConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config != SettingsCatalogConfig::default() {
        return Err("expected default config".to_string());
    }
    if config.limits() != Limits::default() {
        return Err("expected default limits".to_string());
    }
    if config.audit.file_path().is_some() {
        return Err("default audit sink has no path".to_string());
    }
    Ok(())
}

/// Tests partial sections keep defaults for omitted fields.
#[test]
fn partial_sections_use_field_defaults() -> TestResult {
    let (_dir, path) = write_config(b"[limits]\nmax_depth = 16\n")?;
    let config = SettingsCatalogConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    let limits = config.limits();
    if limits.max_depth != 16 || limits.max_input_bytes != Limits::default().max_input_bytes {
        return Err(format!("unexpected limits: {limits:?}"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Load Failures
// ============================================================================

/// Tests an explicitly named missing file is an io error.
#[test]
fn missing_explicit_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match SettingsCatalogConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

/// Tests files over the size limit are rejected.
#[test]
fn oversized_file_is_rejected() -> TestResult {
    let mut contents = b"# padding\n".to_vec();
    contents.resize(1024 * 1024 + 1, b' ');
    let (_dir, path) = write_config(&contents)?;
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "exceeds size limit")
}

/// Tests non-UTF-8 files are rejected.
#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let (_dir, path) = write_config(&[0x5b, 0xff, 0xfe, 0x5d])?;
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "utf-8")
}

/// Tests malformed TOML is a parse error.
#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let (_dir, path) = write_config(b"[limits\nmax_depth = 1")?;
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "config parse error")
}

/// Tests unknown sections and fields are rejected.
#[test]
fn unknown_fields_are_rejected() -> TestResult {
    let (_dir, path) = write_config(b"[limits]\nmax_width = 4\n")?;
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "max_width")?;
    let (_dir, path) = write_config(b"[server]\nbind = \"127.0.0.1:0\"\n")?;
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "server")
}

/// Tests overlong path components are rejected before reading.
#[test]
fn overlong_path_component_is_rejected() -> TestResult {
    let path = std::path::PathBuf::from("a".repeat(300));
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "component too long")
}

/// Tests overlong total paths are rejected before reading.
#[test]
fn overlong_path_is_rejected() -> TestResult {
    let segment = "d".repeat(200);
    let path: std::path::PathBuf = std::iter::repeat_n(segment.as_str(), 25).collect();
    assert_invalid(SettingsCatalogConfig::load(Some(&path)), "exceeds max length")
}
