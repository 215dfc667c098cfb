// crates/settings-catalog-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for settings-catalog-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::PathBuf;

use settings_catalog_config::ConfigError;
use settings_catalog_config::SettingsCatalogConfig;

/// Result type for tests that report failures as messages.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `SettingsCatalogConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<SettingsCatalogConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Writes `contents` to a config file inside a fresh temp dir.
pub fn write_config(contents: &[u8]) -> Result<(tempfile::TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("settings-catalog.toml");
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Asserts that a result is an error containing a specific substring.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
