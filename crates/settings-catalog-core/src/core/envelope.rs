// crates/settings-catalog-core/src/core/envelope.rs
// ============================================================================
// Module: Settings State Envelope
// Description: Maps service responses into canonical `settingsDetails` state.
// Purpose: Combine secret preservation and canonicalization for state storage.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Stored settings documents wrap the setting list as
//! `{"settingsDetails": [...]}`; the service returns the same list under the
//! `value` member of a collection page. Mapping a read:
//! 1. Decode the response and extract its settings list.
//! 2. Decode the stored document and extract `settingsDetails`, if any.
//! 3. Restore redacted secrets from the stored list into the response list.
//! 4. Re-wrap under `settingsDetails` and canonicalize.
//!
//! Stored documents without settings (for example after an import) skip the
//! preservation step.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::canonical::CanonicalError;
use crate::core::canonical::canonicalize_with_limits;
use crate::core::canonical::decode_settings;
use crate::core::canonical::render_canonical;
use crate::core::secrets::PreservationReport;
use crate::core::secrets::SecretPreservationError;
use crate::core::secrets::preserve_secrets_with_report;
use crate::core::tree::Limits;
use crate::core::tree::ValueKind;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Envelope member holding the setting list in stored settings documents.
pub const SETTINGS_DETAILS_KEY: &str = "settingsDetails";
/// Member holding the items of a service collection page.
pub const GRAPH_COLLECTION_KEY: &str = "value";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while mapping settings state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsStateError {
    /// Decoding or canonicalization failed.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
    /// Secret preservation failed.
    #[error(transparent)]
    Secrets(#[from] SecretPreservationError),
    /// Stored settings document has an unexpected shape.
    #[error("invalid stored settings: {0}")]
    InvalidConfig(String),
    /// Service response has an unexpected shape.
    #[error("invalid settings response: {0}")]
    InvalidResponse(String),
}

impl SettingsStateError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Canonical(err) => err.kind_label(),
            Self::Secrets(err) => err.kind_label(),
            Self::InvalidConfig(_) => "invalid_config",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of mapping a service response into settings state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedSettings {
    /// Canonical `{"settingsDetails": [...]}` text.
    pub settings: String,
    /// Secret nodes restored from the stored document.
    pub report: PreservationReport,
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts the setting list from a decoded service response.
///
/// Accepts a collection page (`{"value": [...]}`) or a bare array.
///
/// # Errors
///
/// Returns [`SettingsStateError::InvalidResponse`] for any other shape.
pub fn extract_response_settings(response: Value) -> Result<Vec<Value>, SettingsStateError> {
    match response {
        Value::Array(items) => Ok(items),
        Value::Object(mut page) => match page.remove(GRAPH_COLLECTION_KEY) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(SettingsStateError::InvalidResponse(format!(
                "'{GRAPH_COLLECTION_KEY}' must be an array, found {}",
                ValueKind::of(&other)
            ))),
            None => Err(SettingsStateError::InvalidResponse(format!(
                "response object has no '{GRAPH_COLLECTION_KEY}' member"
            ))),
        },
        other => Err(SettingsStateError::InvalidResponse(format!(
            "response must be an object or array, found {}",
            ValueKind::of(&other)
        ))),
    }
}

/// Extracts the stored setting list, if the document carries one.
///
/// # Errors
///
/// Returns [`SettingsStateError::InvalidConfig`] when the document is not an
/// object or `settingsDetails` is present but not an array.
pub fn extract_config_settings(config: &Value) -> Result<Option<&Value>, SettingsStateError> {
    match config {
        Value::Null => Ok(None),
        Value::Object(document) => match document.get(SETTINGS_DETAILS_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(details @ Value::Array(_)) => Ok(Some(details)),
            Some(other) => Err(SettingsStateError::InvalidConfig(format!(
                "'{SETTINGS_DETAILS_KEY}' must be an array, found {}",
                ValueKind::of(other)
            ))),
        },
        other => Err(SettingsStateError::InvalidConfig(format!(
            "stored settings must be an object, found {}",
            ValueKind::of(other)
        ))),
    }
}

// ============================================================================
// SECTION: Mapping
// ============================================================================

/// Maps a service response into canonical settings state.
///
/// `stored_settings` is the previously stored settings document; `None` or
/// blank text skips secret preservation.
///
/// # Errors
///
/// Returns [`SettingsStateError`] when either document is malformed, the trees
/// disagree structurally, or canonicalization fails.
pub fn map_settings_state(
    stored_settings: Option<&str>,
    response: &str,
    limits: &Limits,
) -> Result<MappedSettings, SettingsStateError> {
    let response_value = decode_settings(response, limits)?;
    let mut response_settings = Value::Array(extract_response_settings(response_value)?);

    let stored_value = match stored_settings.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => decode_settings(text, limits)?,
        None => Value::Null,
    };
    let report = match extract_config_settings(&stored_value)? {
        Some(config_settings) => {
            preserve_secrets_with_report(config_settings, &mut response_settings, limits)?
        }
        None => PreservationReport::default(),
    };

    let mut envelope = Map::new();
    envelope.insert(SETTINGS_DETAILS_KEY.to_string(), response_settings);
    let settings = render_canonical(Value::Object(envelope), limits)?;
    Ok(MappedSettings {
        settings,
        report,
    })
}

/// Normalizes user-supplied settings text before it is stored as a plan.
///
/// # Errors
///
/// Returns [`SettingsStateError::Canonical`] when the text cannot be
/// canonicalized.
pub fn normalize_planned_settings(
    planned: &str,
    limits: &Limits,
) -> Result<String, SettingsStateError> {
    Ok(canonicalize_with_limits(planned, limits)?)
}
