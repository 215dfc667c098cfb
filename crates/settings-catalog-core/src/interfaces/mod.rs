// crates/settings-catalog-core/src/interfaces/mod.rs
// ============================================================================
// Module: Settings Catalog Interfaces
// Description: Audit event payloads and the sink contract for normalization.
// Purpose: Let callers route structured audit records without hard dependencies.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every normalizer operation emits one [`SettingsAuditEvent`]. Events carry
//! sizes, counts, and error labels only; settings payloads and secret values
//! are never part of an event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Normalizer operation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsOperation {
    /// Settings text canonicalization.
    Canonicalize,
    /// Secret restoration into a response tree.
    PreserveSecrets,
    /// Response-to-state mapping.
    MapSettingsState,
    /// Planned settings normalization.
    NormalizePlannedSettings,
    /// Key-order-insensitive equivalence check.
    Equivalent,
}

/// Operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Operation completed.
    Success,
    /// Operation returned an error.
    Failure,
}

/// Normalizer audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation performed.
    pub operation: SettingsOperation,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Total size of the input texts in bytes (zero when only trees were given).
    pub input_bytes: usize,
    /// Output size in bytes when text was produced.
    pub output_bytes: Option<usize>,
    /// Number of secret nodes restored.
    pub secrets_restored: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsAuditEventParams {
    /// Operation performed.
    pub operation: SettingsOperation,
    /// Total input size in bytes.
    pub input_bytes: usize,
    /// Output size in bytes when text was produced.
    pub output_bytes: Option<usize>,
    /// Number of secret nodes restored.
    pub secrets_restored: usize,
    /// Normalized error kind label; `None` means success.
    pub error_kind: Option<&'static str>,
}

impl SettingsAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: SettingsAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let outcome = if params.error_kind.is_some() {
            AuditOutcome::Failure
        } else {
            AuditOutcome::Success
        };
        Self {
            event: "settings_normalization",
            timestamp_ms,
            operation: params.operation,
            outcome,
            input_bytes: params.input_bytes,
            output_bytes: params.output_bytes,
            secrets_restored: params.secrets_restored,
            error_kind: params.error_kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for normalizer events.
pub trait SettingsAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &SettingsAuditEvent);
}
