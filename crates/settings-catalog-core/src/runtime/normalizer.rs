// crates/settings-catalog-core/src/runtime/normalizer.rs
// ============================================================================
// Module: Settings Normalizer
// Description: Limits-aware facade over canonicalization and secret merging.
// Purpose: Give callers one entry point that enforces limits and audits calls.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! [`SettingsNormalizer`] binds a set of [`Limits`] to an audit sink and
//! exposes the plan, read, and diff operations used by settings callers. It
//! holds no per-call state, so one instance can serve concurrent handlers as
//! long as each call works on its own response tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::core::CanonicalError;
use crate::core::Limits;
use crate::core::MappedSettings;
use crate::core::PreservationReport;
use crate::core::SecretPreservationError;
use crate::core::SettingsStateError;
use crate::core::canonicalize_with_limits;
use crate::core::map_settings_state;
use crate::core::normalize_planned_settings;
use crate::core::preserve_secrets_with_report;
use crate::core::settings_equivalent;
use crate::interfaces::SettingsAuditEvent;
use crate::interfaces::SettingsAuditEventParams;
use crate::interfaces::SettingsAuditSink;
use crate::interfaces::SettingsOperation;
use crate::runtime::audit::NoopAuditSink;

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Settings normalization facade with limits and auditing.
#[derive(Clone)]
pub struct SettingsNormalizer {
    /// Traversal and input limits.
    limits: Limits,
    /// Destination for audit events.
    audit: Arc<dyn SettingsAuditSink>,
}

impl Default for SettingsNormalizer {
    fn default() -> Self {
        Self::new(Limits::default(), Arc::new(NoopAuditSink))
    }
}

impl SettingsNormalizer {
    /// Creates a normalizer with explicit limits and audit sink.
    #[must_use]
    pub fn new(limits: Limits, audit: Arc<dyn SettingsAuditSink>) -> Self {
        Self {
            limits,
            audit,
        }
    }

    /// Returns the configured limits.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Canonicalizes settings text.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] when the text cannot be canonicalized.
    pub fn canonicalize(&self, input: &str) -> Result<String, CanonicalError> {
        let result = canonicalize_with_limits(input, &self.limits);
        self.record(SettingsAuditEventParams {
            operation: SettingsOperation::Canonicalize,
            input_bytes: input.len(),
            output_bytes: result.as_ref().ok().map(String::len),
            secrets_restored: 0,
            error_kind: result.as_ref().err().map(CanonicalError::kind_label),
        });
        result
    }

    /// Restores secret values from `config` into `response`.
    ///
    /// The audit event reports zero input bytes; use
    /// [`Self::preserve_secrets_with_input_bytes`] when the trees were decoded
    /// from text.
    ///
    /// # Errors
    ///
    /// Returns [`SecretPreservationError`] on null roots, kind mismatches, or
    /// depth violations.
    pub fn preserve_secrets(
        &self,
        config: &Value,
        response: &mut Value,
    ) -> Result<PreservationReport, SecretPreservationError> {
        self.preserve_secrets_with_input_bytes(config, response, 0)
    }

    /// Restores secret values and audits the size of the source texts.
    ///
    /// `input_bytes` is the combined length of the texts both trees were
    /// decoded from.
    ///
    /// # Errors
    ///
    /// Returns [`SecretPreservationError`] on null roots, kind mismatches, or
    /// depth violations.
    pub fn preserve_secrets_with_input_bytes(
        &self,
        config: &Value,
        response: &mut Value,
        input_bytes: usize,
    ) -> Result<PreservationReport, SecretPreservationError> {
        let result = preserve_secrets_with_report(config, response, &self.limits);
        self.record(SettingsAuditEventParams {
            operation: SettingsOperation::PreserveSecrets,
            input_bytes,
            output_bytes: None,
            secrets_restored: result.as_ref().map_or(0, PreservationReport::secrets_restored),
            error_kind: result.as_ref().err().map(SecretPreservationError::kind_label),
        });
        result
    }

    /// Maps a service response into canonical settings state.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsStateError`] when mapping fails.
    pub fn map_settings_state(
        &self,
        stored_settings: Option<&str>,
        response: &str,
    ) -> Result<MappedSettings, SettingsStateError> {
        let result = map_settings_state(stored_settings, response, &self.limits);
        self.record(SettingsAuditEventParams {
            operation: SettingsOperation::MapSettingsState,
            input_bytes: response.len() + stored_settings.map_or(0, str::len),
            output_bytes: result.as_ref().ok().map(|mapped| mapped.settings.len()),
            secrets_restored: result.as_ref().map_or(0, |mapped| mapped.report.secrets_restored()),
            error_kind: result.as_ref().err().map(SettingsStateError::kind_label),
        });
        result
    }

    /// Normalizes planned settings text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsStateError`] when the text cannot be canonicalized.
    pub fn normalize_planned_settings(&self, planned: &str) -> Result<String, SettingsStateError> {
        let result = normalize_planned_settings(planned, &self.limits);
        self.record(SettingsAuditEventParams {
            operation: SettingsOperation::NormalizePlannedSettings,
            input_bytes: planned.len(),
            output_bytes: result.as_ref().ok().map(String::len),
            secrets_restored: 0,
            error_kind: result.as_ref().err().map(SettingsStateError::kind_label),
        });
        result
    }

    /// Returns true when two settings texts differ only in key order.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] when either text cannot be canonicalized.
    pub fn equivalent(&self, left: &str, right: &str) -> Result<bool, CanonicalError> {
        let result = settings_equivalent(left, right, &self.limits);
        self.record(SettingsAuditEventParams {
            operation: SettingsOperation::Equivalent,
            input_bytes: left.len() + right.len(),
            output_bytes: None,
            secrets_restored: 0,
            error_kind: result.as_ref().err().map(CanonicalError::kind_label),
        });
        result
    }

    /// Emits one audit event.
    fn record(&self, params: SettingsAuditEventParams) {
        self.audit.record(&SettingsAuditEvent::new(params));
    }
}
