// crates/settings-catalog-core/tests/normalizer.rs
// ============================================================================
// Module: Settings Normalizer Tests
// Description: Limits enforcement and audit emission for the normalizer.
// ============================================================================
//! ## Overview
//! Validates that every normalizer operation emits exactly one audit event,
//! that events never carry secret payloads, and that the file sink appends
//! JSON lines.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use settings_catalog_core::AuditOutcome;
use settings_catalog_core::FileAuditSink;
use settings_catalog_core::Limits;
use settings_catalog_core::SECRET_SETTING_VALUE_TYPE;
use settings_catalog_core::SettingsAuditEvent;
use settings_catalog_core::SettingsAuditSink;
use settings_catalog_core::SettingsNormalizer;
use settings_catalog_core::SettingsOperation;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Sink that keeps every event in memory.
#[derive(Default)]
struct RecordingSink {
    /// Captured events in emission order.
    events: Mutex<Vec<SettingsAuditEvent>>,
}

impl RecordingSink {
    /// Returns a snapshot of captured events.
    fn events(&self) -> Vec<SettingsAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SettingsAuditSink for RecordingSink {
    fn record(&self, event: &SettingsAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Builds a normalizer wired to a recording sink.
fn recording_normalizer(limits: Limits) -> (SettingsNormalizer, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let normalizer = SettingsNormalizer::new(limits, sink.clone());
    (normalizer, sink)
}

/// Builds a stored document with one secret.
fn stored_document(value: &str) -> Value {
    json!({"settingsDetails": [{
        "settingInstance": {
            "simpleSettingValue": {
                "@odata.type": SECRET_SETTING_VALUE_TYPE,
                "value": value,
                "valueState": "notEncrypted",
            }
        }
    }]})
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Tests canonicalization records sizes and a success outcome.
#[test]
fn canonicalize_records_success_event() {
    let (normalizer, sink) = recording_normalizer(Limits::default());
    let output = normalizer.canonicalize(r#"{ "b": 1, "a": 2 }"#).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event, "settings_normalization");
    assert_eq!(event.operation, SettingsOperation::Canonicalize);
    assert_eq!(event.outcome, AuditOutcome::Success);
    assert_eq!(event.input_bytes, 18);
    assert_eq!(event.output_bytes, Some(output.len()));
    assert_eq!(event.error_kind, None);
}

/// Tests failures record the error kind and no output size.
#[test]
fn failures_record_error_kind() {
    let limits = Limits {
        max_input_bytes: 4,
        ..Limits::default()
    };
    let (normalizer, sink) = recording_normalizer(limits);
    assert!(normalizer.canonicalize(r#"{"a":1}"#).is_err());
    assert!(normalizer.equivalent("[]", "{").is_err());

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].outcome, AuditOutcome::Failure);
    assert_eq!(events[0].error_kind, Some("input_too_large"));
    assert_eq!(events[0].output_bytes, None);
    assert_eq!(events[1].operation, SettingsOperation::Equivalent);
    assert_eq!(events[1].error_kind, Some("parse"));
}

/// Tests state mapping records restored secret counts without payloads.
#[test]
fn map_settings_state_records_restored_count() {
    let (normalizer, sink) = recording_normalizer(Limits::default());
    let stored = stored_document("correct-horse-battery").to_string();
    let mut response = stored_document("ZW5jcnlwdGVk");
    response["settingsDetails"][0]["settingInstance"]["simpleSettingValue"]["valueState"] =
        json!("encryptedValueToken");
    let response = json!({"value": response["settingsDetails"].clone()}).to_string();

    let mapped = normalizer.map_settings_state(Some(&stored), &response).unwrap();

    assert!(mapped.settings.contains("correct-horse-battery"));
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, SettingsOperation::MapSettingsState);
    assert_eq!(events[0].secrets_restored, 1);
    assert_eq!(events[0].input_bytes, stored.len() + response.len());
    let serialized = serde_json::to_string(&events[0]).unwrap();
    assert!(!serialized.contains("correct-horse-battery"));
    assert!(serialized.contains(r#""operation":"map_settings_state""#));
}

/// Tests tree-level preservation and planned normalization are audited.
#[test]
fn preserve_and_plan_operations_are_audited() {
    let (normalizer, sink) = recording_normalizer(Limits::default());
    let config = stored_document("s3cret");
    let mut response = stored_document("token");

    let report = normalizer.preserve_secrets(&config, &mut response).unwrap();
    assert_eq!(report.secrets_restored(), 1);
    assert_eq!(response, config);

    normalizer.normalize_planned_settings(r#"{"b":[],"a":{}}"#).unwrap();
    assert!(normalizer.preserve_secrets(&Value::Null, &mut response).is_err());

    let events = sink.events();
    let operations: Vec<SettingsOperation> = events.iter().map(|event| event.operation).collect();
    assert_eq!(
        operations,
        [
            SettingsOperation::PreserveSecrets,
            SettingsOperation::NormalizePlannedSettings,
            SettingsOperation::PreserveSecrets,
        ]
    );
    assert_eq!(events[0].secrets_restored, 1);
    assert_eq!(events[0].input_bytes, 0);
    assert_eq!(events[1].output_bytes, Some(r#"{"a":{},"b":[]}"#.len()));
    assert_eq!(events[2].error_kind, Some("nil_input"));
}

/// Tests preservation of decoded texts audits their combined size.
#[test]
fn preserve_secrets_records_source_text_size() {
    let (normalizer, sink) = recording_normalizer(Limits::default());
    let stored = serde_json::to_string(&stored_document("s3cret")).unwrap();
    let served = serde_json::to_string(&stored_document("token")).unwrap();
    let config: Value = serde_json::from_str(&stored).unwrap();
    let mut response: Value = serde_json::from_str(&served).unwrap();

    normalizer
        .preserve_secrets_with_input_bytes(&config, &mut response, stored.len() + served.len())
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, SettingsOperation::PreserveSecrets);
    assert_eq!(events[0].input_bytes, stored.len() + served.len());
    assert_eq!(events[0].secrets_restored, 1);
}

/// Tests the normalizer applies its configured limits.
#[test]
fn normalizer_applies_limits() {
    let limits = Limits {
        max_depth: 1,
        ..Limits::default()
    };
    let (normalizer, _sink) = recording_normalizer(limits);
    assert_eq!(normalizer.limits().max_depth, 1);
    assert!(normalizer.canonicalize(r#"{"a":1}"#).is_ok());
    assert!(normalizer.canonicalize(r#"{"a":[]}"#).is_err());
    assert!(normalizer.equivalent(r#"{"a":1}"#, r#"{"a":1}"#).unwrap());
}

/// Tests the default normalizer works without an audit sink.
#[test]
fn default_normalizer_uses_default_limits() {
    let normalizer = SettingsNormalizer::default();
    assert_eq!(*normalizer.limits(), Limits::default());
    assert_eq!(normalizer.canonicalize(r#"{"b":1,"a":2}"#).unwrap(), r#"{"a":2,"b":1}"#);
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Tests the file sink appends one JSON line per event.
#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let sink = Arc::new(FileAuditSink::new(&path).unwrap());
    let normalizer = SettingsNormalizer::new(Limits::default(), sink);

    normalizer.canonicalize("{}").unwrap();
    assert!(normalizer.canonicalize("{").is_err());

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["outcome"], "success");
    assert_eq!(lines[1]["outcome"], "failure");
    assert_eq!(lines[1]["error_kind"], "parse");
}
