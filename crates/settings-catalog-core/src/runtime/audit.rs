// crates/settings-catalog-core/src/runtime/audit.rs
// ============================================================================
// Module: Audit Sinks
// Description: Stderr, file, and no-op sinks for normalizer audit events.
// Purpose: Emit JSON-line audit records without a logging framework.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! Sinks serialize each event as one JSON line. Write failures are dropped so
//! auditing never fails a normalization call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::interfaces::SettingsAuditEvent;
use crate::interfaces::SettingsAuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl SettingsAuditSink for StderrAuditSink {
    fn record(&self, event: &SettingsAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SettingsAuditSink for FileAuditSink {
    fn record(&self, event: &SettingsAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl SettingsAuditSink for NoopAuditSink {
    fn record(&self, _event: &SettingsAuditEvent) {}
}
