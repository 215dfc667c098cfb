// crates/settings-catalog-core/src/lib.rs
// ============================================================================
// Module: Settings Catalog Core Library
// Description: Public API surface for Settings Catalog normalization.
// Purpose: Expose canonicalization, secret preservation, and state mapping.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Settings Catalog core normalizes Intune Settings Catalog trees for storage
//! and comparison. Canonicalization sorts object keys recursively so equal
//! settings always produce identical text. Secret preservation restores the
//! secret setting values the service redacts on read, using the stored
//! configuration as the source of truth.
//!
//! Callers run preservation first and canonicalization second; the two
//! algorithms are independent and both are pure functions over
//! `serde_json::Value` trees.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AuditOutcome;
pub use interfaces::SettingsAuditEvent;
pub use interfaces::SettingsAuditEventParams;
pub use interfaces::SettingsAuditSink;
pub use interfaces::SettingsOperation;
pub use runtime::FileAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::SettingsNormalizer;
pub use runtime::StderrAuditSink;
