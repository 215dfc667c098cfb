// crates/settings-catalog-core/src/runtime/mod.rs
// ============================================================================
// Module: Settings Catalog Runtime
// Description: Normalizer facade and audit sink implementations.
// Purpose: Bind core algorithms to limits and audit routing for callers.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules wrap the pure core algorithms with configured limits and
//! audit emission. All callers go through the same core functions.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod normalizer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use normalizer::SettingsNormalizer;
