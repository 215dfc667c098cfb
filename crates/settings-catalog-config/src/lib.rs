// crates/settings-catalog-config/src/lib.rs
// ============================================================================
// Module: Settings Catalog Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for settings-catalog.toml semantics.
// Dependencies: settings-catalog-core, serde, toml
// ============================================================================

//! ## Overview
//! `settings-catalog-config` defines the configuration model for settings
//! normalization: traversal limits and audit sink selection. Validation is
//! strict and fail-closed; unknown fields are rejected.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
