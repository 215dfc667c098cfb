// crates/settings-catalog-core/src/core/mod.rs
// ============================================================================
// Module: Settings Catalog Core
// Description: Settings tree helpers, canonicalization, and secret preservation.
// Purpose: Provide the pure algorithms behind settings state and plan values.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core modules are pure functions over `serde_json::Value` trees. They hold
//! no state between calls and are safe to call concurrently on independently
//! owned trees.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod canonical;
pub mod envelope;
pub mod odata;
pub mod secrets;
pub mod tree;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use canonical::CanonicalError;
pub use canonical::canonical_string;
pub use canonical::canonicalize;
pub use canonical::canonicalize_value;
pub use canonical::canonicalize_with_limits;
pub use canonical::decode_settings;
pub use canonical::is_canonical;
pub use canonical::settings_equivalent;
pub use envelope::GRAPH_COLLECTION_KEY;
pub use envelope::MappedSettings;
pub use envelope::SETTINGS_DETAILS_KEY;
pub use envelope::SettingsStateError;
pub use envelope::extract_config_settings;
pub use envelope::extract_response_settings;
pub use envelope::map_settings_state;
pub use envelope::normalize_planned_settings;
pub use odata::ODATA_TYPE_KEY;
pub use odata::SECRET_SETTING_VALUE_TYPE;
pub use odata::SecretValueState;
pub use odata::SettingsCatalogType;
pub use odata::is_secret_setting_value;
pub use secrets::PreservationReport;
pub use secrets::RestoredSecret;
pub use secrets::RootArgument;
pub use secrets::SecretPreservationError;
pub use secrets::preserve_secrets;
pub use secrets::preserve_secrets_with_report;
pub use tree::DEFAULT_MAX_DEPTH;
pub use tree::DEFAULT_MAX_INPUT_BYTES;
pub use tree::JsonPath;
pub use tree::Limits;
pub use tree::ValueKind;
