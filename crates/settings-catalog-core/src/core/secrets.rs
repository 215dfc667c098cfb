// crates/settings-catalog-core/src/core/secrets.rs
// ============================================================================
// Module: Secret Preservation
// Description: Restores redacted secret setting values from stored config.
// Purpose: Reconcile service responses with the last-known secret payloads.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The service redacts secret setting values on read, returning a token in
//! place of the configured payload. Preservation walks the stored config tree
//! and the response tree in lockstep and, at every secret setting value node
//! in the config, copies `value` and `valueState` into the response.
//!
//! Traversal rules:
//! - Objects recurse into keys present on both sides; other keys are skipped.
//! - Arrays recurse pairwise up to the shorter length.
//! - Scalars must share a kind; nothing is ever written outside secret nodes.
//! - Null at the root is an error; null below the root is treated as absent.
//!
//! Reports carry JSON Pointers and value states only, never secret payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::odata::SECRET_VALUE_KEY;
use crate::core::odata::SECRET_VALUE_STATE_KEY;
use crate::core::odata::SecretValueState;
use crate::core::odata::is_secret_setting_value;
use crate::core::tree::JsonPath;
use crate::core::tree::Limits;
use crate::core::tree::ValueKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Root argument of a preservation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootArgument {
    /// Stored configuration tree.
    Config,
    /// Service response tree.
    Response,
}

impl fmt::Display for RootArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("config"),
            Self::Response => f.write_str("response"),
        }
    }
}

/// Errors raised while preserving secret values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretPreservationError {
    /// A root argument is null.
    #[error("secret preservation requires a non-null {argument} tree")]
    NilInput {
        /// Argument that was null.
        argument: RootArgument,
    },
    /// Config and response disagree on the kind of a node.
    #[error("type mismatch at '{path}': config is {expected}, response is {actual}")]
    TypeMismatch {
        /// JSON Pointer of the mismatched node.
        path: String,
        /// Kind found in the config tree.
        expected: ValueKind,
        /// Kind found in the response tree.
        actual: ValueKind,
    },
    /// Container nesting exceeds the configured depth limit.
    #[error("settings tree exceeds max depth of {limit} at '{path}'")]
    DepthLimitExceeded {
        /// JSON Pointer of the container that exceeded the limit.
        path: String,
        /// Configured depth limit.
        limit: usize,
    },
}

impl SecretPreservationError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::NilInput {
                ..
            } => "nil_input",
            Self::TypeMismatch {
                ..
            } => "type_mismatch",
            Self::DepthLimitExceeded {
                ..
            } => "depth_limit",
        }
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Record of a single restored secret node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoredSecret {
    /// JSON Pointer of the secret node in the response tree.
    pub pointer: String,
    /// Whether the `value` member was copied.
    pub value_copied: bool,
    /// Whether the `valueState` member was copied.
    pub value_state_copied: bool,
    /// Copied value state when it is a recognized label.
    pub value_state: Option<SecretValueState>,
}

/// Summary of a preservation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreservationReport {
    /// Restored secret nodes in traversal order.
    pub restored: Vec<RestoredSecret>,
}

impl PreservationReport {
    /// Number of secret nodes restored.
    #[must_use]
    pub fn secrets_restored(&self) -> usize {
        self.restored.len()
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Copies secret values from `config` into `response` using default limits.
///
/// # Errors
///
/// Returns [`SecretPreservationError::NilInput`] when either root is null and
/// [`SecretPreservationError::TypeMismatch`] when the trees disagree on kind.
pub fn preserve_secrets(
    config: &Value,
    response: &mut Value,
) -> Result<(), SecretPreservationError> {
    preserve_secrets_with_report(config, response, &Limits::default()).map(|_| ())
}

/// Copies secret values from `config` into `response` and reports each node.
///
/// # Errors
///
/// Returns [`SecretPreservationError`] on null roots, kind mismatches, or when
/// the depth limit is exceeded. The response may be partially updated on error.
pub fn preserve_secrets_with_report(
    config: &Value,
    response: &mut Value,
    limits: &Limits,
) -> Result<PreservationReport, SecretPreservationError> {
    if config.is_null() {
        return Err(SecretPreservationError::NilInput {
            argument: RootArgument::Config,
        });
    }
    if response.is_null() {
        return Err(SecretPreservationError::NilInput {
            argument: RootArgument::Response,
        });
    }
    let mut walker = SecretWalker {
        limits,
        path: JsonPath::root(),
        report: PreservationReport::default(),
    };
    walker.walk(config, response)?;
    Ok(walker.report)
}

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// Lockstep walker over config and response trees.
struct SecretWalker<'a> {
    /// Traversal limits.
    limits: &'a Limits,
    /// Current position.
    path: JsonPath,
    /// Restored nodes so far.
    report: PreservationReport,
}

impl SecretWalker<'_> {
    /// Walks one config/response pair.
    fn walk(
        &mut self,
        config: &Value,
        response: &mut Value,
    ) -> Result<(), SecretPreservationError> {
        match config {
            Value::Object(config_map) => {
                let actual = ValueKind::of(response);
                let Value::Object(response_map) = response else {
                    return Err(self.mismatch(ValueKind::Object, actual));
                };
                self.ensure_depth()?;
                if is_secret_setting_value(config) {
                    self.restore(config_map, response_map);
                    return Ok(());
                }
                for (key, config_child) in config_map {
                    let Some(response_child) = response_map.get_mut(key) else {
                        continue;
                    };
                    if config_child.is_null() || response_child.is_null() {
                        continue;
                    }
                    self.path.push_key(key);
                    self.walk(config_child, response_child)?;
                    self.path.pop();
                }
                Ok(())
            }
            Value::Array(config_items) => {
                let actual = ValueKind::of(response);
                let Value::Array(response_items) = response else {
                    return Err(self.mismatch(ValueKind::Array, actual));
                };
                self.ensure_depth()?;
                for (index, (config_child, response_child)) in
                    config_items.iter().zip(response_items.iter_mut()).enumerate()
                {
                    if config_child.is_null() || response_child.is_null() {
                        continue;
                    }
                    self.path.push_index(index);
                    self.walk(config_child, response_child)?;
                    self.path.pop();
                }
                Ok(())
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
                let expected = ValueKind::of(config);
                let actual = ValueKind::of(response);
                if expected == actual {
                    Ok(())
                } else {
                    Err(self.mismatch(expected, actual))
                }
            }
        }
    }

    /// Copies the secret members of a config node into the response node.
    fn restore(&mut self, config: &Map<String, Value>, response: &mut Map<String, Value>) {
        let value_copied = copy_member(config, response, SECRET_VALUE_KEY);
        let value_state_copied = copy_member(config, response, SECRET_VALUE_STATE_KEY);
        let value_state = config
            .get(SECRET_VALUE_STATE_KEY)
            .and_then(Value::as_str)
            .and_then(SecretValueState::parse);
        self.report.restored.push(RestoredSecret {
            pointer: self.path.to_pointer(),
            value_copied,
            value_state_copied,
            value_state,
        });
    }

    /// Fails when the container at the current path exceeds the depth limit.
    fn ensure_depth(&self) -> Result<(), SecretPreservationError> {
        if self.limits.allows_depth(self.path.depth() + 1) {
            Ok(())
        } else {
            Err(SecretPreservationError::DepthLimitExceeded {
                path: self.path.to_pointer(),
                limit: self.limits.max_depth,
            })
        }
    }

    /// Builds a mismatch error for the current path.
    fn mismatch(&self, expected: ValueKind, actual: ValueKind) -> SecretPreservationError {
        SecretPreservationError::TypeMismatch {
            path: self.path.to_pointer(),
            expected,
            actual,
        }
    }
}

/// Copies one member when the config carries it; returns whether it did.
fn copy_member(
    config: &Map<String, Value>,
    response: &mut Map<String, Value>,
    key: &str,
) -> bool {
    match config.get(key) {
        Some(value) => {
            response.insert(key.to_string(), value.clone());
            true
        }
        None => false,
    }
}
