// crates/settings-catalog-core/src/core/canonical.rs
// ============================================================================
// Module: Settings Canonicalization
// Description: Recursive, order-independent key sorting for settings JSON.
// Purpose: Produce byte-stable settings text for state storage and diffing.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Canonical settings text sorts object keys in ascending byte-wise order at
//! every depth, keeps array element order, and leaves scalars untouched.
//! Numbers keep their source spelling because `serde_json` is built with
//! `arbitrary_precision`. Output is compact JSON.
//!
//! Ordering is byte-wise, not the UTF-16 ordering of RFC 8785, and numbers are
//! never reformatted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::tree::Limits;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while canonicalizing settings JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    /// Input text is not valid JSON.
    #[error("failed to parse settings json: {0}")]
    Parse(String),
    /// Canonical tree could not be re-encoded.
    #[error("failed to serialize canonical settings json: {0}")]
    Serialize(String),
    /// Container nesting exceeds the configured depth limit.
    #[error("settings json exceeds max depth of {limit}")]
    DepthLimitExceeded {
        /// Configured depth limit.
        limit: usize,
    },
    /// Input text exceeds the configured size limit.
    #[error("settings json exceeds size limit ({actual} > {limit} bytes)")]
    InputTooLarge {
        /// Configured size limit in bytes.
        limit: usize,
        /// Actual input size in bytes.
        actual: usize,
    },
}

impl CanonicalError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Serialize(_) => "serialize",
            Self::DepthLimitExceeded {
                ..
            } => "depth_limit",
            Self::InputTooLarge {
                ..
            } => "input_too_large",
        }
    }
}

// ============================================================================
// SECTION: Text Entry Points
// ============================================================================

/// Canonicalizes settings JSON text using default limits.
///
/// # Errors
///
/// Returns [`CanonicalError::Parse`] for malformed input and
/// [`CanonicalError::Serialize`] when re-encoding fails.
pub fn canonicalize(input: &str) -> Result<String, CanonicalError> {
    canonicalize_with_limits(input, &Limits::default())
}

/// Canonicalizes settings JSON text under explicit limits.
///
/// # Errors
///
/// Returns [`CanonicalError`] when the input is oversized, malformed, too
/// deeply nested, or cannot be re-encoded.
pub fn canonicalize_with_limits(input: &str, limits: &Limits) -> Result<String, CanonicalError> {
    let value = decode_settings(input, limits)?;
    render_canonical(value, limits)
}

/// Decodes settings JSON text after enforcing the size and depth limits.
///
/// Nesting is measured on the raw text before decoding, so the configured
/// `max_depth` is the only depth bound; the decoder's own recursion limit is
/// disabled.
///
/// # Errors
///
/// Returns [`CanonicalError::InputTooLarge`],
/// [`CanonicalError::DepthLimitExceeded`], or [`CanonicalError::Parse`].
pub fn decode_settings(input: &str, limits: &Limits) -> Result<Value, CanonicalError> {
    if !limits.allows_input(input.len()) {
        return Err(CanonicalError::InputTooLarge {
            limit: limits.max_input_bytes,
            actual: input.len(),
        });
    }
    ensure_text_depth(input, limits)?;
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)
        .map_err(|err| CanonicalError::Parse(err.to_string()))?;
    deserializer.end().map_err(|err| CanonicalError::Parse(err.to_string()))?;
    Ok(value)
}

/// Returns true when the input text is already in canonical form.
///
/// # Errors
///
/// Returns [`CanonicalError`] when the input cannot be canonicalized.
pub fn is_canonical(input: &str, limits: &Limits) -> Result<bool, CanonicalError> {
    Ok(canonicalize_with_limits(input, limits)? == input)
}

/// Returns true when two settings texts differ only in object key order.
///
/// Array order is significant, so reordered arrays are not equivalent.
///
/// # Errors
///
/// Returns [`CanonicalError`] when either input cannot be canonicalized.
pub fn settings_equivalent(
    left: &str,
    right: &str,
    limits: &Limits,
) -> Result<bool, CanonicalError> {
    let left = canonicalize_with_limits(left, limits)?;
    let right = canonicalize_with_limits(right, limits)?;
    Ok(left == right)
}

// ============================================================================
// SECTION: Value Entry Points
// ============================================================================

/// Serializes a settings tree in canonical form.
///
/// # Errors
///
/// Returns [`CanonicalError`] when the tree is too deep or cannot be encoded.
pub fn canonical_string(value: &Value, limits: &Limits) -> Result<String, CanonicalError> {
    render_canonical(value.clone(), limits)
}

/// Reorders every object in the tree by ascending key.
///
/// # Errors
///
/// Returns [`CanonicalError::DepthLimitExceeded`] when nesting exceeds the limit.
pub fn canonicalize_value(value: Value, limits: &Limits) -> Result<Value, CanonicalError> {
    sort_node(value, 1, limits)
}

/// Canonicalizes an owned tree and encodes it compactly.
pub(crate) fn render_canonical(value: Value, limits: &Limits) -> Result<String, CanonicalError> {
    let sorted = canonicalize_value(value, limits)?;
    serde_json::to_string(&sorted).map_err(|err| CanonicalError::Serialize(err.to_string()))
}

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// Sorts one node; `depth` is the depth this node has if it is a container.
fn sort_node(value: Value, depth: usize, limits: &Limits) -> Result<Value, CanonicalError> {
    match value {
        Value::Object(map) => {
            ensure_depth(depth, limits)?;
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
            let mut ordered = Map::with_capacity(entries.len());
            for (key, child) in entries {
                ordered.insert(key, sort_node(child, depth + 1, limits)?);
            }
            Ok(Value::Object(ordered))
        }
        Value::Array(items) => {
            ensure_depth(depth, limits)?;
            items
                .into_iter()
                .map(|item| sort_node(item, depth + 1, limits))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        scalar => Ok(scalar),
    }
}

/// Scans raw text and fails once an open bracket exceeds the depth limit.
///
/// Brackets inside string literals are skipped. Malformed text passes through
/// unchanged for the decoder to reject.
fn ensure_text_depth(input: &str, limits: &Limits) -> Result<(), CanonicalError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in input.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                ensure_depth(depth, limits)?;
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Fails when a container sits deeper than the limit allows.
fn ensure_depth(depth: usize, limits: &Limits) -> Result<(), CanonicalError> {
    if limits.allows_depth(depth) {
        Ok(())
    } else {
        Err(CanonicalError::DepthLimitExceeded {
            limit: limits.max_depth,
        })
    }
}
