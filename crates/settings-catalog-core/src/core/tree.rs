// crates/settings-catalog-core/src/core/tree.rs
// ============================================================================
// Module: Settings Tree Helpers
// Description: Kind dispatch, traversal paths, and limits for JSON-like trees.
// Purpose: Share one traversal vocabulary between canonicalization and merge.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Settings trees are plain [`serde_json::Value`] trees. The workspace builds
//! `serde_json` with `preserve_order` (objects keep insertion order) and
//! `arbitrary_precision` (numbers keep their lexical form), so key ordering is
//! an explicit property of each tree and numbers never drift on re-encode.
//!
//! Security posture: settings trees may come from untrusted callers; every
//! traversal enforces [`Limits`] and fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum container nesting depth; the root container is depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 128;
/// Default maximum size of a settings JSON document in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

/// Resource limits applied to settings tree traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum container nesting depth; the root container is depth 1.
    pub max_depth: usize,
    /// Maximum accepted JSON text size in bytes.
    pub max_input_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl Limits {
    /// Returns true when a container at `depth` is within the depth limit.
    #[must_use]
    pub const fn allows_depth(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Returns true when a text input of `len` bytes is within the size limit.
    #[must_use]
    pub const fn allows_input(&self, len: usize) -> bool {
        len <= self.max_input_bytes
    }
}

// ============================================================================
// SECTION: Value Kinds
// ============================================================================

/// Runtime kind of a JSON-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Key/value mapping.
    Object,
    /// Ordered sequence.
    Array,
    /// String scalar.
    String,
    /// Number scalar.
    Number,
    /// Boolean scalar.
    Boolean,
    /// Null scalar.
    Null,
}

impl ValueKind {
    /// Classifies a JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// Returns the stable lowercase label for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Returns true for scalar kinds (including null).
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Traversal Paths
// ============================================================================

/// Single step in a traversal path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// Object member key.
    Key(String),
    /// Array element index.
    Index(usize),
}

/// Traversal position rendered as an RFC 6901 JSON Pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    /// Segments from the root to the current node.
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates a path pointing at the root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Descends into an object member.
    pub fn push_key(&mut self, key: &str) {
        self.segments.push(PathSegment::Key(key.to_string()));
    }

    /// Descends into an array element.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Returns to the parent node.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Number of segments between the root and the current node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true when the path points at the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the path as a JSON Pointer (`""` for the root).
    #[must_use]
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                PathSegment::Key(key) => {
                    pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
                }
                PathSegment::Index(index) => pointer.push_str(&index.to_string()),
            }
        }
        pointer
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
