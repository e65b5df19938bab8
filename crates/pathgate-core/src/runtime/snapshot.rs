// pathgate-core/src/runtime/snapshot.rs
// ============================================================================
// Module: Value Snapshots
// Description: Read-only accessor over a proposed write value.
// Purpose: Mirror the engine's `newData` surface for expression evaluation.
// Dependencies: crate::core::identifiers, serde_json
// ============================================================================

//! ## Overview
//! Validation expressions observe the proposed write through the engine's
//! `newData` accessors: `child(field)`, `val()`, and `hasChildren([...])`.
//! A snapshot over an absent value exists but answers every question
//! negatively, which keeps evaluation fail-closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Value Snapshot
// ============================================================================

/// Read-only view over an optional JSON value.
#[derive(Debug, Clone, Copy)]
pub struct ValueSnapshot<'a> {
    /// Underlying value, when one exists at this location.
    value: Option<&'a Value>,
}

impl<'a> ValueSnapshot<'a> {
    /// Creates a snapshot over an optional value.
    #[must_use]
    pub const fn new(value: Option<&'a Value>) -> Self {
        Self {
            value,
        }
    }

    /// Creates a snapshot over a missing value.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            value: None,
        }
    }

    /// Returns true when a value exists at this location.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the raw value, when present.
    #[must_use]
    pub const fn val(&self) -> Option<&'a Value> {
        self.value
    }

    /// Returns a snapshot over the named child field.
    #[must_use]
    pub fn child(&self, field: &FieldName) -> Self {
        Self {
            value: self.value.and_then(|value| value.get(field.as_str())),
        }
    }

    /// Returns true when the value is an object containing every named
    /// field. An empty field list is vacuously satisfied by any object.
    #[must_use]
    pub fn has_children(&self, fields: &[FieldName]) -> bool {
        match self.value {
            Some(Value::Object(map)) => {
                fields.iter().all(|field| map.contains_key(field.as_str()))
            }
            _ => false,
        }
    }

    /// Returns the value as a string slice, when it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.value {
            Some(Value::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}
