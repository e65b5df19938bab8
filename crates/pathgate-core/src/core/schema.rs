// pathgate-core/src/core/schema.rs
// ============================================================================
// Module: Record Schemas
// Description: Required-field sets for records written under guarded paths.
// Purpose: Provide the shallow schema contracts referenced by validation rules.
// Dependencies: crate::core::{expr, identifiers}, serde
// ============================================================================

//! ## Overview
//! Schemas here are shallow: a record kind names the fields that must be
//! present in a proposed write. Field types are left unconstrained; the
//! engine's rule language checks presence only. Two built-in kinds cover the
//! guarded collections: saved recipes and recipe history entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::expr::AccessExpr;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Record Schema
// ============================================================================

/// Shallow schema for one record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record kind name, for diagnostics only.
    pub kind: String,
    /// Fields that must be present in a proposed write.
    pub required: Vec<FieldName>,
}

impl RecordSchema {
    /// Creates a schema from a kind name and required fields.
    #[must_use]
    pub fn new(kind: impl Into<String>, required: Vec<FieldName>) -> Self {
        Self {
            kind: kind.into(),
            required,
        }
    }

    /// Returns the presence-check expression for this schema.
    #[must_use]
    pub fn presence_expr(&self) -> AccessExpr {
        AccessExpr::new_data_has_children(self.required.clone())
    }
}

// ============================================================================
// SECTION: Built-In Schemas
// ============================================================================

/// Schema for a saved recipe record.
#[must_use]
pub fn saved_recipe() -> RecordSchema {
    RecordSchema::new(
        "saved_recipe",
        vec![
            FieldName::new("id"),
            FieldName::new("userId"),
            FieldName::new("recipe"),
            FieldName::new("savedAt"),
        ],
    )
}

/// Schema for a recipe history record.
#[must_use]
pub fn recipe_history() -> RecordSchema {
    RecordSchema::new(
        "recipe_history",
        vec![
            FieldName::new("id"),
            FieldName::new("userId"),
            FieldName::new("query"),
            FieldName::new("type"),
            FieldName::new("recipes"),
            FieldName::new("createdAt"),
        ],
    )
}
