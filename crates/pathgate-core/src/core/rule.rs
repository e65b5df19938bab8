// pathgate-core/src/core/rule.rs
// ============================================================================
// Module: Rule Documents
// Description: Nested rule-node tree mapping path templates to access rules.
// Purpose: Define the canonical policy table with validation helpers.
// Dependencies: crate::core::{expr, identifiers, path}, serde, thiserror
// ============================================================================

//! ## Overview
//! A rules document is a static tree. Each node may carry `read`, `write`,
//! and `validate` expressions plus index hints, and has literal children
//! keyed by segment value and at most one capture child. Documents are
//! validated at load time to enforce invariants such as resolvable capture
//! references and unique capture names along any root-to-leaf path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::expr::AccessExpr;
use crate::core::identifiers::CaptureName;
use crate::core::identifiers::FieldName;
use crate::core::path::MAX_PATH_DEPTH;

// ============================================================================
// SECTION: Rule Errors
// ============================================================================

/// Errors raised while validating a rules document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    /// A capture name repeats along a root-to-leaf path.
    #[error("capture '${name}' at '{at}' shadows an ancestor capture")]
    DuplicateCapture {
        /// Repeated capture name.
        name: CaptureName,
        /// Template path of the offending node.
        at: String,
    },
    /// An expression references a capture not bound at or above its node.
    #[error("expression at '{at}' references unbound capture '${name}'")]
    UnboundCapture {
        /// Unresolved capture name.
        name: CaptureName,
        /// Template path of the offending node.
        at: String,
    },
    /// An index hint entry is empty.
    #[error("index hint at '{at}' contains an empty field name")]
    EmptyIndexField {
        /// Template path of the offending node.
        at: String,
    },
    /// An index hint lists the same field twice.
    #[error("index hint at '{at}' repeats field '{field}'")]
    DuplicateIndexField {
        /// Repeated field name.
        field: FieldName,
        /// Template path of the offending node.
        at: String,
    },
    /// A capture child has an empty name.
    #[error("capture child at '{at}' has an empty name")]
    EmptyCaptureName {
        /// Template path of the parent node.
        at: String,
    },
    /// A literal child key is empty or reserved.
    #[error("literal child key '{key}' at '{at}' is empty or reserved")]
    InvalidChildKey {
        /// Offending key.
        key: String,
        /// Template path of the parent node.
        at: String,
    },
    /// The tree exceeds the maximum path depth.
    #[error("rule tree exceeds maximum depth of {MAX_PATH_DEPTH} at '{at}'")]
    DepthExceeded {
        /// Template path of the offending node.
        at: String,
    },
}

// ============================================================================
// SECTION: Rule Node
// ============================================================================

/// Capture child of a rule node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureChild {
    /// Capture variable bound by this child.
    pub name: CaptureName,
    /// Subtree rules.
    pub node: RuleNode,
}

/// One node of the rules tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleNode {
    /// Read authorization expression, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<AccessExpr>,
    /// Write authorization expression, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<AccessExpr>,
    /// Write validation expression, when present. Validation never grants
    /// access; it only constrains the proposed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<AccessExpr>,
    /// Secondary index hints for the engine's query planner. Hints are a
    /// performance surface and carry no authorization meaning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_on: Vec<FieldName>,
    /// Literal children keyed by segment value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, RuleNode>,
    /// Capture child, at most one per node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<Box<CaptureChild>>,
}

impl RuleNode {
    /// Returns true when the node carries no rules, hints, or children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read.is_none()
            && self.write.is_none()
            && self.validate.is_none()
            && self.index_on.is_empty()
            && self.children.is_empty()
            && self.capture.is_none()
    }
}

// ============================================================================
// SECTION: Rules Document
// ============================================================================

/// A complete, immutable policy table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesDocument {
    /// Root rule node, corresponding to the database root.
    pub root: RuleNode,
}

impl RulesDocument {
    /// Creates a document from a root node.
    #[must_use]
    pub const fn new(root: RuleNode) -> Self {
        Self {
            root,
        }
    }

    /// Validates the document invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError`] when validation fails.
    pub fn validate(&self) -> Result<(), RuleSetError> {
        let mut bound = Vec::new();
        ensure_node_valid(&self.root, &mut bound, String::new(), 0)
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Validates one node and its subtree with the captures bound above it.
fn ensure_node_valid(
    node: &RuleNode,
    bound: &mut Vec<CaptureName>,
    at: String,
    depth: usize,
) -> Result<(), RuleSetError> {
    if depth > MAX_PATH_DEPTH {
        return Err(RuleSetError::DepthExceeded {
            at,
        });
    }

    ensure_expressions_resolve(node, bound, &at)?;
    ensure_index_hints_well_formed(node, &at)?;

    for (key, child) in &node.children {
        if key.is_empty() || key.starts_with('$') || key.starts_with('.') {
            return Err(RuleSetError::InvalidChildKey {
                key: key.clone(),
                at,
            });
        }
        let child_at = join_path(&at, key);
        ensure_node_valid(child, bound, child_at, depth + 1)?;
    }

    if let Some(capture) = &node.capture {
        if capture.name.as_str().is_empty() {
            return Err(RuleSetError::EmptyCaptureName {
                at,
            });
        }
        let child_at = join_path(&at, &format!("${}", capture.name));
        if bound.contains(&capture.name) {
            return Err(RuleSetError::DuplicateCapture {
                name: capture.name.clone(),
                at: child_at,
            });
        }
        bound.push(capture.name.clone());
        let result = ensure_node_valid(&capture.node, bound, child_at, depth + 1);
        bound.pop();
        result?;
    }

    Ok(())
}

/// Ensures every capture referenced by the node's expressions is bound.
fn ensure_expressions_resolve(
    node: &RuleNode,
    bound: &[CaptureName],
    at: &str,
) -> Result<(), RuleSetError> {
    let mut referenced = Vec::new();
    for expr in [&node.read, &node.write, &node.validate].into_iter().flatten() {
        expr.referenced_captures(&mut referenced);
    }
    for name in referenced {
        if !bound.contains(&name) {
            return Err(RuleSetError::UnboundCapture {
                name,
                at: at.to_string(),
            });
        }
    }
    Ok(())
}

/// Ensures index hints are non-empty and free of duplicates.
fn ensure_index_hints_well_formed(node: &RuleNode, at: &str) -> Result<(), RuleSetError> {
    for (index, field) in node.index_on.iter().enumerate() {
        if field.as_str().is_empty() {
            return Err(RuleSetError::EmptyIndexField {
                at: at.to_string(),
            });
        }
        if node.index_on.iter().take(index).any(|earlier| earlier == field) {
            return Err(RuleSetError::DuplicateIndexField {
                field: field.clone(),
                at: at.to_string(),
            });
        }
    }
    Ok(())
}

/// Joins a parent template path with a child segment for diagnostics.
fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}/{segment}")
    }
}
