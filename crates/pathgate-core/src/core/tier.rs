// pathgate-core/src/core/tier.rs
// ============================================================================
// Module: Ruleset Tiers
// Description: The three shipped policy variants and their builders.
// Purpose: Generate deterministic rules documents for each deployment tier.
// Dependencies: crate::core::{expr, rule, schema}, serde
// ============================================================================

//! ## Overview
//! Three tiers ship with distinct postures and are never collapsed into one
//! policy:
//!
//! - `Dev`: any authenticated subject may read any user subtree; only the
//!   owner may write. Index hints only, no field validation.
//! - `Default`: owner-only read/write at the user node; nested collections
//!   are fully open and rely on the parent check having scoped the path.
//!   This is a documented weaker posture, preserved as-is.
//! - `Strict`: every node independently re-checks ownership, and write
//!   validation additionally requires the payload's `userId` to equal the
//!   authenticated subject. Two independent checks guard the same invariant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::expr::AccessExpr;
use crate::core::rule::CaptureChild;
use crate::core::rule::RuleNode;
use crate::core::rule::RulesDocument;
use crate::core::schema;
use crate::core::schema::RecordSchema;

// ============================================================================
// SECTION: Path Vocabulary
// ============================================================================

/// Literal segment for the user collection root.
const USERS: &str = "users";
/// Literal segment for the saved recipe collection.
const SAVED_RECIPES: &str = "saved_recipes";
/// Literal segment for the recipe history collection.
const RECIPE_HISTORY: &str = "recipe_history";
/// Capture name for the user node.
const UID: &str = "uid";
/// Capture name for a saved recipe entry.
const RECIPE_ID: &str = "recipeId";
/// Capture name for a history entry.
const HISTORY_ID: &str = "historyId";
/// Payload field carrying the owning subject.
const USER_ID_FIELD: &str = "userId";

// ============================================================================
// SECTION: Tier Selection
// ============================================================================

/// Deployment tier selecting one of the shipped policy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetTier {
    /// Permissive development tier. Not for production use.
    Dev,
    /// Default tier with owner-scoped user nodes and open nested
    /// collections.
    Default,
    /// Strict production tier with defense-in-depth ownership checks.
    Strict,
}

impl RulesetTier {
    /// All tiers in ascending strictness order.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Default, Self::Strict];

    /// Builds the rules document for this tier.
    #[must_use]
    pub fn document(self) -> RulesDocument {
        match self {
            Self::Dev => dev_rules(),
            Self::Default => default_rules(),
            Self::Strict => strict_rules(),
        }
    }
}

impl fmt::Display for RulesetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dev => "dev",
            Self::Default => "default",
            Self::Strict => "strict",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SECTION: Tier Builders
// ============================================================================

/// Builds the permissive development rules.
///
/// Reads require only authentication, so any signed-in subject can read any
/// user's collections. Writes remain owner-only. The collection nodes carry
/// index hints for the query planner and no validation.
#[must_use]
pub fn dev_rules() -> RulesDocument {
    let user_node = RuleNode {
        read: Some(AccessExpr::authenticated()),
        write: Some(AccessExpr::auth_uid_equals_capture(UID)),
        children: [
            (
                SAVED_RECIPES.to_string(),
                RuleNode {
                    index_on: vec![USER_ID_FIELD.into(), "savedAt".into()],
                    ..RuleNode::default()
                },
            ),
            (
                RECIPE_HISTORY.to_string(),
                RuleNode {
                    index_on: vec![USER_ID_FIELD.into(), "createdAt".into(), "type".into()],
                    ..RuleNode::default()
                },
            ),
        ]
        .into(),
        ..RuleNode::default()
    };
    document_with_user_node(user_node)
}

/// Builds the default rules.
///
/// The user node is owner-only; the nested collection entries are fully open
/// (`read: true, write: true`) and rely on the parent restriction having
/// already scoped the path. Validation checks field presence only.
#[must_use]
pub fn default_rules() -> RulesDocument {
    let user_node = RuleNode {
        read: Some(AccessExpr::auth_uid_equals_capture(UID)),
        write: Some(AccessExpr::auth_uid_equals_capture(UID)),
        children: [
            (
                SAVED_RECIPES.to_string(),
                collection_node(RECIPE_ID, open_entry(&schema::saved_recipe())),
            ),
            (
                RECIPE_HISTORY.to_string(),
                collection_node(HISTORY_ID, open_entry(&schema::recipe_history())),
            ),
        ]
        .into(),
        ..RuleNode::default()
    };
    document_with_user_node(user_node)
}

/// Builds the strict production rules.
///
/// Every node re-checks `auth.uid === $uid`, and entry validation also
/// requires the payload's `userId` to equal the authenticated subject, so a
/// subject cannot write another subject's record even if a path-level check
/// were bypassed.
#[must_use]
pub fn strict_rules() -> RulesDocument {
    let user_node = RuleNode {
        read: Some(AccessExpr::auth_uid_equals_capture(UID)),
        write: Some(AccessExpr::auth_uid_equals_capture(UID)),
        validate: Some(AccessExpr::auth_uid_equals_capture(UID)),
        children: [
            (
                SAVED_RECIPES.to_string(),
                collection_node(RECIPE_ID, strict_entry(&schema::saved_recipe())),
            ),
            (
                RECIPE_HISTORY.to_string(),
                collection_node(HISTORY_ID, strict_entry(&schema::recipe_history())),
            ),
        ]
        .into(),
        ..RuleNode::default()
    };
    document_with_user_node(user_node)
}

// ============================================================================
// SECTION: Builder Helpers
// ============================================================================

/// Wraps a user node under `users/$uid`.
fn document_with_user_node(user_node: RuleNode) -> RulesDocument {
    RulesDocument::new(RuleNode {
        children: [(
            USERS.to_string(),
            RuleNode {
                capture: Some(Box::new(CaptureChild {
                    name: UID.into(),
                    node: user_node,
                })),
                ..RuleNode::default()
            },
        )]
        .into(),
        ..RuleNode::default()
    })
}

/// Wraps an entry node under a `$capture` child of a collection node.
fn collection_node(capture: &str, entry: RuleNode) -> RuleNode {
    RuleNode {
        capture: Some(Box::new(CaptureChild {
            name: capture.into(),
            node: entry,
        })),
        ..RuleNode::default()
    }
}

/// Entry node for the default tier: open access, presence validation.
fn open_entry(record: &RecordSchema) -> RuleNode {
    RuleNode {
        read: Some(AccessExpr::boolean(true)),
        write: Some(AccessExpr::boolean(true)),
        validate: Some(record.presence_expr()),
        ..RuleNode::default()
    }
}

/// Entry node for the strict tier: ownership re-check plus payload binding.
fn strict_entry(record: &RecordSchema) -> RuleNode {
    RuleNode {
        read: Some(AccessExpr::auth_uid_equals_capture(UID)),
        write: Some(AccessExpr::auth_uid_equals_capture(UID)),
        validate: Some(AccessExpr::and(vec![
            AccessExpr::new_data_child_equals_auth_uid(USER_ID_FIELD),
            record.presence_expr(),
        ])),
        ..RuleNode::default()
    }
}
