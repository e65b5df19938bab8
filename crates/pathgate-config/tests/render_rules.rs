// pathgate-config/tests/render_rules.rs
// ============================================================================
// Module: Rules Rendering Tests
// Description: Tests for JSON rules artifact rendering.
// Purpose: Pin the wire shape and determinism of rendered documents.
// Dependencies: pathgate-config, pathgate-core, serde_json
// ============================================================================
//! ## Overview
//! Spot-checks the rendered JSON of the shipped tiers: directive placement,
//! boolean shorthand, expression syntax, index hint arrays, and capture key
//! spelling. Rendering the same document twice must produce identical text.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use pathgate_config::render_expr;
use pathgate_config::rules_json;
use pathgate_config::rules_json_string;
use pathgate_core::AccessExpr;
use pathgate_core::FieldName;
use pathgate_core::RulesetTier;
use serde_json::Value;
use serde_json::json;

/// Follows a key path into a rendered JSON value.
fn dig<'a>(value: &'a Value, keys: &[&str]) -> &'a Value {
    let mut current = value;
    for key in keys {
        current = current.get(key).unwrap_or_else(|| panic!("missing key '{key}'"));
    }
    current
}

#[test]
fn strict_tier_renders_expected_document_shape() {
    let rendered = rules_json(&RulesetTier::Strict.document());

    let user = dig(&rendered, &["rules", "users", "$uid"]);
    assert_eq!(user[".read"], json!("auth.uid === $uid"));
    assert_eq!(user[".write"], json!("auth.uid === $uid"));
    assert_eq!(user[".validate"], json!("auth.uid === $uid"));

    let entry = dig(&rendered, &["rules", "users", "$uid", "saved_recipes", "$recipeId"]);
    assert_eq!(
        entry[".validate"],
        json!(
            "newData.child('userId').val() === auth.uid && \
             newData.hasChildren(['id', 'userId', 'recipe', 'savedAt'])"
        )
    );
}

#[test]
fn default_tier_uses_boolean_shorthand_for_open_entries() {
    let rendered = rules_json(&RulesetTier::Default.document());
    let entry = dig(&rendered, &["rules", "users", "$uid", "recipe_history", "$historyId"]);
    assert_eq!(entry[".read"], json!(true));
    assert_eq!(entry[".write"], json!(true));
    assert_eq!(
        entry[".validate"],
        json!("newData.hasChildren(['id', 'userId', 'query', 'type', 'recipes', 'createdAt'])")
    );
}

#[test]
fn dev_tier_renders_index_hints() {
    let rendered = rules_json(&RulesetTier::Dev.document());
    let recipes = dig(&rendered, &["rules", "users", "$uid", "saved_recipes"]);
    assert_eq!(recipes[".indexOn"], json!(["userId", "savedAt"]));

    let history = dig(&rendered, &["rules", "users", "$uid", "recipe_history"]);
    assert_eq!(history[".indexOn"], json!(["userId", "createdAt", "type"]));
}

#[test]
fn rendering_is_deterministic() {
    for tier in RulesetTier::ALL {
        let first = rules_json_string(&tier.document()).expect("render");
        let second = rules_json_string(&tier.document()).expect("render");
        assert_eq!(first, second, "tier {tier} must render identically");
    }
}

#[test]
fn expression_rendering_parenthesizes_by_precedence() {
    let or_inside_and = AccessExpr::and(vec![
        AccessExpr::authenticated(),
        AccessExpr::or(vec![AccessExpr::boolean(true), AccessExpr::boolean(false)]),
    ]);
    assert_eq!(render_expr(&or_inside_and), "auth != null && (true || false)");

    let and_inside_or = AccessExpr::or(vec![
        AccessExpr::authenticated(),
        AccessExpr::and(vec![AccessExpr::boolean(true), AccessExpr::boolean(false)]),
    ]);
    assert_eq!(render_expr(&and_inside_or), "auth != null || true && false");

    let negated = AccessExpr::negate(AccessExpr::authenticated());
    assert_eq!(render_expr(&negated), "!(auth != null)");
}

#[test]
fn degenerate_operator_lists_render_as_constants() {
    assert_eq!(render_expr(&AccessExpr::and(Vec::new())), "true");
    assert_eq!(render_expr(&AccessExpr::or(Vec::new())), "false");
}

#[test]
fn has_children_renders_fields_in_schema_order() {
    let expr = AccessExpr::new_data_has_children(vec![
        FieldName::new("id"),
        FieldName::new("userId"),
    ]);
    assert_eq!(render_expr(&expr), "newData.hasChildren(['id', 'userId'])");
}
