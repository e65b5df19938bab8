// pathgate-config/tests/parse_rules.rs
// ============================================================================
// Module: Rules Parsing Tests
// Description: Tests for JSON rules document and expression parsing.
// Purpose: Ensure parsing accepts engine-format documents and fails closed.
// Dependencies: pathgate-config, pathgate-core, serde_json
// ============================================================================
//! ## Overview
//! Feeds engine-format JSON through the parser: console-style documents,
//! every supported expression form, and the error cases for input outside
//! the supported subset. Rendering then re-parsing a shipped tier must
//! reproduce the document exactly.

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

use pathgate_config::ParseError;
use pathgate_config::parse_expr;
use pathgate_config::parse_rules_json;
use pathgate_config::parse_rules_json_str;
use pathgate_config::rules_json;
use pathgate_core::AccessExpr;
use pathgate_core::CaptureName;
use pathgate_core::FieldName;
use pathgate_core::RulesetTier;
use serde_json::json;

#[test]
fn parses_console_style_document() {
    let input = r#"
    {
      "rules": {
        "users": {
          "$uid": {
            ".read": "auth != null && auth.uid === $uid",
            ".write": "auth.uid === $uid",
            "saved_recipes": {
              ".indexOn": ["userId", "savedAt"],
              "$recipeId": {
                ".validate": "newData.hasChildren(['id', 'userId', 'recipe', 'savedAt'])"
              }
            }
          }
        }
      }
    }
    "#;
    let document = parse_rules_json_str(input).expect("parse");
    assert_eq!(document.validate(), Ok(()));

    let users = document.root.children.get("users").expect("users node");
    let user = &users.capture.as_ref().expect("capture").node;
    assert_eq!(
        user.read,
        Some(AccessExpr::and(vec![
            AccessExpr::authenticated(),
            AccessExpr::auth_uid_equals_capture("uid"),
        ]))
    );
    assert_eq!(user.write, Some(AccessExpr::auth_uid_equals_capture("uid")));

    let recipes = user.children.get("saved_recipes").expect("collection node");
    assert_eq!(recipes.index_on, vec![FieldName::new("userId"), FieldName::new("savedAt")]);
    let entry = &recipes.capture.as_ref().expect("entry capture").node;
    assert_eq!(entry.capture, None);
    assert!(entry.validate.is_some());
}

#[test]
fn render_then_parse_reproduces_each_tier() {
    for tier in RulesetTier::ALL {
        let document = tier.document();
        let reparsed = parse_rules_json(&rules_json(&document)).expect("reparse");
        assert_eq!(reparsed, document, "tier {tier}");
    }
}

#[test]
fn expression_subset_parses_each_form() {
    assert_eq!(parse_expr("true"), Ok(AccessExpr::boolean(true)));
    assert_eq!(parse_expr("false"), Ok(AccessExpr::boolean(false)));
    assert_eq!(parse_expr("auth != null"), Ok(AccessExpr::authenticated()));
    assert_eq!(
        parse_expr("auth.uid === $uid"),
        Ok(AccessExpr::auth_uid_equals_capture("uid"))
    );
    assert_eq!(
        parse_expr("newData.child('userId').val() === auth.uid"),
        Ok(AccessExpr::new_data_child_equals_auth_uid("userId"))
    );
    assert_eq!(
        parse_expr("newData.hasChildren(['id', 'userId'])"),
        Ok(AccessExpr::new_data_has_children(vec![
            FieldName::new("id"),
            FieldName::new("userId"),
        ]))
    );
}

#[test]
fn expression_operators_nest_with_parentheses() {
    let parsed = parse_expr("!(auth != null) || auth != null && (true || false)")
        .expect("parse");
    assert_eq!(
        parsed,
        AccessExpr::or(vec![
            AccessExpr::negate(AccessExpr::authenticated()),
            AccessExpr::and(vec![
                AccessExpr::authenticated(),
                AccessExpr::or(vec![AccessExpr::boolean(true), AccessExpr::boolean(false)]),
            ]),
        ])
    );
}

#[test]
fn multi_line_expression_text_is_accepted() {
    // Console exports often wrap long expressions across lines.
    let text = "newData.child('userId').val() === auth.uid &&\n      \
                newData.hasChildren(['id', 'userId'])";
    let parsed = parse_expr(text).expect("parse");
    assert!(matches!(parsed, AccessExpr::And { .. }));
}

#[test]
fn rejects_document_without_rules_key() {
    assert_eq!(parse_rules_json(&json!({"notRules": {}})), Err(ParseError::MissingRulesKey));
}

#[test]
fn rejects_unknown_directive() {
    let value = json!({"rules": {"users": {".exists": true}}});
    assert_eq!(
        parse_rules_json(&value),
        Err(ParseError::UnknownDirective {
            key: ".exists".to_string(),
            at: "/users".to_string(),
        })
    );
}

#[test]
fn rejects_non_scalar_directive_value() {
    let value = json!({"rules": {".read": ["auth != null"]}});
    assert_eq!(
        parse_rules_json(&value),
        Err(ParseError::InvalidDirective {
            key: ".read".to_string(),
            at: "/".to_string(),
        })
    );
}

#[test]
fn rejects_malformed_index_on() {
    let value = json!({"rules": {"users": {".indexOn": ["userId", 7]}}});
    assert_eq!(
        parse_rules_json(&value),
        Err(ParseError::InvalidIndexOn {
            at: "/users".to_string(),
        })
    );
}

#[test]
fn rejects_multiple_capture_children() {
    let value = json!({"rules": {"users": {"$a": {}, "$b": {}}}});
    assert_eq!(
        parse_rules_json(&value),
        Err(ParseError::MultipleCaptureChildren {
            at: "/users".to_string(),
        })
    );
}

#[test]
fn rejects_expressions_outside_the_subset() {
    assert!(matches!(parse_expr("data.exists()"), Err(ParseError::Expression { .. })));
    assert!(matches!(
        parse_expr("auth.uid === 'literal'"),
        Err(ParseError::Expression { .. })
    ));
    assert!(matches!(
        parse_expr("newData.isString()"),
        Err(ParseError::Expression { .. })
    ));
    assert!(matches!(parse_expr(""), Err(ParseError::Expression { .. })));
}

#[test]
fn rejects_trailing_input_after_expression() {
    assert!(matches!(parse_expr("true true"), Err(ParseError::Trailing { .. })));
}

#[test]
fn parsed_capture_names_resolve_against_bindings() {
    let parsed = parse_expr("auth.uid === $historyId").expect("parse");
    let mut captures = Vec::new();
    parsed.referenced_captures(&mut captures);
    assert_eq!(captures, vec![CaptureName::new("historyId")]);
}
