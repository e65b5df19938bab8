// pathgate-core/tests/expr_eval.rs
// ============================================================================
// Module: Expression Evaluation Tests
// Description: Tests for access expression evaluation semantics.
// Purpose: Ensure predicates are fail-closed and operators short-circuit correctly.
// Dependencies: pathgate-core, serde_json
// ============================================================================
//! ## Overview
//! Validates each predicate against present and missing context, and the
//! Boolean operators over empty and mixed operand lists.

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

use pathgate_core::AccessExpr;
use pathgate_core::AuthContext;
use pathgate_core::CaptureBindings;
use pathgate_core::CaptureName;
use pathgate_core::EvalContext;
use pathgate_core::FieldName;
use pathgate_core::ValueSnapshot;
use pathgate_core::evaluate_expr;
use serde_json::Value;
use serde_json::json;

/// Builds a context over the given auth, bindings, and optional value.
fn ctx<'a>(
    auth: &'a AuthContext,
    bindings: &'a CaptureBindings,
    value: Option<&'a Value>,
) -> EvalContext<'a> {
    EvalContext {
        auth,
        bindings,
        new_data: ValueSnapshot::new(value),
    }
}

#[test]
fn constants_evaluate_to_themselves() {
    let auth = AuthContext::Unauthenticated;
    let bindings = CaptureBindings::new();
    let context = ctx(&auth, &bindings, None);
    assert!(evaluate_expr(&AccessExpr::boolean(true), &context));
    assert!(!evaluate_expr(&AccessExpr::boolean(false), &context));
}

#[test]
fn authenticated_tracks_identity_presence() {
    let bindings = CaptureBindings::new();
    let anonymous = AuthContext::Unauthenticated;
    assert!(!evaluate_expr(&AccessExpr::authenticated(), &ctx(&anonymous, &bindings, None)));

    let signed_in = AuthContext::authenticated("alice");
    assert!(evaluate_expr(&AccessExpr::authenticated(), &ctx(&signed_in, &bindings, None)));
}

#[test]
fn auth_uid_capture_comparison_requires_both_sides() {
    let expr = AccessExpr::auth_uid_equals_capture("uid");
    let mut bindings = CaptureBindings::new();
    let alice = AuthContext::authenticated("alice");

    // Unbound capture fails closed.
    assert!(!evaluate_expr(&expr, &ctx(&alice, &bindings, None)));

    bindings.bind(CaptureName::new("uid"), "alice".to_string());
    assert!(evaluate_expr(&expr, &ctx(&alice, &bindings, None)));

    // Unauthenticated fails closed even with a binding.
    let anonymous = AuthContext::Unauthenticated;
    assert!(!evaluate_expr(&expr, &ctx(&anonymous, &bindings, None)));

    let bob = AuthContext::authenticated("bob");
    assert!(!evaluate_expr(&expr, &ctx(&bob, &bindings, None)));
}

#[test]
fn has_children_requires_an_object_with_every_field() {
    let expr = AccessExpr::new_data_has_children(vec![
        FieldName::new("id"),
        FieldName::new("userId"),
    ]);
    let auth = AuthContext::authenticated("alice");
    let bindings = CaptureBindings::new();

    let complete = json!({"id": "r1", "userId": "alice", "extra": 1});
    assert!(evaluate_expr(&expr, &ctx(&auth, &bindings, Some(&complete))));

    let missing = json!({"id": "r1"});
    assert!(!evaluate_expr(&expr, &ctx(&auth, &bindings, Some(&missing))));

    let not_object = json!("r1");
    assert!(!evaluate_expr(&expr, &ctx(&auth, &bindings, Some(&not_object))));

    // Missing value fails closed.
    assert!(!evaluate_expr(&expr, &ctx(&auth, &bindings, None)));
}

#[test]
fn child_equals_auth_uid_compares_strings_only() {
    let expr = AccessExpr::new_data_child_equals_auth_uid("userId");
    let alice = AuthContext::authenticated("alice");
    let bindings = CaptureBindings::new();

    let owned = json!({"userId": "alice"});
    assert!(evaluate_expr(&expr, &ctx(&alice, &bindings, Some(&owned))));

    let foreign = json!({"userId": "bob"});
    assert!(!evaluate_expr(&expr, &ctx(&alice, &bindings, Some(&foreign))));

    let numeric = json!({"userId": 42});
    assert!(!evaluate_expr(&expr, &ctx(&alice, &bindings, Some(&numeric))));

    let absent = json!({});
    assert!(!evaluate_expr(&expr, &ctx(&alice, &bindings, Some(&absent))));
}

#[test]
fn operators_follow_boolean_identities() {
    let auth = AuthContext::Unauthenticated;
    let bindings = CaptureBindings::new();
    let context = ctx(&auth, &bindings, None);

    // Empty AND is trivially satisfied; empty OR is trivially unsatisfiable.
    assert!(evaluate_expr(&AccessExpr::and(Vec::new()), &context));
    assert!(!evaluate_expr(&AccessExpr::or(Vec::new()), &context));

    let mixed = AccessExpr::and(vec![AccessExpr::boolean(true), AccessExpr::boolean(false)]);
    assert!(!evaluate_expr(&mixed, &context));

    let either = AccessExpr::or(vec![AccessExpr::boolean(false), AccessExpr::boolean(true)]);
    assert!(evaluate_expr(&either, &context));

    let negated = AccessExpr::negate(AccessExpr::boolean(false));
    assert!(evaluate_expr(&negated, &context));
}

#[test]
fn introspection_reports_new_data_usage_and_complexity() {
    let validate = AccessExpr::and(vec![
        AccessExpr::new_data_child_equals_auth_uid("userId"),
        AccessExpr::new_data_has_children(vec![FieldName::new("id")]),
    ]);
    assert!(validate.inspects_new_data());
    assert_eq!(validate.complexity(), 3);

    let authorize = AccessExpr::auth_uid_equals_capture("uid");
    assert!(!authorize.inspects_new_data());

    let mut captures = Vec::new();
    authorize.referenced_captures(&mut captures);
    assert_eq!(captures, vec![CaptureName::new("uid")]);
}
