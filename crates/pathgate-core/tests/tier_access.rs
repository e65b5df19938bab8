// pathgate-core/tests/tier_access.rs
// ============================================================================
// Module: Tier Access Tests
// Description: End-to-end access decisions across the three shipped tiers.
// Purpose: Pin the authorization and validation posture of each tier.
// Dependencies: pathgate-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises the shipped tiers with concrete subjects and payloads: owner
//! isolation under strict, the default tier's documented open-nested-node
//! posture, dev-tier read openness, required-field enforcement, and the
//! non-authorizing nature of index hints.

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

use pathgate_core::AccessRequest;
use pathgate_core::AuthContext;
use pathgate_core::ConcretePath;
use pathgate_core::DenialReason;
use pathgate_core::Operation;
use pathgate_core::RulesetTier;
use pathgate_core::evaluate_access;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Builds an access request for the given operation and path.
fn request(
    operation: Operation,
    path: &str,
    auth: AuthContext,
    new_data: Option<Value>,
) -> AccessRequest {
    AccessRequest {
        operation,
        path: ConcretePath::parse(path).expect("request path"),
        auth,
        new_data,
    }
}

/// Complete saved recipe payload owned by the given subject.
fn recipe_payload(owner: &str) -> Value {
    json!({
        "id": "r1",
        "userId": owner,
        "recipe": {"title": "Shakshuka"},
        "savedAt": 1_700_000_000_000_u64,
    })
}

/// Complete history payload owned by the given subject.
fn history_payload(owner: &str) -> Value {
    json!({
        "id": "h1",
        "userId": owner,
        "query": "eggs",
        "type": "search",
        "recipes": ["r1"],
        "createdAt": 1_700_000_000_000_u64,
    })
}

/// Evaluates a request against a tier's document.
fn decide(tier: RulesetTier, req: &AccessRequest) -> pathgate_core::AccessDecision {
    evaluate_access(&tier.document(), req)
}

// ============================================================================
// SECTION: Strict Tier Isolation
// ============================================================================

#[test]
fn strict_denies_cross_subject_reads_and_writes() {
    let alice = AuthContext::authenticated("alice");
    for path in
        ["users/bob", "users/bob/saved_recipes/r1", "users/bob/recipe_history/h1"]
    {
        let read = request(Operation::Read, path, alice.clone(), None);
        assert!(!decide(RulesetTier::Strict, &read).is_granted(), "read {path}");

        let write =
            request(Operation::Write, path, alice.clone(), Some(recipe_payload("bob")));
        assert!(!decide(RulesetTier::Strict, &write).is_granted(), "write {path}");
    }
}

#[test]
fn strict_denies_foreign_owner_payload_even_on_own_path() {
    let alice = AuthContext::authenticated("alice");
    let write = request(
        Operation::Write,
        "users/alice/saved_recipes/r1",
        alice,
        Some(recipe_payload("bob")),
    );
    let decision = decide(RulesetTier::Strict, &write);
    assert_eq!(
        decision,
        pathgate_core::AccessDecision::Denied {
            reason: DenialReason::ValidationFailed {
                at: "/users/$uid/saved_recipes/$recipeId".to_string(),
            },
        }
    );
}

#[test]
fn default_permits_foreign_owner_payload_on_own_path() {
    // Documented design gap of the default tier: validation checks field
    // presence only, so the payload's userId is not bound to the subject.
    let alice = AuthContext::authenticated("alice");
    let write = request(
        Operation::Write,
        "users/alice/saved_recipes/r1",
        alice,
        Some(recipe_payload("bob")),
    );
    assert!(decide(RulesetTier::Default, &write).is_granted());
}

// ============================================================================
// SECTION: Owner Writes
// ============================================================================

#[test]
fn owner_write_with_complete_payload_is_granted_under_every_tier() {
    let alice = AuthContext::authenticated("alice");
    for tier in RulesetTier::ALL {
        let recipe = request(
            Operation::Write,
            "users/alice/saved_recipes/r1",
            alice.clone(),
            Some(recipe_payload("alice")),
        );
        assert!(decide(tier, &recipe).is_granted(), "recipe write under {tier}");

        let history = request(
            Operation::Write,
            "users/alice/recipe_history/h1",
            alice.clone(),
            Some(history_payload("alice")),
        );
        assert!(decide(tier, &history).is_granted(), "history write under {tier}");
    }
}

#[test]
fn missing_required_field_is_rejected_under_default_and_strict() {
    let alice = AuthContext::authenticated("alice");
    let mut incomplete = recipe_payload("alice");
    incomplete
        .as_object_mut()
        .expect("payload object")
        .remove("savedAt");

    for tier in [RulesetTier::Default, RulesetTier::Strict] {
        let write = request(
            Operation::Write,
            "users/alice/saved_recipes/r1",
            alice.clone(),
            Some(incomplete.clone()),
        );
        let decision = decide(tier, &write);
        assert_eq!(
            decision,
            pathgate_core::AccessDecision::Denied {
                reason: DenialReason::ValidationFailed {
                    at: "/users/$uid/saved_recipes/$recipeId".to_string(),
                },
            },
            "tier {tier}"
        );
    }
}

#[test]
fn write_without_payload_fails_validation_under_default_and_strict() {
    let alice = AuthContext::authenticated("alice");
    for tier in [RulesetTier::Default, RulesetTier::Strict] {
        let write =
            request(Operation::Write, "users/alice/saved_recipes/r1", alice.clone(), None);
        assert!(!decide(tier, &write).is_granted(), "tier {tier}");
    }
}

// ============================================================================
// SECTION: Dev Tier Posture
// ============================================================================

#[test]
fn dev_lets_any_authenticated_subject_read_foreign_collections() {
    let bob = AuthContext::authenticated("bob");
    let read = request(Operation::Read, "users/alice/saved_recipes/r1", bob, None);
    let decision = decide(RulesetTier::Dev, &read);
    assert_eq!(
        decision,
        pathgate_core::AccessDecision::Granted {
            granted_at: "/users/$uid".to_string(),
        }
    );
}

#[test]
fn dev_denies_unauthenticated_reads() {
    let read = request(
        Operation::Read,
        "users/alice/saved_recipes/r1",
        AuthContext::Unauthenticated,
        None,
    );
    let decision = decide(RulesetTier::Dev, &read);
    assert_eq!(
        decision,
        pathgate_core::AccessDecision::Denied {
            reason: DenialReason::NoRuleGranted,
        }
    );
}

#[test]
fn dev_keeps_writes_owner_only() {
    let bob = AuthContext::authenticated("bob");
    let write = request(
        Operation::Write,
        "users/alice/saved_recipes/r1",
        bob,
        Some(recipe_payload("alice")),
    );
    assert!(!decide(RulesetTier::Dev, &write).is_granted());
}

// ============================================================================
// SECTION: Index Hints
// ============================================================================

#[test]
fn index_hints_do_not_grant_or_restrict_access() {
    // The dev tier carries index hints on the collection nodes. A foreign
    // subject's write is still denied, and the owner's read is still
    // granted, exactly as without the hints.
    let alice = AuthContext::authenticated("alice");
    let bob = AuthContext::authenticated("bob");

    let foreign_write = request(
        Operation::Write,
        "users/alice/saved_recipes",
        bob,
        Some(json!({"anything": true})),
    );
    assert!(!decide(RulesetTier::Dev, &foreign_write).is_granted());

    let owner_read = request(Operation::Read, "users/alice/saved_recipes", alice, None);
    assert!(decide(RulesetTier::Dev, &owner_read).is_granted());
}
