// pathgate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Access Evaluator
// Description: Stateless rule-tree walk producing grant or denial decisions.
// Purpose: Decide one access request against a rules document.
// Dependencies: crate::core, crate::runtime::snapshot, serde, serde_json
// ============================================================================

//! ## Overview
//! Evaluation walks the rule tree along the request path, binding captures
//! as capture children match. Read and write authorization follow the
//! engine's grant cascade: the operation is permitted when any matched node
//! from the root to the target carries a granting expression. Validation is
//! conjunctive: every matched `validate` expression must pass for a write.
//! Each check is pure, synchronous, and fail-closed; denial is immediate
//! and final per request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::auth::AuthContext;
use crate::core::expr::AccessExpr;
use crate::core::path::CaptureBindings;
use crate::core::path::ConcretePath;
use crate::core::rule::RuleNode;
use crate::core::rule::RulesDocument;
use crate::runtime::snapshot::ValueSnapshot;

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// Requested operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Read the value at the target path.
    Read,
    /// Write (create, replace, or update) the value at the target path.
    Write,
}

/// One access request presented to the policy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Operation kind.
    pub operation: Operation,
    /// Target database path.
    pub path: ConcretePath,
    /// Request identity.
    pub auth: AuthContext,
    /// Proposed new value for writes. Ignored for reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_data: Option<Value>,
}

// ============================================================================
// SECTION: Decision Types
// ============================================================================

/// Reason an access request was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// No matched node granted the requested operation.
    NoRuleGranted,
    /// Authorization passed but a validation expression rejected the
    /// proposed value.
    ValidationFailed {
        /// Template path of the rejecting node.
        at: String,
    },
}

/// Outcome of evaluating one access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessDecision {
    /// The operation is permitted.
    Granted {
        /// Template path of the shallowest granting node.
        granted_at: String,
    },
    /// The operation is rejected.
    Denied {
        /// Denial reason.
        reason: DenialReason,
    },
}

impl AccessDecision {
    /// Returns true when the decision permits the operation.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

// ============================================================================
// SECTION: Evaluation Context
// ============================================================================

/// Context visible to one expression evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Request identity.
    pub auth: &'a AuthContext,
    /// Captures bound along the matched path.
    pub bindings: &'a CaptureBindings,
    /// Snapshot over the proposed write value.
    pub new_data: ValueSnapshot<'a>,
}

/// Evaluates an expression against a context.
///
/// Predicates over missing context evaluate to false rather than erroring:
/// an unauthenticated request fails every identity comparison, and a write
/// without a proposed value fails every `newData` inspection.
#[must_use]
pub fn evaluate_expr(expr: &AccessExpr, ctx: &EvalContext<'_>) -> bool {
    match expr {
        AccessExpr::Bool {
            value,
        } => *value,
        AccessExpr::Authenticated => ctx.auth.is_authenticated(),
        AccessExpr::AuthUidEqualsCapture {
            capture,
        } => match (ctx.auth.uid(), ctx.bindings.get(capture)) {
            (Some(uid), Some(bound)) => uid.as_str() == bound,
            _ => false,
        },
        AccessExpr::NewDataHasChildren {
            fields,
        } => ctx.new_data.has_children(fields),
        AccessExpr::NewDataChildEqualsAuthUid {
            field,
        } => match (ctx.auth.uid(), ctx.new_data.child(field).as_str()) {
            (Some(uid), Some(value)) => uid.as_str() == value,
            _ => false,
        },
        AccessExpr::And {
            exprs,
        } => exprs.iter().all(|expr| evaluate_expr(expr, ctx)),
        AccessExpr::Or {
            exprs,
        } => exprs.iter().any(|expr| evaluate_expr(expr, ctx)),
        AccessExpr::Not {
            expr,
        } => !evaluate_expr(expr, ctx),
    }
}

// ============================================================================
// SECTION: Access Evaluation
// ============================================================================

/// A rule node matched while walking the request path.
struct MatchedNode<'a> {
    /// Template path of the node, for diagnostics.
    at: String,
    /// The matched node.
    node: &'a RuleNode,
}

/// Evaluates one access request against a rules document.
///
/// Capture references are validated at document load to resolve at or above
/// their node, so the full binding set collected along the walk is safe for
/// every matched node.
#[must_use]
pub fn evaluate_access(document: &RulesDocument, request: &AccessRequest) -> AccessDecision {
    let (matched, bindings) = matched_nodes(document, &request.path);

    let new_data = match request.operation {
        Operation::Read => ValueSnapshot::absent(),
        Operation::Write => ValueSnapshot::new(request.new_data.as_ref()),
    };
    let ctx = EvalContext {
        auth: &request.auth,
        bindings: &bindings,
        new_data,
    };

    let granted_at = matched.iter().find_map(|entry| {
        let rule = match request.operation {
            Operation::Read => entry.node.read.as_ref(),
            Operation::Write => entry.node.write.as_ref(),
        };
        rule.filter(|expr| evaluate_expr(expr, &ctx)).map(|_| entry.at.clone())
    });
    let Some(granted_at) = granted_at else {
        return AccessDecision::Denied {
            reason: DenialReason::NoRuleGranted,
        };
    };

    if request.operation == Operation::Write {
        for entry in &matched {
            if let Some(validate) = &entry.node.validate
                && !evaluate_expr(validate, &ctx)
            {
                return AccessDecision::Denied {
                    reason: DenialReason::ValidationFailed {
                        at: entry.at.clone(),
                    },
                };
            }
        }
    }

    AccessDecision::Granted {
        granted_at,
    }
}

/// Walks the rule tree along a concrete path, collecting matched nodes and
/// capture bindings. Literal children take precedence over the capture
/// child. The walk stops at the first unmatched segment; rules gathered so
/// far still govern the deeper location, per the engine's cascade.
fn matched_nodes<'a>(
    document: &'a RulesDocument,
    path: &ConcretePath,
) -> (Vec<MatchedNode<'a>>, CaptureBindings) {
    let mut bindings = CaptureBindings::new();
    let mut matched = vec![MatchedNode {
        at: "/".to_string(),
        node: &document.root,
    }];

    let mut current = &document.root;
    let mut at = String::new();
    for segment in path.segments() {
        let next = if let Some(child) = current.children.get(segment) {
            at = join_path(&at, segment);
            child
        } else if let Some(capture) = &current.capture {
            bindings.bind(capture.name.clone(), segment.clone());
            at = join_path(&at, &format!("${}", capture.name));
            &capture.node
        } else {
            break;
        };
        matched.push(MatchedNode {
            at: at.clone(),
            node: next,
        });
        current = next;
    }

    (matched, bindings)
}

/// Joins a parent template path with a child segment for diagnostics.
fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        format!("/{segment}")
    } else {
        format!("{parent}/{segment}")
    }
}
