// pathgate-core/src/core/expr.rs
// ============================================================================
// Module: Access Expressions
// Description: Boolean algebra over request-context predicates.
// Purpose: Define the authorization and validation expression tree.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! Access expressions are a small composable Boolean algebra. The logical
//! operators (`And`, `Or`, `Not`) are universal; the leaves are the domain
//! predicates the engine's rule language exposes: authentication liveness,
//! subject-versus-capture equality, and shallow checks over the proposed
//! write value. Evaluation lives in the runtime module and is fail-closed:
//! a predicate over missing context is false, never an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CaptureName;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Expression Tree
// ============================================================================

/// Boolean expression over request context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessExpr {
    /// Constant truth value.
    Bool {
        /// The constant.
        value: bool,
    },
    /// True when the request carries a verified identity (`auth != null`).
    Authenticated,
    /// True when `auth.uid` equals the named capture (`auth.uid === $uid`).
    AuthUidEqualsCapture {
        /// Capture bound at or above the node carrying this expression.
        capture: CaptureName,
    },
    /// True when the proposed value is an object containing every named
    /// field (`newData.hasChildren([...])`).
    NewDataHasChildren {
        /// Required field names.
        fields: Vec<FieldName>,
    },
    /// True when the named child of the proposed value is a string equal to
    /// `auth.uid` (`newData.child('f').val() === auth.uid`).
    NewDataChildEqualsAuthUid {
        /// Child field to compare.
        field: FieldName,
    },
    /// Logical AND with short-circuit evaluation. Empty AND is trivially
    /// satisfied.
    And {
        /// Conjuncts in evaluation order.
        exprs: Vec<AccessExpr>,
    },
    /// Logical OR with short-circuit evaluation. Empty OR is trivially
    /// unsatisfiable.
    Or {
        /// Disjuncts in evaluation order.
        exprs: Vec<AccessExpr>,
    },
    /// Logical NOT of the inner expression.
    Not {
        /// Negated expression.
        expr: Box<AccessExpr>,
    },
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl AccessExpr {
    /// Creates a constant expression.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Bool {
            value,
        }
    }

    /// Creates the `auth != null` predicate.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self::Authenticated
    }

    /// Creates the `auth.uid === $capture` predicate.
    #[must_use]
    pub fn auth_uid_equals_capture(capture: impl Into<CaptureName>) -> Self {
        Self::AuthUidEqualsCapture {
            capture: capture.into(),
        }
    }

    /// Creates the `newData.hasChildren([...])` predicate.
    #[must_use]
    pub fn new_data_has_children(fields: Vec<FieldName>) -> Self {
        Self::NewDataHasChildren {
            fields,
        }
    }

    /// Creates the `newData.child(field).val() === auth.uid` predicate.
    #[must_use]
    pub fn new_data_child_equals_auth_uid(field: impl Into<FieldName>) -> Self {
        Self::NewDataChildEqualsAuthUid {
            field: field.into(),
        }
    }

    /// Creates a logical AND of the given expressions.
    #[must_use]
    pub fn and(exprs: Vec<Self>) -> Self {
        Self::And {
            exprs,
        }
    }

    /// Creates a logical OR of the given expressions.
    #[must_use]
    pub fn or(exprs: Vec<Self>) -> Self {
        Self::Or {
            exprs,
        }
    }

    /// Creates a logical NOT of the given expression.
    #[must_use]
    pub fn negate(expr: Self) -> Self {
        Self::Not {
            expr: Box::new(expr),
        }
    }

    /// Returns every capture name referenced anywhere in the expression.
    pub fn referenced_captures(&self, out: &mut Vec<CaptureName>) {
        match self {
            Self::AuthUidEqualsCapture {
                capture,
            } => out.push(capture.clone()),
            Self::And {
                exprs,
            }
            | Self::Or {
                exprs,
            } => {
                for expr in exprs {
                    expr.referenced_captures(out);
                }
            }
            Self::Not {
                expr,
            } => expr.referenced_captures(out),
            Self::Bool {
                ..
            }
            | Self::Authenticated
            | Self::NewDataHasChildren {
                ..
            }
            | Self::NewDataChildEqualsAuthUid {
                ..
            } => {}
        }
    }

    /// Returns true when the expression inspects the proposed write value.
    #[must_use]
    pub fn inspects_new_data(&self) -> bool {
        match self {
            Self::NewDataHasChildren {
                ..
            }
            | Self::NewDataChildEqualsAuthUid {
                ..
            } => true,
            Self::And {
                exprs,
            }
            | Self::Or {
                exprs,
            } => exprs.iter().any(Self::inspects_new_data),
            Self::Not {
                expr,
            } => expr.inspects_new_data(),
            Self::Bool {
                ..
            }
            | Self::Authenticated
            | Self::AuthUidEqualsCapture {
                ..
            } => false,
        }
    }

    /// Returns the node count of the expression tree.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Self::And {
                exprs,
            }
            | Self::Or {
                exprs,
            } => 1 + exprs.iter().map(Self::complexity).sum::<usize>(),
            Self::Not {
                expr,
            } => 1 + expr.complexity(),
            Self::Bool {
                ..
            }
            | Self::Authenticated
            | Self::AuthUidEqualsCapture {
                ..
            }
            | Self::NewDataHasChildren {
                ..
            }
            | Self::NewDataChildEqualsAuthUid {
                ..
            } => 1,
        }
    }
}

impl std::ops::Not for AccessExpr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::negate(self)
    }
}
