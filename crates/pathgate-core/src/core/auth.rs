// pathgate-core/src/core/auth.rs
// ============================================================================
// Module: Authentication Context
// Description: Per-request identity supplied by the external engine.
// Purpose: Model the `auth` value visible to rule expressions.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The external engine supplies an opaque identity with every request. Rule
//! expressions observe exactly two facts about it: whether it is non-null
//! (`auth != null`) and its subject identifier (`auth.uid`). Requests without
//! a verified identity carry [`AuthContext::Unauthenticated`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SubjectId;

// ============================================================================
// SECTION: Auth Context
// ============================================================================

/// Request identity as seen by rule expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthContext {
    /// No verified identity (`auth == null`).
    #[default]
    Unauthenticated,
    /// Verified identity with a subject identifier.
    Authenticated {
        /// Subject identifier (`auth.uid`).
        uid: SubjectId,
    },
}

impl AuthContext {
    /// Creates an authenticated context for a subject.
    #[must_use]
    pub fn authenticated(uid: impl Into<SubjectId>) -> Self {
        Self::Authenticated {
            uid: uid.into(),
        }
    }

    /// Returns true when a verified identity is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the subject identifier, when authenticated.
    #[must_use]
    pub const fn uid(&self) -> Option<&SubjectId> {
        match self {
            Self::Unauthenticated => None,
            Self::Authenticated {
                uid,
            } => Some(uid),
        }
    }
}
