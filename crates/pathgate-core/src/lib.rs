// pathgate-core/src/lib.rs
// ============================================================================
// Module: Pathgate Core Library
// Description: Public API surface for the Pathgate core.
// Purpose: Expose the policy model and the access evaluation runtime.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Pathgate core models per-path read/write authorization rules and shallow
//! schema validation for a hierarchical key-value database. It defines the
//! typed policy table, the three shipped deployment tiers, and a stateless
//! evaluator mirroring the external engine's per-request check. It is
//! engine-agnostic: rendering to and parsing from the engine's rules format
//! live in `pathgate-config`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use runtime::AccessDecision;
pub use runtime::AccessRequest;
pub use runtime::DenialReason;
pub use runtime::EvalContext;
pub use runtime::Operation;
pub use runtime::ValueSnapshot;
pub use runtime::evaluate_access;
pub use runtime::evaluate_expr;
