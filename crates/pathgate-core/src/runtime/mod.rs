// pathgate-core/src/runtime/mod.rs
// ============================================================================
// Module: Pathgate Runtime
// Description: Stateless evaluation of access requests against rule documents.
// Purpose: Group the snapshot and evaluator modules.
// Dependencies: crate::runtime submodules
// ============================================================================

//! ## Overview
//! The runtime mirrors the external engine's per-request check: a pure,
//! synchronous walk of the policy table with fail-closed boolean gates.
//! There is no state, ordering, or recovery between requests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod evaluator;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::AccessDecision;
pub use evaluator::AccessRequest;
pub use evaluator::DenialReason;
pub use evaluator::EvalContext;
pub use evaluator::Operation;
pub use evaluator::evaluate_access;
pub use evaluator::evaluate_expr;
pub use snapshot::ValueSnapshot;
