// pathgate-core/src/core/mod.rs
// ============================================================================
// Module: Pathgate Core Types
// Description: Canonical policy model for hierarchical path access rules.
// Purpose: Group the identifier, path, expression, rule, schema, and tier modules.
// Dependencies: crate::core submodules
// ============================================================================

//! ## Overview
//! Core types describing the policy table: path templates, access
//! expressions, rule documents, record schemas, and the shipped tier
//! builders. Evaluation lives in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod expr;
pub mod identifiers;
pub mod path;
pub mod rule;
pub mod schema;
pub mod tier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthContext;
pub use expr::AccessExpr;
pub use identifiers::CaptureName;
pub use identifiers::FieldName;
pub use identifiers::SubjectId;
pub use path::CaptureBindings;
pub use path::ConcretePath;
pub use path::MAX_PATH_DEPTH;
pub use path::MAX_SEGMENT_LENGTH;
pub use path::PathError;
pub use path::PathSegment;
pub use path::PathTemplate;
pub use rule::CaptureChild;
pub use rule::RuleNode;
pub use rule::RuleSetError;
pub use rule::RulesDocument;
pub use schema::RecordSchema;
pub use tier::RulesetTier;
