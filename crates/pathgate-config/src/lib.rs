// pathgate-config/src/lib.rs
// ============================================================================
// Module: Pathgate Config Library
// Description: Rules artifact rendering, parsing, and deployment config.
// Purpose: Single source of truth for the engine's rules format and pathgate.toml.
// Dependencies: pathgate-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! `pathgate-config` converts between the typed policy model and the
//! external engine's JSON rules format, in both directions, and loads the
//! deployment configuration that selects a tier. Conversion is
//! deterministic and fail-closed: unsupported directives or expressions are
//! errors, never approximations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod parse;
pub mod render;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DeployConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use parse::ParseError;
pub use parse::parse_expr;
pub use parse::parse_rules_json;
pub use parse::parse_rules_json_str;
pub use render::RenderError;
pub use render::render_expr;
pub use render::rules_json;
pub use render::rules_json_string;
