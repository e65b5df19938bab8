// pathgate-config/src/config.rs
// ============================================================================
// Module: Deployment Configuration
// Description: Configuration loading and validation for Pathgate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: pathgate-core, serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Deployment configuration is loaded from a TOML file with strict size and
//! path limits. It selects which ruleset tier to render and where to write
//! the artifact. Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use pathgate_core::RulesetTier;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "pathgate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PATHGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total path length for config-referenced paths.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Pathgate deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Ruleset tier to render.
    pub tier: RulesetTier,
    /// Output path for the rendered rules artifact. Standard output when
    /// absent.
    #[serde(default)]
    pub out: Option<PathBuf>,
}

impl DeployConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: the explicit path argument, then the
    /// `PATHGATE_CONFIG` environment variable, then `pathgate.toml` in the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(out) = &self.out {
            if out.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("out path must not be empty".to_string()));
            }
            if out.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
                return Err(ConfigError::Invalid("out path exceeds length limit".to_string()));
            }
        }
        Ok(())
    }
}

/// Resolves the configuration path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(explicit) = path {
        return Ok(explicit.to_path_buf());
    }
    if let Ok(from_env) = env::var(CONFIG_ENV_VAR) {
        if from_env.is_empty() {
            return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")));
        }
        if from_env.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "{CONFIG_ENV_VAR} exceeds path length limit"
            )));
        }
        return Ok(PathBuf::from(from_env));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Filesystem error while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation error.
    #[error("invalid config: {0}")]
    Invalid(String),
}
