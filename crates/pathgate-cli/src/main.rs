// pathgate-cli/src/main.rs
// ============================================================================
// Module: Pathgate CLI Entry Point
// Description: Command dispatcher for rules rendering, checking, and simulation.
// Purpose: Provide a safe operator surface for console deployment workflows.
// Dependencies: clap, pathgate-config, pathgate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The Pathgate CLI renders the shipped ruleset tiers into console-ready
//! JSON, checks existing rules artifacts against the supported subset, and
//! simulates single access requests the way the vendor console simulator
//! does. Inputs are untrusted and size-limited; all failures map to nonzero
//! exit codes.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use pathgate_config::DeployConfig;
use pathgate_config::parse_rules_json_str;
use pathgate_config::rules_json_string;
use pathgate_core::AccessRequest;
use pathgate_core::AuthContext;
use pathgate_core::ConcretePath;
use pathgate_core::Operation;
use pathgate_core::RulesetTier;
use pathgate_core::evaluate_access;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a rules JSON input file.
const MAX_RULES_BYTES: usize = 1024 * 1024;
/// Maximum size of a simulated write payload.
const MAX_DATA_BYTES: usize = 256 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "pathgate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a ruleset tier into console-ready rules JSON.
    Render(RenderCommand),
    /// Parse and validate an existing rules JSON artifact.
    Check(CheckCommand),
    /// Evaluate one access request against a ruleset tier.
    Simulate(SimulateCommand),
}

/// Arguments for the `render` subcommand.
#[derive(clap::Args, Debug)]
struct RenderCommand {
    /// Ruleset tier to render. Required unless `--config` is given.
    #[arg(long, value_enum)]
    tier: Option<TierArg>,
    /// Output path for the artifact. Standard output when absent.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Deployment config file supplying tier and output path.
    #[arg(long, value_name = "FILE", conflicts_with = "tier")]
    config: Option<PathBuf>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args, Debug)]
struct CheckCommand {
    /// Rules JSON artifact to check.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args, Debug)]
struct SimulateCommand {
    /// Ruleset tier to evaluate against.
    #[arg(long, value_enum)]
    tier: TierArg,
    /// Operation to simulate.
    #[arg(long, value_enum)]
    op: OpArg,
    /// Target database path, for example `users/alice/saved_recipes/r1`.
    #[arg(long, value_name = "PATH")]
    path: String,
    /// Authenticated subject identifier. Unauthenticated when absent.
    #[arg(long, value_name = "UID")]
    auth: Option<String>,
    /// JSON file with the proposed write value.
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,
}

/// Tier selection argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TierArg {
    /// Permissive development tier.
    Dev,
    /// Default tier.
    Default,
    /// Strict production tier.
    Strict,
}

impl From<TierArg> for RulesetTier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Dev => Self::Dev,
            TierArg::Default => Self::Default,
            TierArg::Strict => Self::Strict,
        }
    }
}

/// Operation selection argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OpArg {
    /// Read operation.
    Read,
    /// Write operation.
    Write,
}

impl From<OpArg> for Operation {
    fn from(value: OpArg) -> Self {
        match value {
            OpArg::Read => Self::Read,
            OpArg::Write => Self::Write,
        }
    }
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
enum CliError {
    /// Filesystem read or write failure.
    #[error("io error on '{path}': {message}")]
    Io {
        /// Path involved in the failure.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// An input file exceeded its size limit.
    #[error("input '{path}' exceeds size limit of {limit} bytes")]
    InputTooLarge {
        /// Path of the oversized input.
        path: String,
        /// Applicable limit in bytes.
        limit: usize,
    },
    /// Invalid command invocation.
    #[error("{0}")]
    Usage(String),
    /// Deployment config failure.
    #[error(transparent)]
    Config(#[from] pathgate_config::ConfigError),
    /// Rules parse failure.
    #[error(transparent)]
    Parse(#[from] pathgate_config::ParseError),
    /// Rules render failure.
    #[error(transparent)]
    Render(#[from] pathgate_config::RenderError),
    /// Rules document validation failure.
    #[error(transparent)]
    Rules(#[from] pathgate_core::RuleSetError),
    /// Request path parse failure.
    #[error(transparent)]
    Path(#[from] pathgate_core::PathError),
    /// Output serialization failure.
    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and dispatches the selected subcommand.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(command) => command_render(&command),
        Commands::Check(command) => command_check(&command),
        Commands::Simulate(command) => command_simulate(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Renders a tier (from flags or deployment config) into rules JSON.
fn command_render(command: &RenderCommand) -> CliResult<ExitCode> {
    let (tier, config_out) = if let Some(config_path) = &command.config {
        let config = DeployConfig::load(Some(config_path))?;
        (config.tier, config.out)
    } else if let Some(tier) = command.tier {
        (tier.into(), None)
    } else {
        return Err(CliError::Usage("render requires --tier or --config".to_string()));
    };

    let artifact = rules_json_string(&tier.document())?;
    let out = command.out.as_ref().or(config_out.as_ref());
    match out {
        Some(path) => write_file(path, artifact.as_bytes())?,
        None => write_stdout_line(&artifact)
            .map_err(|err| output_error("stdout", &err))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Parses and validates a rules JSON artifact.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let content = read_text_file(&command.file, MAX_RULES_BYTES)?;
    let document = parse_rules_json_str(&content)?;
    document.validate()?;
    write_stdout_line("ok").map_err(|err| output_error("stdout", &err))?;
    Ok(ExitCode::SUCCESS)
}

/// Evaluates one access request against a tier and reports the decision.
///
/// Exit code 0 when granted, 1 when denied.
fn command_simulate(command: &SimulateCommand) -> CliResult<ExitCode> {
    let new_data = match &command.data {
        Some(path) => {
            let content = read_text_file(path, MAX_DATA_BYTES)?;
            let value: Value = serde_json::from_str(&content)
                .map_err(|err| CliError::Usage(format!("invalid data JSON: {err}")))?;
            Some(value)
        }
        None => None,
    };
    let request = AccessRequest {
        operation: command.op.into(),
        path: ConcretePath::parse(&command.path)?,
        auth: command
            .auth
            .as_deref()
            .map_or(AuthContext::Unauthenticated, AuthContext::authenticated),
        new_data,
    };

    let tier: RulesetTier = command.tier.into();
    let decision = evaluate_access(&tier.document(), &request);
    let report = serde_json::to_string_pretty(&decision)
        .map_err(|err| CliError::Serialize(err.to_string()))?;
    write_stdout_line(&report).map_err(|err| output_error("stdout", &err))?;

    if decision.is_granted() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// SECTION: Input/Output Helpers
// ============================================================================

/// Reads a UTF-8 text file with a size limit.
fn read_text_file(path: &Path, limit: usize) -> CliResult<String> {
    let bytes = fs::read(path).map_err(|err| CliError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    if bytes.len() > limit {
        return Err(CliError::InputTooLarge {
            path: path.display().to_string(),
            limit,
        });
    }
    String::from_utf8(bytes).map_err(|_| CliError::Io {
        path: path.display().to_string(),
        message: "input must be utf-8".to_string(),
    })
}

/// Writes an artifact file, appending a trailing newline.
fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    let mut content = bytes.to_vec();
    content.push(b'\n');
    fs::write(path, content).map_err(|err| CliError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Maps an output stream failure into a CLI error.
fn output_error(stream: &str, error: &std::io::Error) -> CliError {
    CliError::Io {
        path: stream.to_string(),
        message: error.to_string(),
    }
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(2)
}
