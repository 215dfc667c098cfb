// crates/settings-catalog-cli/src/main.rs
// ============================================================================
// Module: Settings Catalog CLI Entry Point
// Description: Command dispatcher for offline settings normalization.
// Purpose: Canonicalize, merge secrets, and map settings state from files.
// Dependencies: clap, serde_json, settings-catalog-config, settings-catalog-core, thiserror.
// ============================================================================

//! ## Overview
//! The Settings Catalog CLI runs the normalizer over JSON files on disk. Every
//! input is read under the configured `max_input_bytes` limit, results are
//! written to stdout or an output file, and failures are reported on stderr.
//! Audit events go to the sink selected in `settings-catalog.toml`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use settings_catalog_config::AuditSinkKind;
use settings_catalog_config::SettingsCatalogConfig;
use settings_catalog_core::FileAuditSink;
use settings_catalog_core::Limits;
use settings_catalog_core::NoopAuditSink;
use settings_catalog_core::SettingsAuditSink;
use settings_catalog_core::SettingsNormalizer;
use settings_catalog_core::StderrAuditSink;
use settings_catalog_core::canonical_string;
use settings_catalog_core::decode_settings;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for `equivalent` when the inputs differ.
const NOT_EQUIVALENT_EXIT_CODE: u8 = 1;
/// Exit code for any command failure.
const ERROR_EXIT_CODE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "settings-catalog", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to settings-catalog.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical form of a settings JSON file.
    Canonicalize(CanonicalizeCommand),
    /// Restore secret values from a stored config into a service response.
    PreserveSecrets(PreserveSecretsCommand),
    /// Map a service response into canonical `settingsDetails` state.
    MapState(MapStateCommand),
    /// Compare two settings files ignoring object key order.
    Equivalent(EquivalentCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a settings-catalog configuration file.
    Validate,
}

/// Arguments for canonicalization.
#[derive(Args, Debug)]
struct CanonicalizeCommand {
    /// Settings JSON input file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Optional output file (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for secret preservation.
#[derive(Args, Debug)]
struct PreserveSecretsCommand {
    /// Stored configuration tree holding the secret values.
    #[arg(long, value_name = "PATH")]
    stored: PathBuf,
    /// Service response tree with redacted secrets.
    #[arg(long, value_name = "PATH")]
    response: PathBuf,
    /// Optional output file (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for settings state mapping.
#[derive(Args, Debug)]
struct MapStateCommand {
    /// Service response (collection page or bare settings array).
    #[arg(long, value_name = "PATH")]
    response: PathBuf,
    /// Previously stored `{"settingsDetails": [...]}` document.
    #[arg(long, value_name = "PATH")]
    stored: Option<PathBuf>,
    /// Optional output file (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for equivalence checks.
#[derive(Args, Debug)]
struct EquivalentCommand {
    /// First settings file.
    #[arg(long, value_name = "PATH")]
    left: PathBuf,
    /// Second settings file.
    #[arg(long, value_name = "PATH")]
    right: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
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

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = SettingsCatalogConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("Failed to load config: {err}")))?;

    let normalizer = build_normalizer(&config)?;
    match cli.command {
        Commands::Canonicalize(command) => command_canonicalize(&normalizer, &command),
        Commands::PreserveSecrets(command) => command_preserve_secrets(&normalizer, &command),
        Commands::MapState(command) => command_map_state(&normalizer, &command),
        Commands::Equivalent(command) => command_equivalent(&normalizer, &command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&config),
    }
}

/// Builds a normalizer from validated configuration.
fn build_normalizer(config: &SettingsCatalogConfig) -> CliResult<SettingsNormalizer> {
    let sink: Arc<dyn SettingsAuditSink> = match (config.audit.sink, config.audit.file_path()) {
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::new(format!(
                    "Failed to open audit log at {}: {err}",
                    path.display()
                ))
            })?;
            Arc::new(sink)
        }
        (AuditSinkKind::Stderr, _) => Arc::new(StderrAuditSink),
        (AuditSinkKind::None | AuditSinkKind::File, _) => Arc::new(NoopAuditSink),
    };
    Ok(SettingsNormalizer::new(config.limits(), sink))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the canonicalize command.
fn command_canonicalize(
    normalizer: &SettingsNormalizer,
    command: &CanonicalizeCommand,
) -> CliResult<ExitCode> {
    let input = read_text(&command.input, "settings input", normalizer.limits())?;
    let canonical = normalizer.canonicalize(&input).map_err(|err| {
        CliError::new(format!(
            "Failed to canonicalize {}: {err}",
            command.input.display()
        ))
    })?;
    write_output(command.output.as_deref(), &canonical)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the preserve-secrets command.
fn command_preserve_secrets(
    normalizer: &SettingsNormalizer,
    command: &PreserveSecretsCommand,
) -> CliResult<ExitCode> {
    let limits = normalizer.limits();
    let (stored, stored_bytes) = read_json(&command.stored, "stored config", limits)?;
    let (mut response, response_bytes) =
        read_json(&command.response, "service response", limits)?;
    normalizer
        .preserve_secrets_with_input_bytes(&stored, &mut response, stored_bytes + response_bytes)
        .map_err(|err| CliError::new(format!("Failed to preserve secrets: {err}")))?;
    let merged = canonical_string(&response, limits)
        .map_err(|err| CliError::new(format!("Failed to render merged response: {err}")))?;
    write_output(command.output.as_deref(), &merged)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the map-state command.
fn command_map_state(
    normalizer: &SettingsNormalizer,
    command: &MapStateCommand,
) -> CliResult<ExitCode> {
    let limits = normalizer.limits();
    let response = read_text(&command.response, "service response", limits)?;
    let stored = command
        .stored
        .as_deref()
        .map(|path| read_text(path, "stored settings", limits))
        .transpose()?;
    let mapped = normalizer
        .map_settings_state(stored.as_deref(), &response)
        .map_err(|err| CliError::new(format!("Failed to map settings state: {err}")))?;
    write_output(command.output.as_deref(), &mapped.settings)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the equivalent command.
fn command_equivalent(
    normalizer: &SettingsNormalizer,
    command: &EquivalentCommand,
) -> CliResult<ExitCode> {
    let limits = normalizer.limits();
    let left = read_text(&command.left, "left settings", limits)?;
    let right = read_text(&command.right, "right settings", limits)?;
    let equivalent = normalizer
        .equivalent(&left, &right)
        .map_err(|err| CliError::new(format!("Failed to compare settings: {err}")))?;
    if equivalent {
        write_stdout_line("equivalent")
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    } else {
        write_stdout_line("not equivalent")
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::from(NOT_EQUIVALENT_EXIT_CODE))
    }
}

/// Executes the config validation command.
fn command_config_validate(config: &SettingsCatalogConfig) -> CliResult<ExitCode> {
    let limits = config.limits();
    write_stdout_line(&format!(
        "Config valid (max_depth={}, max_input_bytes={}).",
        limits.max_depth, limits.max_input_bytes
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a UTF-8 text input under the configured size limit.
fn read_text(path: &Path, kind: &str, limits: &Limits) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, limits.max_input_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!(
            "Failed to read {kind} file at {}: {err}",
            path.display()
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "Refusing to read {kind} at {} because it is {size} bytes (limit {limit}).",
            path.display()
        )),
    })?;
    String::from_utf8(bytes).map_err(|_| {
        CliError::new(format!("{kind} file at {} is not valid UTF-8", path.display()))
    })
}

/// Reads and decodes a JSON input, returning the tree and its text size.
fn read_json(path: &Path, kind: &str, limits: &Limits) -> CliResult<(serde_json::Value, usize)> {
    let text = read_text(path, kind, limits)?;
    let value = decode_settings(&text, limits).map_err(|err| {
        CliError::new(format!("Failed to parse {kind} JSON at {}: {err}", path.display()))
    })?;
    Ok((value, text.len()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes `text` plus a trailing newline to `path`, or to stdout when absent.
fn write_output(path: Option<&Path>, text: &str) -> CliResult<()> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(b'\n');
    match path {
        Some(path) => fs::write(path, &bytes).map_err(|err| {
            CliError::new(format!("Failed to write output to {}: {err}", path.display()))
        }),
        None => write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err))),
    }
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("Failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(ERROR_EXIT_CODE)
}
