//! CLI module for the kiln C backend
//!
//! ## Commands
//!
//! - `emit-c <AST.json>` - Lower a JSON-serialized AST to C and print it
//! - `check <AST.json>` - Lower without printing; report success or the first diagnostic
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// C backend for the kiln language
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(version = VERSION)]
#[command(about = "Lower kiln syntax trees to C source", long_about = None)]
pub struct Cli {
    /// Log progress to stderr (-v for debug, -vv for trace); RUST_LOG overrides it
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate C source and print it to stdout
    #[command(name = "emit-c")]
    EmitC {
        /// JSON-serialized syntax tree (root must be a block)
        #[arg(value_name = "AST")]
        file: PathBuf,
        /// Original source file, used to render diagnostics with context
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,
        /// Spaces per indentation level in the generated C
        #[arg(long, value_name = "N", default_value_t = 4)]
        indent: usize,
    },

    /// Generate C source and discard it, reporting only diagnostics
    Check {
        /// JSON-serialized syntax tree (root must be a block)
        #[arg(value_name = "AST")]
        file: PathBuf,
        /// Original source file, used to render diagnostics with context
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Default log filter for a `-v` count. Generated C goes to stdout, so quiet runs only log warnings.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::EmitC { file, source, indent } => commands::emit_c(&file, source.as_deref(), indent),
        Command::Check { file, source } => commands::check(&file, source.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================
