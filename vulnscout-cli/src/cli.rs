//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Vulnscout -- dependency vulnerability scanner.
///
/// Use `vulnscout <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "vulnscout", version, about, long_about = None)]
pub struct Cli {
    /// Path to the vulnscout.toml configuration file.
    #[arg(short, long, default_value = "vulnscout.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a project directory for vulnerable dependencies.
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Scan a project directory for vulnerable dependencies.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to scan (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Minimum severity to display (unknown, low, medium, high, critical).
    ///
    /// Only affects output; the exit code always reflects all findings.
    #[arg(long)]
    pub min_severity: Option<String>,
}

// ---- config ----

/// Manage vulnscout configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scanner).
        #[arg(long)]
        section: Option<String>,
    },
}
