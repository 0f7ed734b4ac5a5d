//! Vulnscout CLI entry point
//!
//! Parses arguments, initialises logging, and dispatches to the
//! subcommand handlers. Diagnostics go to stderr so that stdout only
//! ever carries the rendered payload (text or JSON).

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vulnscout_core::config::{GeneralConfig, VulnscoutConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Best-effort config peek for logging setup; subcommands load and
    // validate the config themselves and report failures properly.
    let general = if cli.config.exists() {
        VulnscoutConfig::load(&cli.config)
            .await
            .map(|c| c.general)
            .unwrap_or_default()
    } else {
        GeneralConfig::default()
    };

    init_logging(cli.log_level.as_deref(), &general);

    let writer = OutputWriter::new(cli.output);

    let outcome = run(cli, &writer).await;

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Dispatch to the selected subcommand and return its exit code.
///
/// Exit codes 0-2 form the severity gate of a successful scan; errors
/// map to codes 3 and above via [`CliError::exit_code`].
async fn run(cli: Cli, writer: &OutputWriter) -> Result<i32, CliError> {
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, writer).await,
        Commands::Config(args) => {
            commands::config::execute(args, &cli.config, writer).await?;
            Ok(0)
        }
    }
}

/// Initialise tracing, writing to stderr.
///
/// Level precedence: `RUST_LOG` env, then the `--log-level` flag, then
/// the config file's `general.log_level`. Output format (pretty or
/// JSON) follows `general.log_format`.
fn init_logging(level_flag: Option<&str>, general: &GeneralConfig) {
    let directive = level_flag.unwrap_or(&general.log_level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
