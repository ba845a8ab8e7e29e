//! # rigcheck CLI entry point
//!
//! Parses command-line arguments, loads settings, and dispatches to
//! subcommand handlers on a single-threaded runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rigcheck_cli::inspect::{run_inspect, InspectArgs};
use rigcheck_cli::settings::{locate, AppSettings, DEFAULT_SETTINGS_FILE};
use rigcheck_cli::verify::{run_verify, VerifyArgs};

/// Check this machine against per-project hardware requirements.
#[derive(Parser, Debug)]
#[command(name = "rigcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the settings file.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify this machine and write the verdict to the roster.
    Verify(VerifyArgs),

    /// Print the normalized specs of this machine.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "rigcheck starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let settings_path = locate(&cli.config);
    tracing::debug!(path = %settings_path.display(), "resolved settings file");
    let settings = AppSettings::load(&settings_path)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Verify(args) => run_verify(args, &settings).await,
            Commands::Inspect(args) => run_inspect(args, &settings).await,
        }
    })
}
