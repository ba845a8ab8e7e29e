//! # Inspect Subcommand
//!
//! Shows what `verify` would report for this machine. Reads the benchmark
//! table only; the roster and policies are not touched and nothing is
//! written.

use anyhow::{Context, Result};
use clap::Args;

use rigcheck_compliance::report::report_text;
use rigcheck_compliance::{Normalizer, Verifier};
use rigcheck_core::{NormalizedSpecs, TabularStore, TelemetryProvider};
use rigcheck_sheets::{SheetsClient, SheetsConfig};

use crate::machine::SysinfoTelemetry;
use crate::settings::AppSettings;

/// Arguments for the `rigcheck inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Print the normalized specs as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect subcommand.
pub async fn run_inspect(args: &InspectArgs, settings: &AppSettings) -> Result<u8> {
    let config = SheetsConfig::from_env(settings.spreadsheet_id.as_str())
        .context("failed to configure the Sheets client")?;
    let client = SheetsClient::new(config)?;

    let specs = inspect_with(&client, &SysinfoTelemetry, settings).await?;
    println!("{}", render(&specs, args.json)?);
    Ok(0)
}

/// Capture telemetry from `source` and normalize it against `store`'s benchmarks.
pub async fn inspect_with<S, P>(store: &S, source: &P, settings: &AppSettings) -> Result<NormalizedSpecs>
where
    S: TabularStore,
    P: TelemetryProvider,
{
    let raw = source.capture().context("failed to read machine telemetry")?;
    let verifier = Verifier::new(
        store,
        &settings.layout,
        Normalizer::new(settings.cpu_name.clone()),
    );
    Ok(verifier.inspect(&raw).await?)
}

fn render(specs: &NormalizedSpecs, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(specs).context("failed to serialize specs");
    }
    Ok(format!(
        "{}\n - Benchmark key:{}\n - OS major version:{}",
        report_text(specs),
        specs.cpu_canonical_name,
        specs.os_major_version
    ))
}
