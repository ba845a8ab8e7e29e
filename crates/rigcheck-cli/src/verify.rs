//! # Verify Subcommand
//!
//! Reads the machine, checks it against the policies of every project
//! the participant is enrolled in, and writes the verdict and report to
//! their roster row.
//!
//! A `No` verdict is still a successful run: the exit code is 0 whenever
//! both cells were written.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;

use rigcheck_compliance::{Normalizer, VerificationOutcome, Verifier};
use rigcheck_core::{TabularStore, TelemetryProvider};
use rigcheck_sheets::{SheetsClient, SheetsConfig};

use crate::machine::SysinfoTelemetry;
use crate::settings::AppSettings;

/// Arguments for the `rigcheck verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Participant email as listed in the roster. Prompted for when absent.
    #[arg(long)]
    pub email: Option<String>,

    /// Compute the verdict and report without writing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the verify subcommand.
pub async fn run_verify(args: &VerifyArgs, settings: &AppSettings) -> Result<u8> {
    let email = match &args.email {
        Some(email) => email.trim().to_string(),
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            read_email(&mut stdin.lock(), &mut stdout.lock())?
        }
    };
    if email.is_empty() {
        bail!("an email address is required");
    }

    let config = SheetsConfig::from_env(settings.spreadsheet_id.as_str())
        .context("failed to configure the Sheets client")?;
    let client = SheetsClient::new(config)?;

    let outcome = verify_with(&client, &SysinfoTelemetry, settings, &email, args.dry_run).await?;
    println!("{}", render(&outcome, args.dry_run, args.json)?);
    Ok(0)
}

/// Prompt on `output` and read one line from `input`.
pub fn read_email<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Enter your email address: ")?;
    output.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read email from stdin")?;
    Ok(line.trim().to_string())
}

/// Capture telemetry from `source` and verify `email` against `store`.
pub async fn verify_with<S, P>(
    store: &S,
    source: &P,
    settings: &AppSettings,
    email: &str,
    dry_run: bool,
) -> Result<VerificationOutcome>
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
    let outcome = if dry_run {
        verifier.verify(email, &raw).await?
    } else {
        verifier.run(email, &raw).await?
    };
    Ok(outcome)
}

/// Text printed after a verification.
pub fn render(outcome: &VerificationOutcome, dry_run: bool, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(outcome).context("failed to serialize outcome");
    }
    let row = outcome.result.target_row;
    if dry_run {
        return Ok(format!(
            "Enough specs: {} (row {row}, not written)\n{}",
            outcome.cells.verdict, outcome.cells.report
        ));
    }
    Ok(format!(
        "Machine configuration details updated successfully (row {row})"
    ))
}
