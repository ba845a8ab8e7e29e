//! # Verification Pipeline
//!
//! One linear run per participant:
//!
//! ```text
//! read roster ─┐
//! read policies├─> normalize ─> resolve ─> evaluate ─> format ─> write verdict, write report
//! read scores ─┘
//! ```
//!
//! Every store call is awaited before the next one starts. Any failure
//! ends the run; writes already issued stay in place.

use serde::Serialize;

use rigcheck_core::{
    MajorDimension, NormalizedSpecs, RawTelemetry, RigcheckError, Row, StoreError, TabularStore,
};

use crate::evaluate::{first_failure, CheckFailure};
use crate::layout::SheetLayout;
use crate::normalize::{BenchmarkTable, Normalizer};
use crate::report::{write_back, ReportCells, VerificationResult};
use crate::resolve::{resolve, PolicyTable, Roster};

/// Everything a verification produced, before or after write-back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationOutcome {
    /// Verdict, specs, and target row.
    pub result: VerificationResult,
    /// The cell payloads.
    pub cells: ReportCells,
    /// The first failing check, when the verdict is negative.
    pub failure: Option<CheckFailure>,
}

/// Runs verifications against one store and sheet layout.
#[derive(Debug)]
pub struct Verifier<'a, S> {
    store: &'a S,
    layout: &'a SheetLayout,
    normalizer: Normalizer,
}

impl<'a, S: TabularStore> Verifier<'a, S> {
    /// A verifier over `store` using `layout`.
    pub fn new(store: &'a S, layout: &'a SheetLayout, normalizer: Normalizer) -> Self {
        Self {
            store,
            layout,
            normalizer,
        }
    }

    async fn read(
        &self,
        table: &'static str,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Row>, StoreError> {
        let rows = self.store.read_range(range, dimension).await?;
        tracing::debug!(table, range, rows = rows.len(), "fetched range");
        Ok(rows)
    }

    async fn benchmarks(&self) -> Result<BenchmarkTable, RigcheckError> {
        let rows = self
            .read("benchmark", &self.layout.benchmark_range, MajorDimension::Rows)
            .await?;
        Ok(BenchmarkTable::from_rows(&rows)?)
    }

    /// Normalize `raw` using only the benchmark table. Nothing is written.
    pub async fn inspect(&self, raw: &RawTelemetry) -> Result<NormalizedSpecs, RigcheckError> {
        let benchmarks = self.benchmarks().await?;
        self.normalizer.normalize(raw, &benchmarks)
    }

    /// Compute the verdict and cell payloads for `email` without writing.
    pub async fn verify(
        &self,
        email: &str,
        raw: &RawTelemetry,
    ) -> Result<VerificationOutcome, RigcheckError> {
        let roster_rows = self
            .read("roster", &self.layout.roster_range, MajorDimension::Rows)
            .await?;
        let policy_rows = self
            .read(
                "policy",
                &self.layout.policy_range,
                self.layout.policy_dimension,
            )
            .await?;
        let benchmarks = self.benchmarks().await?;

        let roster = Roster::from_rows(&roster_rows)?;
        let policies = PolicyTable::from_rows(&policy_rows);

        let specs = self.normalizer.normalize(raw, &benchmarks)?;
        let resolution = resolve(email, &roster, &policies)?;
        let failure = first_failure(&specs, &resolution.policies)?;

        match &failure {
            None => tracing::info!(email, "machine meets every policy"),
            Some(f) => tracing::info!(
                email,
                project = %f.project,
                check = %f.check,
                expected = %f.expected,
                actual = %f.actual,
                "machine does not meet policy"
            ),
        }

        let result = VerificationResult {
            verdict: failure.is_none(),
            specs,
            target_row: resolution.target_row,
        };
        let cells = ReportCells::format(&result);
        Ok(VerificationOutcome {
            result,
            cells,
            failure,
        })
    }

    /// Verify `email` and write both cells back.
    pub async fn run(
        &self,
        email: &str,
        raw: &RawTelemetry,
    ) -> Result<VerificationOutcome, RigcheckError> {
        let outcome = self.verify(email, raw).await?;
        write_back(
            self.store,
            &self.layout.verdict_column,
            &self.layout.report_column,
            outcome.result.target_row,
            &outcome.cells,
        )
        .await?;
        tracing::info!(
            email,
            row = outcome.result.target_row,
            verdict = %outcome.cells.verdict,
            "write-back complete"
        );
        Ok(outcome)
    }
}
