//! Where the pipeline reads from and writes to in the spreadsheet.
//!
//! Field names on the wire match the keys of existing `appsettings.json`
//! files, so deployed settings keep working.

use serde::{Deserialize, Serialize};

use rigcheck_core::MajorDimension;

fn default_policy_dimension() -> MajorDimension {
    MajorDimension::Columns
}

/// Ranges and write-back columns for one spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Roster range, e.g. `ICs!A3:F`.
    #[serde(rename = "IcsSheet")]
    pub roster_range: String,
    /// Policy range, e.g. `Expected!B1:Z7`.
    #[serde(rename = "ExpectedSystemPropertiesSheet")]
    pub policy_range: String,
    /// Orientation of the policy range. One project per column by default.
    #[serde(
        rename = "ExpectedSystemPropertiesDimension",
        default = "default_policy_dimension"
    )]
    pub policy_dimension: MajorDimension,
    /// Benchmark range, e.g. `CpuScores!A2:B`.
    #[serde(rename = "CpuScoresSheet")]
    pub benchmark_range: String,
    /// Column prefix of the verdict cell, e.g. `ICs!H`.
    #[serde(rename = "EnoughSpecsStoredCell")]
    pub verdict_column: String,
    /// Column prefix of the report cell, e.g. `ICs!I`.
    #[serde(rename = "ActualMachineSpecsStoredCell")]
    pub report_column: String,
}
