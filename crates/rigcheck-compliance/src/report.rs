//! # Report Formatter & Writer
//!
//! Renders a [`VerificationResult`] into the two cells written back to the
//! participant's roster row, and issues the writes.
//!
//! The report cell is read by people, and its layout is fixed:
//!
//! ```text
//!  - CPU:Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz
//!  - CPU Score:2500
//!  - Memory:16G
//!  - OS:Microsoft Windows 10.0.19044
//!  - Storage:500G
//!  - Free disk space:50G
//!  - Arch:X64
//! ```
//!
//! The two writes are independent. If the second fails, the first stays
//! written; nothing is rolled back.

use std::fmt;

use serde::Serialize;

use rigcheck_core::{NormalizedSpecs, StoreError, TabularStore};

/// Verdict cell text for a compliant machine.
pub const VERDICT_PASS: &str = "Yes";

/// Verdict cell text for a non-compliant machine.
pub const VERDICT_FAIL: &str = "No";

/// Outcome of one verification, ready to be formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    /// Whether every matched policy passed.
    pub verdict: bool,
    /// The normalized machine specification.
    pub specs: NormalizedSpecs,
    /// 1-based sheet row to write to.
    pub target_row: usize,
}

/// Verdict cell text for `verdict`.
pub fn verdict_text(verdict: bool) -> &'static str {
    if verdict {
        VERDICT_PASS
    } else {
        VERDICT_FAIL
    }
}

/// Human-readable summary of `specs`, one labeled field per line.
pub fn report_text(specs: &NormalizedSpecs) -> String {
    [
        format!(" - CPU:{}", specs.cpu_model),
        format!(" - CPU Score:{}", specs.cpu_benchmark_score),
        format!(" - Memory:{}G", specs.usable_memory_gib),
        format!(" - OS:{}", specs.os_description),
        format!(" - Storage:{}G", specs.storage_gib),
        format!(" - Free disk space:{}G", specs.free_disk_gib),
        format!(" - Arch:{}", specs.architecture),
    ]
    .join("\n")
}

/// The two cell payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportCells {
    /// `Yes` or `No`.
    pub verdict: String,
    /// Multi-line machine summary.
    pub report: String,
}

impl ReportCells {
    /// Format `result`.
    pub fn format(result: &VerificationResult) -> Self {
        Self {
            verdict: verdict_text(result.verdict).to_string(),
            report: report_text(&result.specs),
        }
    }
}

/// A cell address: a column prefix (optionally sheet-qualified, e.g.
/// `ICs!H`) followed by a 1-based row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    /// Column prefix.
    pub column: String,
    /// 1-based row.
    pub row: usize,
}

impl CellAddress {
    /// Address of `row` in `column`.
    pub fn new(column: impl Into<String>, row: usize) -> Self {
        Self {
            column: column.into(),
            row,
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Write the verdict cell, then the report cell.
pub async fn write_back<S: TabularStore>(
    store: &S,
    verdict_column: &str,
    report_column: &str,
    row: usize,
    cells: &ReportCells,
) -> Result<(), StoreError> {
    let verdict_at = CellAddress::new(verdict_column, row).to_string();
    store.write_cell(&verdict_at, &cells.verdict).await?;
    tracing::debug!(cell = %verdict_at, verdict = %cells.verdict, "verdict written");

    let report_at = CellAddress::new(report_column, row).to_string();
    store.write_cell(&report_at, &cells.report).await?;
    tracing::debug!(cell = %report_at, "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigcheck_core::{InMemoryStore, OsFamily};

    fn specs() -> NormalizedSpecs {
        NormalizedSpecs {
            os_family: OsFamily::Windows,
            os_description: "Microsoft Windows 10.0.19044".into(),
            os_major_version: 10,
            cpu_model: "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz".into(),
            cpu_canonical_name: "i7-8650U".into(),
            cpu_benchmark_score: 2500,
            usable_memory_gib: 16.0,
            storage_gib: 500,
            free_disk_gib: 50,
            architecture: "X64".into(),
        }
    }

    #[test]
    fn report_layout_is_fixed() {
        let expected = " - CPU:Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz\n - CPU Score:2500\n - Memory:16G\n - OS:Microsoft Windows 10.0.19044\n - Storage:500G\n - Free disk space:50G\n - Arch:X64";
        assert_eq!(report_text(&specs()), expected);
    }

    #[test]
    fn fractional_memory_keeps_decimals() {
        let mut s = specs();
        s.usable_memory_gib = 15.87;
        assert!(report_text(&s).contains(" - Memory:15.87G\n"));
    }

    #[test]
    fn verdict_cells() {
        let mut result = VerificationResult {
            verdict: true,
            specs: specs(),
            target_row: 8,
        };
        assert_eq!(ReportCells::format(&result).verdict, "Yes");
        result.verdict = false;
        assert_eq!(ReportCells::format(&result).verdict, "No");
    }

    #[test]
    fn cell_address_concatenates() {
        assert_eq!(CellAddress::new("ICs!H", 8).to_string(), "ICs!H8");
    }

    #[tokio::test]
    async fn writes_verdict_then_report() {
        let store = InMemoryStore::new();
        let cells = ReportCells {
            verdict: "Yes".into(),
            report: "r".into(),
        };
        write_back(&store, "C", "D", 8, &cells).await.unwrap();
        assert_eq!(
            store.writes(),
            vec![("C8".to_string(), "Yes".to_string()), ("D8".to_string(), "r".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_report_write_leaves_verdict() {
        let store = InMemoryStore::new().with_failing("D8");
        let cells = ReportCells {
            verdict: "No".into(),
            report: "r".into(),
        };
        let err = write_back(&store, "C", "D", 8, &cells).await.unwrap_err();
        assert_eq!(err.range, "D8");
        assert_eq!(store.writes(), vec![("C8".to_string(), "No".to_string())]);
    }
}
