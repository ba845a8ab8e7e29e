//! # Typed Row Decoder
//!
//! The store hands back loosely-typed cells (JSON strings, numbers, nulls).
//! This module is the only place that touches them: every table record has
//! an explicit column map and each field is validated on the way in.
//!
//! ## Column layout
//!
//! | Table | Columns |
//! |-------|---------|
//! | roster | 1 email, 2..=5 projects |
//! | policy | 0 project, 1 OS, 2 min score, 3 min memory, 4 min storage, 5 min free, 6 architecture |
//! | benchmark | 0 CPU type, 1 score |
//!
//! Cells may be numbers or numeric strings. Blank rows are skipped but do
//! not shift the positions of the rows after them; roster positions drive
//! write-back addressing.

use serde_json::Value;

use crate::error::ParseError;
use crate::records::{BenchmarkEntry, ParticipantRecord, PolicyRow};

/// One row of cells as returned by the store.
pub type Row = Vec<Value>;

/// Roster email column.
pub const ROSTER_EMAIL_COLUMN: usize = 1;
/// Roster project columns.
pub const ROSTER_PROJECT_COLUMNS: [usize; 4] = [2, 3, 4, 5];

/// Policy project column.
pub const POLICY_PROJECT_COLUMN: usize = 0;
/// Policy OS specification column.
pub const POLICY_OS_COLUMN: usize = 1;
/// Policy minimum CPU score column.
pub const POLICY_CPU_SCORE_COLUMN: usize = 2;
/// Policy minimum memory column.
pub const POLICY_MEMORY_COLUMN: usize = 3;
/// Policy minimum storage column.
pub const POLICY_STORAGE_COLUMN: usize = 4;
/// Policy minimum free disk column.
pub const POLICY_FREE_DISK_COLUMN: usize = 5;
/// Policy architecture column.
pub const POLICY_ARCHITECTURE_COLUMN: usize = 6;

/// Benchmark CPU type column.
pub const BENCHMARK_CPU_TYPE_COLUMN: usize = 0;
/// Benchmark score column.
pub const BENCHMARK_SCORE_COLUMN: usize = 1;

/// Positional, validating access to one row.
#[derive(Debug, Clone, Copy)]
pub struct RowReader<'a> {
    table: &'static str,
    position: usize,
    cells: &'a [Value],
}

impl<'a> RowReader<'a> {
    /// Wrap the cells of row `position` in `table`.
    pub fn new(table: &'static str, position: usize, cells: &'a [Value]) -> Self {
        Self {
            table,
            position,
            cells,
        }
    }

    /// 0-based position of the row in the fetched range.
    pub fn position(&self) -> usize {
        self.position
    }

    fn raw_text(&self, column: usize) -> Option<String> {
        match self.cells.get(column)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Cell text, or `None` when the cell is absent or blank.
    pub fn optional_text(&self, column: usize) -> Option<String> {
        self.raw_text(column).filter(|s| !s.trim().is_empty())
    }

    /// Cell text, which must be present and non-blank.
    pub fn text(&self, column: usize) -> Result<String, ParseError> {
        self.optional_text(column)
            .ok_or_else(|| self.missing(column))
    }

    /// Integer cell. Whole-valued numbers such as `8.0` are accepted.
    pub fn int(&self, column: usize) -> Result<i64, ParseError> {
        match self.cells.get(column) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .ok_or_else(|| self.invalid(column, n.to_string(), "integer")),
            _ => {
                let text = self.text(column)?;
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| self.invalid(column, text, "integer"))
            }
        }
    }

    /// Non-negative integer cell.
    pub fn uint(&self, column: usize) -> Result<u64, ParseError> {
        let value = self.int(column)?;
        u64::try_from(value)
            .map_err(|_| self.invalid(column, value.to_string(), "non-negative integer"))
    }

    /// Real-number cell. NaN and infinities are rejected.
    pub fn real(&self, column: usize) -> Result<f64, ParseError> {
        let parsed = match self.cells.get(column) {
            Some(Value::Number(n)) => n.as_f64(),
            _ => {
                let text = self.text(column)?;
                let parsed = text.trim().parse::<f64>().ok();
                if parsed.is_none() {
                    return Err(self.invalid(column, text, "number"));
                }
                parsed
            }
        };
        match parsed {
            Some(f) if f.is_finite() => Ok(f),
            _ => Err(self.invalid(
                column,
                self.raw_text(column).unwrap_or_default(),
                "number",
            )),
        }
    }

    fn missing(&self, column: usize) -> ParseError {
        ParseError::MissingCell {
            table: self.table,
            row: self.position,
            column,
        }
    }

    fn invalid(&self, column: usize, value: String, expected: &'static str) -> ParseError {
        ParseError::InvalidNumber {
            table: self.table,
            row: self.position,
            column,
            value,
            expected,
        }
    }
}

/// A record with a fixed column layout.
pub trait FromRow: Sized {
    /// Logical table name used in diagnostics.
    const TABLE: &'static str;

    /// Decode one non-blank row.
    fn from_row(row: &RowReader<'_>) -> Result<Self, ParseError>;
}

impl FromRow for ParticipantRecord {
    const TABLE: &'static str = "roster";

    fn from_row(row: &RowReader<'_>) -> Result<Self, ParseError> {
        let email = row.text(ROSTER_EMAIL_COLUMN)?;
        let projects = ROSTER_PROJECT_COLUMNS
            .iter()
            .filter_map(|&column| row.optional_text(column));
        Ok(ParticipantRecord::new(email, projects))
    }
}

impl FromRow for PolicyRow {
    const TABLE: &'static str = "policy";

    fn from_row(row: &RowReader<'_>) -> Result<Self, ParseError> {
        Ok(PolicyRow {
            project: row.text(POLICY_PROJECT_COLUMN)?,
            operating_system: row.optional_text(POLICY_OS_COLUMN).unwrap_or_default(),
            min_cpu_score: row.int(POLICY_CPU_SCORE_COLUMN)?,
            min_memory_gib: row.real(POLICY_MEMORY_COLUMN)?,
            min_storage_gib: row.uint(POLICY_STORAGE_COLUMN)?,
            min_free_disk_gib: row.uint(POLICY_FREE_DISK_COLUMN)?,
            architecture: row.optional_text(POLICY_ARCHITECTURE_COLUMN).unwrap_or_default(),
        })
    }
}

impl FromRow for BenchmarkEntry {
    const TABLE: &'static str = "benchmark";

    fn from_row(row: &RowReader<'_>) -> Result<Self, ParseError> {
        Ok(BenchmarkEntry {
            cpu_type: row.text(BENCHMARK_CPU_TYPE_COLUMN)?,
            score: row.int(BENCHMARK_SCORE_COLUMN)?,
        })
    }
}

/// Whether every cell in the row is null or blank.
pub fn is_blank(row: &[Value]) -> bool {
    row.iter().all(|cell| match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// Decode every non-blank row, keeping each record's original position.
pub fn decode_rows<T: FromRow>(rows: &[Row]) -> Result<Vec<(usize, T)>, ParseError> {
    rows.iter()
        .enumerate()
        .filter(|(_, cells)| !is_blank(cells))
        .map(|(position, cells)| {
            T::from_row(&RowReader::new(T::TABLE, position, cells)).map(|rec| (position, rec))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(values: Value) -> Row {
        match values {
            Value::Array(cells) => cells,
            _ => unreachable!("test rows are arrays"),
        }
    }

    #[test]
    fn roster_row_decodes_email_and_projects() {
        let cells = row(json!(["1", "a@x.com", "P1", "P2", "P1", ""]));
        let rec = ParticipantRecord::from_row(&RowReader::new("roster", 0, &cells)).unwrap();
        assert_eq!(rec.email, "a@x.com");
        assert_eq!(rec.projects, vec!["P1", "P2"]);
    }

    #[test]
    fn short_roster_row_has_fewer_projects() {
        let cells = row(json!(["1", "a@x.com", "P1"]));
        let rec = ParticipantRecord::from_row(&RowReader::new("roster", 0, &cells)).unwrap();
        assert_eq!(rec.projects, vec!["P1"]);
    }

    #[test]
    fn roster_row_without_email_is_missing_cell() {
        let cells = row(json!(["1", "", "P1"]));
        let err = ParticipantRecord::from_row(&RowReader::new("roster", 4, &cells)).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingCell {
                table: "roster",
                row: 4,
                column: ROSTER_EMAIL_COLUMN
            }
        );
    }

    #[test]
    fn policy_row_accepts_strings_and_numbers() {
        let cells = row(json!(["P1", "Windows 10&MacOS 12", "2000", 8.5, 100, " 20 ", "64"]));
        let policy = PolicyRow::from_row(&RowReader::new("policy", 0, &cells)).unwrap();
        assert_eq!(policy.project, "P1");
        assert_eq!(policy.operating_system, "Windows 10&MacOS 12");
        assert_eq!(policy.min_cpu_score, 2000);
        assert_eq!(policy.min_memory_gib, 8.5);
        assert_eq!(policy.min_storage_gib, 100);
        assert_eq!(policy.min_free_disk_gib, 20);
        assert_eq!(policy.architecture, "64");
    }

    #[test]
    fn policy_row_with_bad_score_names_the_column() {
        let cells = row(json!(["P1", "Windows 10", "fast", "8", "100", "20", "64"]));
        let err = PolicyRow::from_row(&RowReader::new("policy", 3, &cells)).unwrap_err();
        match err {
            ParseError::InvalidNumber {
                table, row, column, value, ..
            } => {
                assert_eq!(table, "policy");
                assert_eq!(row, 3);
                assert_eq!(column, POLICY_CPU_SCORE_COLUMN);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_storage_is_rejected() {
        let cells = row(json!(["P1", "Windows 10", "1", "8", "-5", "20", "64"]));
        assert!(PolicyRow::from_row(&RowReader::new("policy", 0, &cells)).is_err());
    }

    #[test]
    fn whole_float_is_an_integer() {
        let cells = row(json!(["i7-8650U", 8.0]));
        let entry = BenchmarkEntry::from_row(&RowReader::new("benchmark", 0, &cells)).unwrap();
        assert_eq!(entry.score, 8);

        let cells = row(json!(["i7-8650U", 8.5]));
        assert!(BenchmarkEntry::from_row(&RowReader::new("benchmark", 0, &cells)).is_err());
    }

    #[test]
    fn real_rejects_non_finite_text() {
        let cells = row(json!(["NaN"]));
        assert!(RowReader::new("policy", 0, &cells).real(0).is_err());
    }

    #[test]
    fn blank_rows_keep_positions() {
        let rows = vec![
            row(json!(["1", "a@x.com", "P1"])),
            Vec::new(),
            row(json!(["", null])),
            row(json!(["4", "b@x.com", "P2"])),
        ];
        let decoded = decode_rows::<ParticipantRecord>(&rows).unwrap();
        let positions: Vec<usize> = decoded.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![0, 3]);
        assert_eq!(decoded[1].1.email, "b@x.com");
    }
}
