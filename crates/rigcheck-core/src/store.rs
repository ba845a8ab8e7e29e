//! # Tabular Store Interface
//!
//! The remote spreadsheet is a collaborator: it reads named ranges and
//! writes single cells. [`TabularStore`] is the seam the compliance
//! pipeline is written against; `rigcheck-sheets` provides the HTTP
//! implementation and [`InMemoryStore`] serves tests and offline runs.
//!
//! Calls are awaited one at a time. Nothing here retries.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::table::Row;

/// Orientation of a read.
///
/// With `Columns`, each returned "row" is one sheet column. Policy sheets
/// are laid out one project per column and are read this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorDimension {
    /// Row-major (the sheet's natural orientation).
    #[default]
    Rows,
    /// Column-major.
    Columns,
}

impl MajorDimension {
    /// Wire name used by the spreadsheet API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Columns => "COLUMNS",
        }
    }
}

/// Read/write access to a remote tabular data source.
#[allow(async_fn_in_trait)]
pub trait TabularStore {
    /// Read every row of `range` in the given orientation.
    async fn read_range(
        &self,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Row>, StoreError>;

    /// Write `value` into the single cell at `range`.
    async fn write_cell(&self, range: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    ranges: BTreeMap<String, Vec<Row>>,
    writes: Vec<(String, String)>,
    failing: BTreeSet<String>,
    reads: Vec<String>,
}

/// Grid-backed store that keeps everything in memory.
///
/// Ranges are stored row-major as they appear in the sheet; column-major
/// reads are transposed on the fly. Writes are recorded in order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows returned for `range`.
    pub fn with_range(self, range: impl Into<String>, rows: Vec<Row>) -> Self {
        self.state.lock().ranges.insert(range.into(), rows);
        self
    }

    /// Make every read of or write to `range` fail.
    pub fn with_failing(self, range: impl Into<String>) -> Self {
        self.state.lock().failing.insert(range.into());
        self
    }

    /// Writes issued so far, as `(range, value)` pairs.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.state.lock().writes.clone()
    }

    /// Ranges read so far, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.state.lock().reads.clone()
    }
}

/// Turn row-major cells into column-major cells. Trailing empty cells are
/// dropped from each column, as the spreadsheet API does.
pub fn transpose(rows: &[Row]) -> Vec<Row> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|column| {
            let mut cells: Row = rows
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
                .collect();
            while matches!(cells.last(), Some(Value::Null)) {
                cells.pop();
            }
            cells
        })
        .collect()
}

impl TabularStore for InMemoryStore {
    async fn read_range(
        &self,
        range: &str,
        dimension: MajorDimension,
    ) -> Result<Vec<Row>, StoreError> {
        let mut state = self.state.lock();
        state.reads.push(range.to_string());
        if state.failing.contains(range) {
            return Err(StoreError::read(range, "range marked as failing"));
        }
        let rows = state
            .ranges
            .get(range)
            .ok_or_else(|| StoreError::read(range, "unknown range"))?;
        tracing::trace!(range, rows = rows.len(), dimension = dimension.as_str(), "in-memory read");
        Ok(match dimension {
            MajorDimension::Rows => rows.clone(),
            MajorDimension::Columns => transpose(rows),
        })
    }

    async fn write_cell(&self, range: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.failing.contains(range) {
            return Err(StoreError::write(range, "range marked as failing"));
        }
        state.writes.push((range.to_string(), value.to_string()));
        Ok(())
    }
}
