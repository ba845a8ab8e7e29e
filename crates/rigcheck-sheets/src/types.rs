//! Wire types of the Sheets v4 values API.

use serde::{Deserialize, Serialize};

use rigcheck_core::{MajorDimension, Row};

/// A block of cell values for one range.
///
/// The API omits `values` entirely when the range is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<MajorDimension>,
    #[serde(default)]
    pub values: Vec<Row>,
}

impl ValueRange {
    /// Body for writing `value` into the single cell `range`.
    pub fn single_cell(range: &str, value: &str) -> Self {
        Self {
            range: range.to_string(),
            major_dimension: Some(MajorDimension::Rows),
            values: vec![vec![serde_json::Value::String(value.to_string())]],
        }
    }
}

/// Response of a values update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
    #[serde(default)]
    pub updated_columns: Option<u32>,
    #[serde(default)]
    pub updated_cells: Option<u32>,
}
