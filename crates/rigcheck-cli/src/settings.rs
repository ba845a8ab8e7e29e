//! # Settings File
//!
//! Loads `appsettings.json` (or a YAML equivalent). Keys keep the names
//! used by deployed settings files:
//!
//! ```json
//! {
//!   "SpreadSheetID": "1AbC...",
//!   "IcsSheet": "ICs!A3:F",
//!   "ExpectedSystemPropertiesSheet": "Expected!B1:Z7",
//!   "CpuScoresSheet": "CpuScores!A2:B",
//!   "EnoughSpecsStoredCell": "ICs!H",
//!   "ActualMachineSpecsStoredCell": "ICs!I",
//!   "CpuName": { "Removals": ["Intel(R) Core(TM)"], "Terminator": "CPU" }
//! }
//! ```
//!
//! The Sheets access token is never read from this file; see
//! [`SheetsConfig::from_env`](rigcheck_sheets::SheetsConfig::from_env).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use rigcheck_compliance::{CpuNameRules, SheetLayout};

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Contents of the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Spreadsheet holding all three tables.
    #[serde(rename = "SpreadSheetID")]
    pub spreadsheet_id: String,
    /// Ranges and write-back columns.
    #[serde(flatten)]
    pub layout: SheetLayout,
    /// CPU name stripping rules.
    #[serde(rename = "CpuName", default)]
    pub cpu_name: CpuNameRules,
}

impl AppSettings {
    /// Read and parse the settings file at `path`.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;

        let settings: Self = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse settings YAML: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse settings JSON: {}", path.display()))?
        };

        settings.validate()?;
        tracing::debug!(path = %path.display(), spreadsheet_id = %settings.spreadsheet_id, "loaded settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            bail!("SpreadSheetID must not be empty");
        }
        let layout = &self.layout;
        for (key, value) in [
            ("IcsSheet", &layout.roster_range),
            ("ExpectedSystemPropertiesSheet", &layout.policy_range),
            ("CpuScoresSheet", &layout.benchmark_range),
            ("EnoughSpecsStoredCell", &layout.verdict_column),
            ("ActualMachineSpecsStoredCell", &layout.report_column),
        ] {
            if value.trim().is_empty() {
                bail!("{key} must not be empty");
            }
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Where to look for a settings file given on the command line.
///
/// Absolute paths are used as-is. A relative path is tried against the
/// current directory first, then next to the executable.
pub fn locate(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
