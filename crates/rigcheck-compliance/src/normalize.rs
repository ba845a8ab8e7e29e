//! # Telemetry Normalizer
//!
//! Turns [`RawTelemetry`] into [`NormalizedSpecs`]: integer OS major
//! version, canonical CPU name and its benchmark score, memory in GiB
//! with two decimals, and storage totals in whole GiB.
//!
//! ## CPU name extraction
//!
//! Benchmark sheets key CPUs by short model names (`i7-8650U`), while
//! platforms report marketing strings (`Intel(R) Core(TM) i7-8650U CPU @
//! 1.90GHz`). [`CpuNameRules`] bridges the two with an ordered list of
//! substring removals followed by a cut at a terminator marker. The rules
//! are tied to vendor string formats and will need extending when a new
//! vendor format shows up; they are configuration, not code, for that reason.

use serde::{Deserialize, Serialize};

use rigcheck_core::units::{bytes_to_gib_floor, bytes_to_gib_rounded, major_version};
use rigcheck_core::{
    decode_rows, BenchmarkEntry, LookupError, NormalizedSpecs, ParseError, RawTelemetry,
    RigcheckError, Row,
};

/// Vendor prefixes removed by default.
pub const DEFAULT_CPU_REMOVALS: &[&str] = &["Intel(R) Core(TM)"];

/// Marker after which everything is cut by default.
pub const DEFAULT_CPU_TERMINATOR: &str = "CPU";

/// Stripping rules that reduce a raw CPU model to a benchmark key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CpuNameRules {
    /// Substrings removed in order.
    pub removals: Vec<String>,
    /// Everything from the first occurrence of this marker is dropped.
    pub terminator: Option<String>,
}

impl Default for CpuNameRules {
    fn default() -> Self {
        Self {
            removals: DEFAULT_CPU_REMOVALS.iter().map(|s| s.to_string()).collect(),
            terminator: Some(DEFAULT_CPU_TERMINATOR.to_string()),
        }
    }
}

impl CpuNameRules {
    /// Apply removals, cut at the terminator, then trim.
    pub fn canonical_name(&self, raw: &str) -> String {
        let mut name = raw.to_string();
        for removal in self.removals.iter().filter(|r| !r.is_empty()) {
            name = name.replace(removal.as_str(), "");
        }
        if let Some(marker) = self.terminator.as_deref().filter(|m| !m.is_empty()) {
            if let Some(idx) = name.find(marker) {
                name.truncate(idx);
            }
        }
        name.trim().to_string()
    }
}

/// Benchmark scores keyed by CPU type, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkTable {
    entries: Vec<BenchmarkEntry>,
}

impl BenchmarkTable {
    /// Build a table from already-decoded entries.
    pub fn new(entries: Vec<BenchmarkEntry>) -> Self {
        Self { entries }
    }

    /// Decode the benchmark range. Blank rows are skipped.
    pub fn from_rows(rows: &[Row]) -> Result<Self, ParseError> {
        let entries = decode_rows::<BenchmarkEntry>(rows)?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect();
        Ok(Self { entries })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose CPU type contains `canonical_name`, the benchmark
    /// key derived from `cpu_model`.
    ///
    /// Table order decides ties; nothing is averaged or fuzzy-matched. An
    /// empty key would match every row and is rejected.
    pub fn lookup(
        &self,
        cpu_model: &str,
        canonical_name: &str,
    ) -> Result<&BenchmarkEntry, LookupError> {
        if canonical_name.is_empty() {
            return Err(LookupError::EmptyCpuName {
                raw: cpu_model.to_string(),
            });
        }
        self.entries
            .iter()
            .find(|entry| entry.cpu_type.contains(canonical_name))
            .ok_or_else(|| LookupError::CpuModelNotFound {
                canonical_name: canonical_name.to_string(),
            })
    }
}

/// Produces [`NormalizedSpecs`] from raw telemetry.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: CpuNameRules,
}

impl Normalizer {
    /// A normalizer using the given CPU name rules.
    pub fn new(rules: CpuNameRules) -> Self {
        Self { rules }
    }

    /// Normalize `raw`, resolving the CPU score from `benchmarks`.
    pub fn normalize(
        &self,
        raw: &RawTelemetry,
        benchmarks: &BenchmarkTable,
    ) -> Result<NormalizedSpecs, RigcheckError> {
        let os_major_version = major_version(&raw.os_description)?;

        let cpu_canonical_name = self.rules.canonical_name(&raw.cpu_model);
        let entry = benchmarks.lookup(&raw.cpu_model, &cpu_canonical_name)?;
        tracing::debug!(
            cpu_model = %raw.cpu_model,
            canonical = %cpu_canonical_name,
            matched = %entry.cpu_type,
            score = entry.score,
            "resolved CPU benchmark score"
        );

        Ok(NormalizedSpecs {
            os_family: raw.os_family,
            os_description: raw.os_description.clone(),
            os_major_version,
            cpu_model: raw.cpu_model.clone(),
            cpu_canonical_name,
            cpu_benchmark_score: entry.score,
            usable_memory_gib: bytes_to_gib_rounded(raw.total_memory_bytes),
            storage_gib: bytes_to_gib_floor(raw.total_disk_bytes()),
            free_disk_gib: bytes_to_gib_floor(raw.free_disk_bytes()),
            architecture: raw.architecture.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigcheck_core::{OsFamily, RawVolume, BYTES_PER_GIB};
    use serde_json::json;

    fn raw() -> RawTelemetry {
        RawTelemetry {
            os_family: OsFamily::Windows,
            os_description: "Microsoft Windows 10.0.19044".into(),
            cpu_model: "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz".into(),
            architecture: "X64".into(),
            total_memory_bytes: 8_589_934_592,
            volumes: vec![
                RawVolume {
                    mount_point: "C:\\".into(),
                    total_bytes: 17_179_869_184,
                    available_bytes: 5 * BYTES_PER_GIB + 12,
                    ready: true,
                },
                RawVolume {
                    mount_point: "D:\\".into(),
                    total_bytes: 500 * BYTES_PER_GIB,
                    available_bytes: 500 * BYTES_PER_GIB,
                    ready: false,
                },
            ],
        }
    }

    fn table() -> BenchmarkTable {
        BenchmarkTable::new(vec![
            BenchmarkEntry {
                cpu_type: "Intel Core i5-8250U @ 1.60GHz".into(),
                score: 6100,
            },
            BenchmarkEntry {
                cpu_type: "Intel Core i7-8650U @ 1.90GHz".into(),
                score: 6900,
            },
        ])
    }

    #[test]
    fn default_rules_strip_intel_marketing() {
        let rules = CpuNameRules::default();
        assert_eq!(
            rules.canonical_name("Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz"),
            "i7-8650U"
        );
        assert_eq!(
            rules.canonical_name("Intel(R) Core(TM) i5-10210U CPU @ 1.60GHz"),
            "i5-10210U"
        );
    }

    #[test]
    fn name_without_terminator_is_only_trimmed() {
        let rules = CpuNameRules::default();
        assert_eq!(
            rules.canonical_name("  AMD Ryzen 7 5800X 8-Core Processor "),
            "AMD Ryzen 7 5800X 8-Core Processor"
        );
    }

    #[test]
    fn custom_rules_apply_in_order() {
        let rules = CpuNameRules {
            removals: vec!["AMD ".into(), "Ryzen ".into()],
            terminator: Some("-Core".into()),
        };
        assert_eq!(rules.canonical_name("AMD Ryzen 7 5800X 8-Core Processor"), "7 5800X 8");
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: CpuNameRules = serde_json::from_value(json!({ "Removals": ["Apple "] })).unwrap();
        assert_eq!(rules.removals, vec!["Apple "]);
        assert_eq!(rules.terminator.as_deref(), Some("CPU"));

        let rules: CpuNameRules = serde_json::from_value(json!({ "Terminator": null })).unwrap();
        assert_eq!(rules.terminator, None);
    }

    #[test]
    fn lookup_takes_first_containing_row() {
        let table = BenchmarkTable::new(vec![
            BenchmarkEntry {
                cpu_type: "i7-8650U (laptop)".into(),
                score: 1,
            },
            BenchmarkEntry {
                cpu_type: "Intel Core i7-8650U @ 1.90GHz".into(),
                score: 2,
            },
        ]);
        assert_eq!(table.lookup("i7-8650U CPU", "i7-8650U").unwrap().score, 1);
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let err = table().lookup("i9-9900K CPU", "i9-9900K").unwrap_err();
        assert_eq!(
            err,
            LookupError::CpuModelNotFound {
                canonical_name: "i9-9900K".into()
            }
        );
    }

    #[test]
    fn empty_key_never_matches() {
        assert_eq!(
            table().lookup("CPU @ 3.00GHz", "").unwrap_err(),
            LookupError::EmptyCpuName {
                raw: "CPU @ 3.00GHz".into()
            }
        );
    }

    #[test]
    fn table_decodes_and_skips_blank_rows() {
        let rows = vec![
            vec![json!("Intel Core i7-8650U @ 1.90GHz"), json!("6900")],
            vec![],
            vec![json!("AMD Ryzen 7 5800X"), json!(28000)],
        ];
        let table = BenchmarkTable::from_rows(&rows).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("AMD Ryzen 7 5800X", "5800X").unwrap().score, 28000);
    }

    #[test]
    fn normalize_produces_comparable_units() {
        let specs = Normalizer::default().normalize(&raw(), &table()).unwrap();
        assert_eq!(specs.os_major_version, 10);
        assert_eq!(specs.cpu_canonical_name, "i7-8650U");
        assert_eq!(specs.cpu_benchmark_score, 6900);
        assert_eq!(specs.usable_memory_gib, 8.00);
        assert_eq!(specs.storage_gib, 16);
        assert_eq!(specs.free_disk_gib, 5);
        assert_eq!(specs.architecture, "X64");
        assert_eq!(specs.cpu_model, "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz");
    }

    #[test]
    fn normalize_fails_on_unknown_cpu() {
        let mut raw = raw();
        raw.cpu_model = "Intel(R) Core(TM) i9-9900K CPU @ 3.60GHz".into();
        let err = Normalizer::default().normalize(&raw, &table()).unwrap_err();
        assert!(matches!(
            err,
            RigcheckError::Lookup(LookupError::CpuModelNotFound { .. })
        ));
    }

    #[test]
    fn normalize_fails_on_cpu_that_strips_to_nothing() {
        let mut raw = raw();
        raw.cpu_model = "CPU".into();
        let err = Normalizer::default().normalize(&raw, &table()).unwrap_err();
        assert!(matches!(
            err,
            RigcheckError::Lookup(LookupError::EmptyCpuName { ref raw }) if raw == "CPU"
        ));
    }

    #[test]
    fn normalize_fails_on_versionless_os() {
        let mut raw = raw();
        raw.os_description = "Windows".into();
        let err = Normalizer::default().normalize(&raw, &table()).unwrap_err();
        assert!(matches!(err, RigcheckError::Parse(ParseError::OsVersion { .. })));
    }
}
