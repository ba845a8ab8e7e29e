//! Normalized machine specification, the form the evaluator compares
//! against policy rows and the report formatter prints.

use serde::{Deserialize, Serialize};

use crate::telemetry::OsFamily;

/// Machine specification in comparable units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSpecs {
    /// Operating system family.
    pub os_family: OsFamily,
    /// Full OS description, printed verbatim in the report.
    pub os_description: String,
    /// Integer major version extracted from `os_description`.
    pub os_major_version: i64,
    /// CPU model as reported by the platform.
    pub cpu_model: String,
    /// Vendor-stripped CPU name used as the benchmark key.
    pub cpu_canonical_name: String,
    /// Benchmark score resolved for `cpu_canonical_name`.
    pub cpu_benchmark_score: i64,
    /// Usable memory in GiB, two decimals.
    pub usable_memory_gib: f64,
    /// Total storage over ready volumes in whole GiB.
    pub storage_gib: u64,
    /// Free space over ready volumes in whole GiB.
    pub free_disk_gib: u64,
    /// Architecture label.
    pub architecture: String,
}
