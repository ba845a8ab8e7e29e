//! # Compliance Evaluator
//!
//! Every matched policy row must pass six checks, applied in a fixed
//! order. The first failing check ends the evaluation.
//!
//! | # | Check | Fails when |
//! |---|-------|------------|
//! | 1 | [`Check::OsVersion`] | actual major version < the version in the policy token for this OS family |
//! | 2 | [`Check::CpuScore`] | benchmark score < minimum |
//! | 3 | [`Check::Memory`] | usable memory < minimum |
//! | 4 | [`Check::Storage`] | storage < minimum |
//! | 5 | [`Check::FreeDisk`] | free space < minimum |
//! | 6 | [`Check::Architecture`] | architecture does not contain the required substring |
//!
//! The order decides which check a failure is attributed to, so it is part
//! of the contract. Only the boolean verdict is written back; the failing
//! check is logged.

use std::fmt;

use serde::Serialize;

use rigcheck_core::units::major_version;
use rigcheck_core::{NormalizedSpecs, OsFamily, ParseError, PolicyRow};

/// Separator between OS tokens in a policy's OS field.
pub const OS_TOKEN_SEPARATOR: char = '&';

/// One requirement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// OS major version.
    OsVersion,
    /// CPU benchmark score.
    CpuScore,
    /// Usable memory.
    Memory,
    /// Total storage.
    Storage,
    /// Free disk space.
    FreeDisk,
    /// Architecture substring.
    Architecture,
}

impl Check {
    /// All checks in evaluation order.
    pub const ORDER: [Check; 6] = [
        Check::OsVersion,
        Check::CpuScore,
        Check::Memory,
        Check::Storage,
        Check::FreeDisk,
        Check::Architecture,
    ];
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OsVersion => write!(f, "os_version"),
            Self::CpuScore => write!(f, "cpu_score"),
            Self::Memory => write!(f, "memory"),
            Self::Storage => write!(f, "storage"),
            Self::FreeDisk => write!(f, "free_disk"),
            Self::Architecture => write!(f, "architecture"),
        }
    }
}

/// The first check that failed, and for which project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    /// Project of the failing policy row.
    pub project: String,
    /// The failing check.
    pub check: Check,
    /// Required value, as text.
    pub expected: String,
    /// Actual value, as text.
    pub actual: String,
}

/// The token of `os_field` naming `family`, or `""` when none does.
pub fn os_token_for(os_field: &str, family: OsFamily) -> &str {
    os_field
        .split(OS_TOKEN_SEPARATOR)
        .find(|token| token.contains(family.policy_label()))
        .unwrap_or("")
}

/// Required OS major version for `family` in `os_field`.
///
/// A field with no token for the family, or a token without a version,
/// is a parse error rather than "no requirement".
pub fn required_os_version(os_field: &str, family: OsFamily) -> Result<i64, ParseError> {
    let token = os_token_for(os_field, family);
    major_version(token).map_err(|e| match e {
        ParseError::OsVersion { reason, .. } => ParseError::OsVersion {
            value: os_field.to_string(),
            reason: format!("no {family} version ({reason})"),
        },
        other => other,
    })
}

fn run_check(
    check: Check,
    actual: &NormalizedSpecs,
    policy: &PolicyRow,
) -> Result<Option<(String, String)>, ParseError> {
    Ok(match check {
        Check::OsVersion => {
            let required = required_os_version(&policy.operating_system, actual.os_family)?;
            (actual.os_major_version < required)
                .then(|| (required.to_string(), actual.os_major_version.to_string()))
        }
        Check::CpuScore => (actual.cpu_benchmark_score < policy.min_cpu_score)
            .then(|| (policy.min_cpu_score.to_string(), actual.cpu_benchmark_score.to_string())),
        Check::Memory => (actual.usable_memory_gib < policy.min_memory_gib)
            .then(|| (policy.min_memory_gib.to_string(), actual.usable_memory_gib.to_string())),
        Check::Storage => (actual.storage_gib < policy.min_storage_gib)
            .then(|| (policy.min_storage_gib.to_string(), actual.storage_gib.to_string())),
        Check::FreeDisk => (actual.free_disk_gib < policy.min_free_disk_gib)
            .then(|| (policy.min_free_disk_gib.to_string(), actual.free_disk_gib.to_string())),
        Check::Architecture => (!actual.architecture.contains(policy.architecture.as_str()))
            .then(|| (policy.architecture.clone(), actual.architecture.clone())),
    })
}

/// First failing check over `policies`, in order, or `None` if all pass.
pub fn first_failure(
    actual: &NormalizedSpecs,
    policies: &[PolicyRow],
) -> Result<Option<CheckFailure>, ParseError> {
    for policy in policies {
        for check in Check::ORDER {
            if let Some((expected, got)) = run_check(check, actual, policy)? {
                return Ok(Some(CheckFailure {
                    project: policy.project.clone(),
                    check,
                    expected,
                    actual: got,
                }));
            }
        }
        tracing::debug!(project = %policy.project, "policy satisfied");
    }
    Ok(None)
}

/// Whether `actual` satisfies every row in `policies`.
pub fn evaluate(actual: &NormalizedSpecs, policies: &[PolicyRow]) -> Result<bool, ParseError> {
    Ok(first_failure(actual, policies)?.is_none())
}
