//! # Raw Machine Telemetry
//!
//! What the local platform reports about the machine, before any
//! normalization. Captured once per run and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TelemetryError;

/// Operating system family of the machine under verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
    /// Any Linux distribution.
    Linux,
}

impl OsFamily {
    /// Map a platform name (`std::env::consts::OS` style) to a family.
    pub fn from_os_name(name: &str) -> Result<Self, TelemetryError> {
        match name {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            other => Err(TelemetryError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// The family of the platform this binary was compiled for.
    pub fn current() -> Result<Self, TelemetryError> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// The label policy sheets use for this family inside the OS field
    /// (e.g. `Windows 10&MacOS 12&Ubuntu 20`).
    pub fn policy_label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "MacOS",
            Self::Linux => "Ubuntu",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.policy_label())
    }
}

/// One mounted volume as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVolume {
    /// Mount point or drive letter.
    pub mount_point: String,
    /// Total capacity in bytes.
    pub total_bytes: u64,
    /// Space available to the current user in bytes.
    pub available_bytes: u64,
    /// Whether the volume is ready (mounted and readable).
    pub ready: bool,
}

/// Unnormalized machine description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTelemetry {
    /// Operating system family.
    pub os_family: OsFamily,
    /// Full OS description, e.g. `Microsoft Windows 10.0.19044`.
    pub os_description: String,
    /// CPU model as reported, e.g. `Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz`.
    pub cpu_model: String,
    /// Architecture label, e.g. `X64`.
    pub architecture: String,
    /// Total visible memory in bytes.
    pub total_memory_bytes: u64,
    /// Every volume the platform listed.
    pub volumes: Vec<RawVolume>,
}

impl RawTelemetry {
    /// Volumes that count towards storage totals.
    pub fn ready_volumes(&self) -> impl Iterator<Item = &RawVolume> {
        self.volumes.iter().filter(|v| v.ready)
    }

    /// Sum of total capacity over ready volumes.
    pub fn total_disk_bytes(&self) -> u64 {
        self.ready_volumes()
            .fold(0u64, |acc, v| acc.saturating_add(v.total_bytes))
    }

    /// Sum of available space over ready volumes.
    pub fn free_disk_bytes(&self) -> u64 {
        self.ready_volumes()
            .fold(0u64, |acc, v| acc.saturating_add(v.available_bytes))
    }
}

/// Source of raw telemetry for the local machine.
pub trait TelemetryProvider {
    /// Capture a snapshot of the machine.
    fn capture(&self) -> Result<RawTelemetry, TelemetryError>;
}

/// A provider that always returns the same snapshot. Used in tests and for
/// replaying a captured machine description.
#[derive(Debug, Clone)]
pub struct FixedTelemetry(pub RawTelemetry);

impl TelemetryProvider for FixedTelemetry {
    fn capture(&self) -> Result<RawTelemetry, TelemetryError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(total: u64, free: u64, ready: bool) -> RawVolume {
        RawVolume {
            mount_point: "/".into(),
            total_bytes: total,
            available_bytes: free,
            ready,
        }
    }

    fn telemetry(volumes: Vec<RawVolume>) -> RawTelemetry {
        RawTelemetry {
            os_family: OsFamily::Windows,
            os_description: "Microsoft Windows 10.0.19044".into(),
            cpu_model: "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz".into(),
            architecture: "X64".into(),
            total_memory_bytes: 8 * 1024 * 1024 * 1024,
            volumes,
        }
    }

    #[test]
    fn disk_totals_skip_volumes_that_are_not_ready() {
        let t = telemetry(vec![volume(100, 40, true), volume(50, 10, false), volume(7, 3, true)]);
        assert_eq!(t.total_disk_bytes(), 107);
        assert_eq!(t.free_disk_bytes(), 43);
    }

    #[test]
    fn disk_totals_are_zero_without_volumes() {
        let t = telemetry(Vec::new());
        assert_eq!(t.total_disk_bytes(), 0);
        assert_eq!(t.free_disk_bytes(), 0);
    }

    #[test]
    fn os_family_mapping() {
        assert_eq!(OsFamily::from_os_name("windows").unwrap(), OsFamily::Windows);
        assert_eq!(OsFamily::from_os_name("macos").unwrap(), OsFamily::MacOs);
        assert_eq!(OsFamily::from_os_name("linux").unwrap(), OsFamily::Linux);
        assert!(OsFamily::from_os_name("freebsd").is_err());
    }

    #[test]
    fn policy_labels_match_sheet_conventions() {
        assert_eq!(OsFamily::Windows.policy_label(), "Windows");
        assert_eq!(OsFamily::MacOs.policy_label(), "MacOS");
        assert_eq!(OsFamily::Linux.policy_label(), "Ubuntu");
    }

    #[test]
    fn fixed_provider_returns_snapshot() {
        let t = telemetry(vec![volume(1, 1, true)]);
        let provider = FixedTelemetry(t.clone());
        assert_eq!(provider.capture().unwrap(), t);
    }
}
