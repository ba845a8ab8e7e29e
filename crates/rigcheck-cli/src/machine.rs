//! Local machine telemetry via `sysinfo`.

use sysinfo::{Disks, System};

use rigcheck_core::{OsFamily, RawTelemetry, RawVolume, TelemetryError, TelemetryProvider};

/// Architecture label for a Rust target architecture name.
pub fn architecture_label(arch: &str) -> String {
    match arch {
        "x86_64" => "X64".to_string(),
        "x86" => "X86".to_string(),
        "aarch64" => "Arm64".to_string(),
        "arm" => "Arm".to_string(),
        other => other.to_string(),
    }
}

/// Reads the running machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoTelemetry;

impl TelemetryProvider for SysinfoTelemetry {
    fn capture(&self) -> Result<RawTelemetry, TelemetryError> {
        let os_family = OsFamily::current()?;

        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpu_model = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .ok_or(TelemetryError::MissingCpu)?;

        let os_description = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| os_family.to_string());

        let disks = Disks::new_with_refreshed_list();
        let volumes = disks
            .list()
            .iter()
            .map(|disk| RawVolume {
                mount_point: disk.mount_point().display().to_string(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
                ready: true,
            })
            .collect::<Vec<_>>();

        let raw = RawTelemetry {
            os_family,
            os_description,
            cpu_model,
            architecture: architecture_label(std::env::consts::ARCH),
            total_memory_bytes: sys.total_memory(),
            volumes,
        };
        tracing::debug!(
            os = %raw.os_description,
            cpu = %raw.cpu_model,
            arch = %raw.architecture,
            memory_bytes = raw.total_memory_bytes,
            volumes = raw.volumes.len(),
            "captured local telemetry"
        );
        Ok(raw)
    }
}
