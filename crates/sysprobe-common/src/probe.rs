//! Probe identity types.
//!
//! A probe is one external diagnostic command whose raw text output is
//! understood by exactly one parser. `ProbeId` is the closed set of probes;
//! dispatch throughout the workspace is a match on this enum, never a
//! runtime string lookup.

use serde::{Deserialize, Serialize};

/// Identifier for a single diagnostic probe.
///
/// Serializes as a snake_case string so it can key JSON report maps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ProbeId {
    /// Total CPU core count.
    CoreCount,
    /// Sampled CPU usage percentage (two successive measurements).
    CpuUsage,
    /// Per-CPU stat lines (user/nice/system/... jiffies).
    CpuStats,
    /// Instantaneous CPU utilization breakdown with timestamp.
    CpuUtilization,
    /// 1/5/15 minute load averages.
    LoadAverage,
    /// hostnamectl + cpuinfo summary.
    HardwareInfo,
    /// System uptime and CPU sleep time.
    Uptime,
    /// Total jiffies with per-mode breakdown.
    Jiffies,
    /// Total CPU time in jiffies with per-mode breakdown.
    TotalCpuTime,
    /// /etc/os-release KEY=VALUE fields.
    OsRelease,
    /// Distribution and init-system summary lines.
    DistributionInfo,
    /// Kernel version, command line, architecture.
    KernelDetails,
    /// GLIBC/GCC library versions.
    LibraryVersions,
    /// Security updates and security module summary.
    SecurityInfo,
    /// Kernel limits (max PID, threads, PTYs).
    SystemLimits,
    /// uname fields.
    UnameInfo,
    /// Package manager detection plus installed package listings.
    PackageManagers,
    /// Block storage device detection.
    StorageDevices,
    /// Storage devices that report a temperature.
    TemperatureDevices,
    /// SMART/NVMe diagnostic dump (requires elevation).
    SmartData,
    /// Indented process tree snapshot with per-process details.
    ProcessSnapshot,
    /// Firewall subsystem status.
    FirewallStatus,
    /// Logged-in user sessions.
    LoggedInUsers,
    /// Autostart directory audit.
    AutostartDirs,
    /// systemd user service states.
    SystemdUserServices,
    /// Per-sensor temperature readings (CPU/GPU/VRM/...).
    SensorTemperatures,
    /// Manually installed software directory listing.
    ManualInstalls,
}

impl ProbeId {
    /// All known probes, in report order.
    pub const ALL: &'static [ProbeId] = &[
        ProbeId::CoreCount,
        ProbeId::CpuUsage,
        ProbeId::CpuStats,
        ProbeId::CpuUtilization,
        ProbeId::LoadAverage,
        ProbeId::HardwareInfo,
        ProbeId::Uptime,
        ProbeId::Jiffies,
        ProbeId::TotalCpuTime,
        ProbeId::OsRelease,
        ProbeId::DistributionInfo,
        ProbeId::KernelDetails,
        ProbeId::LibraryVersions,
        ProbeId::SecurityInfo,
        ProbeId::SystemLimits,
        ProbeId::UnameInfo,
        ProbeId::PackageManagers,
        ProbeId::StorageDevices,
        ProbeId::TemperatureDevices,
        ProbeId::SmartData,
        ProbeId::ProcessSnapshot,
        ProbeId::FirewallStatus,
        ProbeId::LoggedInUsers,
        ProbeId::AutostartDirs,
        ProbeId::SystemdUserServices,
        ProbeId::SensorTemperatures,
        ProbeId::ManualInstalls,
    ];

    /// Backend function name passed to the monitor binary.
    pub fn command_name(&self) -> &'static str {
        match self {
            ProbeId::CoreCount => "get_core_count",
            ProbeId::CpuUsage => "calculate_cpu_usage",
            ProbeId::CpuStats => "read_cpu_stats",
            ProbeId::CpuUtilization => "monitor_cpu_utilization",
            ProbeId::LoadAverage => "get_load_average",
            ProbeId::HardwareInfo => "display_hardware_info",
            ProbeId::Uptime => "show_system_uptime_and_cpu_sleep_time",
            ProbeId::Jiffies => "get_total_jiffies",
            ProbeId::TotalCpuTime => "get_total_cpu_time",
            ProbeId::OsRelease => "print_detailed_os_info",
            ProbeId::DistributionInfo => "print_distribution_info",
            ProbeId::KernelDetails => "print_kernel_details",
            ProbeId::LibraryVersions => "print_library_versions",
            ProbeId::SecurityInfo => "print_security_info",
            ProbeId::SystemLimits => "print_system_limits",
            ProbeId::UnameInfo => "print_uname_info",
            ProbeId::PackageManagers => "detect_all_package_managers",
            ProbeId::StorageDevices => "detect_all_storage_devices",
            ProbeId::TemperatureDevices => "find_storage_devices_with_temperature_reporting",
            ProbeId::SmartData => "print_smart_data",
            ProbeId::ProcessSnapshot => "list_processes",
            ProbeId::FirewallStatus => "check_firewall_status",
            ProbeId::LoggedInUsers => "list_logged_in_users",
            ProbeId::AutostartDirs => "check_startup_directories",
            ProbeId::SystemdUserServices => "check_systemd_user_services",
            ProbeId::SensorTemperatures => "read_sensor_temperatures",
            ProbeId::ManualInstalls => "list_manual_installs",
        }
    }

    /// Whether the probe must run with elevated privileges.
    pub fn requires_elevation(&self) -> bool {
        matches!(self, ProbeId::SmartData)
    }

    /// snake_case name used in report keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeId::CoreCount => "core_count",
            ProbeId::CpuUsage => "cpu_usage",
            ProbeId::CpuStats => "cpu_stats",
            ProbeId::CpuUtilization => "cpu_utilization",
            ProbeId::LoadAverage => "load_average",
            ProbeId::HardwareInfo => "hardware_info",
            ProbeId::Uptime => "uptime",
            ProbeId::Jiffies => "jiffies",
            ProbeId::TotalCpuTime => "total_cpu_time",
            ProbeId::OsRelease => "os_release",
            ProbeId::DistributionInfo => "distribution_info",
            ProbeId::KernelDetails => "kernel_details",
            ProbeId::LibraryVersions => "library_versions",
            ProbeId::SecurityInfo => "security_info",
            ProbeId::SystemLimits => "system_limits",
            ProbeId::UnameInfo => "uname_info",
            ProbeId::PackageManagers => "package_managers",
            ProbeId::StorageDevices => "storage_devices",
            ProbeId::TemperatureDevices => "temperature_devices",
            ProbeId::SmartData => "smart_data",
            ProbeId::ProcessSnapshot => "process_snapshot",
            ProbeId::FirewallStatus => "firewall_status",
            ProbeId::LoggedInUsers => "logged_in_users",
            ProbeId::AutostartDirs => "autostart_dirs",
            ProbeId::SystemdUserServices => "systemd_user_services",
            ProbeId::SensorTemperatures => "sensor_temperatures",
            ProbeId::ManualInstalls => "manual_installs",
        }
    }
}

impl std::fmt::Display for ProbeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProbeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProbeId::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown probe: {s}"))
    }
}

/// Raw text produced by one probe. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutput {
    /// Probe that produced this output.
    pub probe: ProbeId,

    /// The opaque text blob.
    pub text: String,
}

impl RawOutput {
    pub fn new(probe: ProbeId, text: impl Into<String>) -> Self {
        Self {
            probe,
            text: text.into(),
        }
    }
}
