//! Closed parser dispatch and all-settled aggregation.
//!
//! `parse_probe` routes raw text to exactly one parser by probe identity.
//! `aggregate` merges settled per-probe results into one report: a failed
//! probe populates `failures` and never aborts collection of its siblings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysprobe_common::{Error, ErrorCategory, ProbeId};
use tracing::{debug, warn};

use crate::parse::{cpu, osinfo, packages, process_tree, security, smart, storage, temperature};

/// Typed record for one probe's parsed output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ProbeRecord {
    CoreCount(cpu::CoreCount),
    CpuUsage(cpu::CpuUsage),
    CpuStats(cpu::CpuStats),
    CpuUtilization(cpu::CpuUtilization),
    LoadAverage(cpu::LoadAverage),
    HardwareInfo(cpu::HardwareSummary),
    Uptime(cpu::UptimeInfo),
    Jiffies(cpu::JiffiesBreakdown),
    TotalCpuTime(cpu::TotalCpuTime),
    OsRelease(osinfo::OsRelease),
    DistributionInfo(osinfo::DistributionInfo),
    KernelDetails(osinfo::KernelDetails),
    LibraryVersions(osinfo::LibraryVersions),
    SecurityInfo(osinfo::SecurityInfo),
    SystemLimits(osinfo::SystemLimits),
    UnameInfo(osinfo::UnameInfo),
    PackageManagers(packages::PackageManagers),
    StorageDevices(storage::StorageDevices),
    TemperatureDevices(storage::TemperatureDevices),
    SmartData(smart::SmartData),
    ProcessSnapshot(process_tree::ProcessSnapshot),
    FirewallStatus(security::FirewallStatus),
    LoggedInUsers(security::LoggedInUsers),
    AutostartDirs(security::AutostartAudit),
    SystemdUserServices(security::SystemdUserServices),
    SensorTemperatures(temperature::SensorTemperatures),
    ManualInstalls(security::ManualInstalls),
}

/// Route raw probe text to its parser. Pure and infallible; empty input
/// yields the record's empty form.
pub fn parse_probe(probe: ProbeId, text: &str) -> ProbeRecord {
    match probe {
        ProbeId::CoreCount => ProbeRecord::CoreCount(cpu::parse_core_count(text)),
        ProbeId::CpuUsage => ProbeRecord::CpuUsage(cpu::parse_cpu_usage(text)),
        ProbeId::CpuStats => ProbeRecord::CpuStats(cpu::parse_cpu_stats(text)),
        ProbeId::CpuUtilization => ProbeRecord::CpuUtilization(cpu::parse_cpu_utilization(text)),
        ProbeId::LoadAverage => ProbeRecord::LoadAverage(cpu::parse_load_average(text)),
        ProbeId::HardwareInfo => ProbeRecord::HardwareInfo(cpu::parse_hardware_info(text)),
        ProbeId::Uptime => ProbeRecord::Uptime(cpu::parse_uptime(text)),
        ProbeId::Jiffies => ProbeRecord::Jiffies(cpu::parse_jiffies(text)),
        ProbeId::TotalCpuTime => ProbeRecord::TotalCpuTime(cpu::parse_total_cpu_time(text)),
        ProbeId::OsRelease => ProbeRecord::OsRelease(osinfo::parse_os_release(text)),
        ProbeId::DistributionInfo => {
            ProbeRecord::DistributionInfo(osinfo::parse_distribution_info(text))
        }
        ProbeId::KernelDetails => ProbeRecord::KernelDetails(osinfo::parse_kernel_details(text)),
        ProbeId::LibraryVersions => {
            ProbeRecord::LibraryVersions(osinfo::parse_library_versions(text))
        }
        ProbeId::SecurityInfo => ProbeRecord::SecurityInfo(osinfo::parse_security_info(text)),
        ProbeId::SystemLimits => ProbeRecord::SystemLimits(osinfo::parse_system_limits(text)),
        ProbeId::UnameInfo => ProbeRecord::UnameInfo(osinfo::parse_uname_info(text)),
        ProbeId::PackageManagers => {
            ProbeRecord::PackageManagers(packages::parse_package_managers(text))
        }
        ProbeId::StorageDevices => {
            ProbeRecord::StorageDevices(storage::parse_storage_devices(text))
        }
        ProbeId::TemperatureDevices => {
            ProbeRecord::TemperatureDevices(storage::parse_temperature_devices(text))
        }
        ProbeId::SmartData => ProbeRecord::SmartData(smart::parse_smart_data(text)),
        ProbeId::ProcessSnapshot => {
            ProbeRecord::ProcessSnapshot(process_tree::parse_process_snapshot(text))
        }
        ProbeId::FirewallStatus => {
            ProbeRecord::FirewallStatus(security::parse_firewall_status(text))
        }
        ProbeId::LoggedInUsers => ProbeRecord::LoggedInUsers(security::parse_logged_in_users(text)),
        ProbeId::AutostartDirs => ProbeRecord::AutostartDirs(security::parse_autostart_dirs(text)),
        ProbeId::SystemdUserServices => {
            ProbeRecord::SystemdUserServices(security::parse_systemd_user_services(text))
        }
        ProbeId::SensorTemperatures => {
            ProbeRecord::SensorTemperatures(temperature::parse_sensor_temperatures(text))
        }
        ProbeId::ManualInstalls => ProbeRecord::ManualInstalls(security::parse_manual_installs(text)),
    }
}

/// A probe that produced no record, with the failure it settled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub message: String,
    pub category: ErrorCategory,
    pub recoverable: bool,
}

impl From<&Error> for ProbeFailure {
    fn from(err: &Error) -> Self {
        Self {
            message: err.to_string(),
            category: err.category(),
            recoverable: err.is_recoverable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub probes_attempted: usize,
    pub probes_parsed: usize,
    pub probes_failed: usize,
}

/// Aggregated best-effort report across all attempted probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub metadata: ReportMetadata,
    pub records: BTreeMap<ProbeId, ProbeRecord>,
    pub failures: BTreeMap<ProbeId, ProbeFailure>,
}

impl ProbeReport {
    /// True when no probe produced a record.
    pub fn all_failed(&self) -> bool {
        self.records.is_empty() && !self.failures.is_empty()
    }
}

/// Merge settled per-probe results. Each probe succeeds or fails on its
/// own; the report always covers every attempted probe.
pub fn aggregate<I>(results: I) -> ProbeReport
where
    I: IntoIterator<Item = (ProbeId, Result<String, Error>)>,
{
    let mut records = BTreeMap::new();
    let mut failures = BTreeMap::new();
    for (probe, result) in results {
        match result {
            Ok(text) => {
                debug!(probe = %probe, bytes = text.len(), "parsing probe output");
                records.insert(probe, parse_probe(probe, &text));
            }
            Err(err) => {
                warn!(probe = %probe, error = %err, "probe failed");
                failures.insert(probe, ProbeFailure::from(&err));
            }
        }
    }
    ProbeReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            probes_attempted: records.len() + failures.len(),
            probes_parsed: records.len(),
            probes_failed: failures.len(),
        },
        records,
        failures,
    }
}
