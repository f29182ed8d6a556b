//! Parsers for the CPU and timing probe family.

use serde::{Deserialize, Serialize};

use super::extract::{cpu_usage_percent, labeled_f64, labeled_u64, labeled_value, stat_field};
use super::primitives::split_key_value;

/// Total CPU core count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreCount {
    pub total_cores: Option<u64>,
}

pub fn parse_core_count(text: &str) -> CoreCount {
    CoreCount {
        total_cores: labeled_u64(text, "Total cores"),
    }
}

/// Sampled CPU usage. The probe prints two measurements; the second wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    pub usage_percent: Option<f64>,
}

pub fn parse_cpu_usage(text: &str) -> CpuUsage {
    CpuUsage {
        usage_percent: cpu_usage_percent(text),
    }
}

/// One per-CPU statistics line, jiffies by scheduling mode.
///
/// Trailing fields may be absent on older kernels; each is independently
/// optional rather than positionally required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuStatLine {
    pub cpu_name: String,
    pub user: Option<u64>,
    pub nice: Option<u64>,
    pub system: Option<u64>,
    pub idle: Option<u64>,
    pub iowait: Option<u64>,
    pub irq: Option<u64>,
    pub softirq: Option<u64>,
    pub steal: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuStats {
    pub cpus: Vec<CpuStatLine>,
}

/// Parse `cpuN: user=A nice=B ...` lines. Lines without any recognized
/// stat field are skipped.
pub fn parse_cpu_stats(text: &str) -> CpuStats {
    let mut cpus = Vec::new();
    for line in text.lines() {
        let Some((name, stats)) = split_key_value(line, ':') else {
            continue;
        };
        let parsed = CpuStatLine {
            cpu_name: name.to_string(),
            user: stat_field(stats, "user"),
            nice: stat_field(stats, "nice"),
            system: stat_field(stats, "system"),
            idle: stat_field(stats, "idle"),
            iowait: stat_field(stats, "iowait"),
            irq: stat_field(stats, "irq"),
            softirq: stat_field(stats, "softirq"),
            steal: stat_field(stats, "steal"),
        };
        if parsed.user.is_some() || parsed.idle.is_some() {
            cpus.push(parsed);
        }
    }
    CpuStats { cpus }
}

/// Instantaneous utilization breakdown with a probe-side timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuUtilization {
    pub timestamp: Option<String>,
    pub user_percent: Option<f64>,
    pub system_percent: Option<f64>,
    pub iowait_percent: Option<f64>,
    pub total_percent: Option<f64>,
}

pub fn parse_cpu_utilization(text: &str) -> CpuUtilization {
    CpuUtilization {
        timestamp: labeled_value(text, "Timestamp")
            .map(|v| v.split_whitespace().next().unwrap_or(v).to_string())
            .filter(|v| !v.is_empty()),
        user_percent: labeled_f64(text, "User"),
        system_percent: labeled_f64(text, "System"),
        iowait_percent: labeled_f64(text, "IOWait"),
        total_percent: labeled_f64(text, "Total"),
    }
}

/// 1/5/15 minute load averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one_minute: Option<f64>,
    pub five_minutes: Option<f64>,
    pub fifteen_minutes: Option<f64>,
}

pub fn parse_load_average(text: &str) -> LoadAverage {
    LoadAverage {
        one_minute: labeled_f64(text, "1 minute"),
        five_minutes: labeled_f64(text, "5 minutes"),
        fifteen_minutes: labeled_f64(text, "15 minutes"),
    }
}

/// System uptime and CPU sleep time, both in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeInfo {
    pub system_uptime_seconds: Option<f64>,
    pub cpu_sleep_seconds: Option<f64>,
}

pub fn parse_uptime(text: &str) -> UptimeInfo {
    UptimeInfo {
        system_uptime_seconds: labeled_f64(text, "System Uptime"),
        cpu_sleep_seconds: labeled_f64(text, "CPU Sleep Time"),
    }
}

/// Total jiffies with a per-mode breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiffiesBreakdown {
    pub total: Option<u64>,
    pub user: Option<u64>,
    pub nice: Option<u64>,
    pub system: Option<u64>,
    pub idle: Option<u64>,
    pub iowait: Option<u64>,
    pub irq: Option<u64>,
    pub softirq: Option<u64>,
    pub steal: Option<u64>,
}

pub fn parse_jiffies(text: &str) -> JiffiesBreakdown {
    JiffiesBreakdown {
        total: labeled_u64(text, "Total Jiffies"),
        user: labeled_u64(text, "User"),
        nice: labeled_u64(text, "Nice"),
        system: labeled_u64(text, "System"),
        idle: labeled_u64(text, "Idle"),
        iowait: labeled_u64(text, "IOWait"),
        irq: labeled_u64(text, "IRQ"),
        softirq: labeled_u64(text, "SoftIRQ"),
        steal: labeled_u64(text, "Steal"),
    }
}

/// Total CPU time in jiffies with per-mode breakdown. Same data as
/// `JiffiesBreakdown` but the probe labels each mode differently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalCpuTime {
    pub total_jiffies: Option<u64>,
    pub user_mode: Option<u64>,
    pub nice_mode: Option<u64>,
    pub system_mode: Option<u64>,
    pub idle_time: Option<u64>,
    pub io_wait: Option<u64>,
    pub irq_time: Option<u64>,
    pub soft_irq: Option<u64>,
    pub steal_time: Option<u64>,
}

pub fn parse_total_cpu_time(text: &str) -> TotalCpuTime {
    TotalCpuTime {
        total_jiffies: labeled_u64(text, "Total CPU time"),
        user_mode: labeled_u64(text, "User mode"),
        nice_mode: labeled_u64(text, "Nice mode"),
        system_mode: labeled_u64(text, "System mode"),
        idle_time: labeled_u64(text, "Idle time"),
        io_wait: labeled_u64(text, "I/O wait"),
        irq_time: labeled_u64(text, "IRQ time"),
        soft_irq: labeled_u64(text, "Soft IRQ"),
        steal_time: labeled_u64(text, "Steal time"),
    }
}

/// hostnamectl plus /proc/cpuinfo summary fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSummary {
    pub hostname: Option<String>,
    pub operating_system: Option<String>,
    pub kernel: Option<String>,
    pub architecture: Option<String>,
    pub hardware_vendor: Option<String>,
    pub hardware_model: Option<String>,
    pub firmware_version: Option<String>,
    pub cpu_model: Option<String>,
    pub cpu_cores: Option<u64>,
    pub cpu_mhz: Option<f64>,
}

pub fn parse_hardware_info(text: &str) -> HardwareSummary {
    let owned = |label: &str| labeled_value(text, label).map(str::to_string);
    HardwareSummary {
        hostname: labeled_value(text, "Static hostname")
            .and_then(|v| v.split_whitespace().next())
            .map(str::to_string),
        operating_system: owned("Operating System"),
        kernel: owned("Kernel"),
        architecture: owned("Architecture"),
        hardware_vendor: owned("Hardware Vendor"),
        hardware_model: owned("Hardware Model"),
        firmware_version: owned("Firmware Version"),
        cpu_model: owned("model name"),
        cpu_cores: labeled_u64(text, "cpu cores"),
        cpu_mhz: labeled_f64(text, "cpu MHz"),
    }
}
