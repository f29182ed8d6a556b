//! Parser for SMART/NVMe diagnostic dumps.
//!
//! The dump concatenates one report per device. A device header starts a
//! fresh accumulator and flushes the previous one; within a device, a
//! section state machine routes lines to key-value maps, fixed-position
//! table rows, or the verbatim error log.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::primitives::{split_key_value, KeyValueBlock};

/// Active section within one device report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    None,
    Information,
    SmartData,
    PowerStates,
    LbaSizes,
    ErrorLog,
}

/// Typed subset of SMART data fields. Values stay as source strings since
/// units vary by vendor ("36 Celsius", "1,234,567 [631 GB]").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartHealth {
    pub overall_status: Option<String>,
    pub temperature: Option<String>,
    pub available_spare: Option<String>,
    pub available_spare_threshold: Option<String>,
    pub percentage_used: Option<String>,
    pub power_on_hours: Option<String>,
    pub power_cycles: Option<String>,
    pub data_units_read: Option<String>,
    pub data_units_written: Option<String>,
    pub host_read_commands: Option<String>,
    pub host_write_commands: Option<String>,
    pub unsafe_shutdowns: Option<String>,
    pub media_errors: Option<String>,
    pub critical_warning: Option<String>,
}

/// One row of the NVMe supported-power-states table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStateRow {
    pub state: String,
    pub operation: String,
    pub max_power: String,
    pub active: String,
    pub idle: String,
    pub rl: String,
    pub rt: String,
    pub wl: String,
    pub wt: String,
    pub entry_latency: String,
    pub exit_latency: String,
}

/// One row of the supported-LBA-sizes table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbaSizeRow {
    pub id: String,
    pub format: String,
    pub data: String,
    pub metadata: String,
    pub relative_performance: String,
}

/// Accumulated report for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartDeviceRecord {
    pub device_path: String,
    pub information: KeyValueBlock,
    pub smart_attributes: KeyValueBlock,
    pub all_fields: KeyValueBlock,
    pub health: SmartHealth,
    pub power_states: Vec<PowerStateRow>,
    pub supported_lba_sizes: Vec<LbaSizeRow>,
    pub error_log: Vec<String>,
    pub temperature_sensors: KeyValueBlock,
}

impl SmartDeviceRecord {
    fn new(device_path: &str) -> Self {
        Self {
            device_path: device_path.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartData {
    /// One record per distinct device path, keyed by path.
    pub devices: BTreeMap<String, SmartDeviceRecord>,
}

/// Parse a multi-device SMART dump.
pub fn parse_smart_data(text: &str) -> SmartData {
    let device_header = Regex::new(r"S\.M\.A\.R\.T\. Data for (/dev/\w+)").unwrap();
    let table_row = Regex::new(r"^\d+\s+[+-]").unwrap();

    let mut devices = BTreeMap::new();
    let mut current: Option<SmartDeviceRecord> = None;
    let mut section = Section::None;

    for line in text.lines() {
        let trimmed = line.trim();

        // Device boundaries are checked before section transitions: a new
        // header flushes the prior accumulator and resets section state.
        if let Some(caps) = device_header.captures(trimmed) {
            if let Some(done) = current.take() {
                devices.insert(done.device_path.clone(), done);
            }
            current = Some(SmartDeviceRecord::new(&caps[1]));
            section = Section::None;
            continue;
        }

        if trimmed.contains("=== START OF INFORMATION SECTION ===") {
            section = Section::Information;
            continue;
        }
        if trimmed.contains("=== START OF SMART DATA SECTION ===") {
            section = Section::SmartData;
            continue;
        }
        if trimmed.contains("Supported Power States") {
            section = Section::PowerStates;
            continue;
        }
        if trimmed.contains("Supported LBA Sizes (NSID") {
            section = Section::LbaSizes;
            continue;
        }
        if trimmed.contains("Error Information (NVMe Log") {
            section = Section::ErrorLog;
            continue;
        }
        if trimmed.contains("===") {
            // Unknown banner, fall back to no section.
            section = Section::None;
            continue;
        }

        let Some(device) = current.as_mut() else {
            continue;
        };

        match section {
            Section::PowerStates => {
                if table_row.is_match(trimmed) {
                    let parts: Vec<&str> = trimmed.split_whitespace().collect();
                    if parts.len() >= 10 {
                        device.power_states.push(PowerStateRow {
                            state: parts[0].to_string(),
                            operation: parts[1].to_string(),
                            max_power: parts[2].to_string(),
                            active: parts[3].to_string(),
                            idle: parts[4].to_string(),
                            rl: parts[5].to_string(),
                            rt: parts[6].to_string(),
                            wl: parts[7].to_string(),
                            wt: parts[8].to_string(),
                            entry_latency: parts[9].to_string(),
                            exit_latency: parts.get(10).copied().unwrap_or("").to_string(),
                        });
                    }
                }
            }
            Section::LbaSizes => {
                if table_row.is_match(trimmed) {
                    let parts: Vec<&str> = trimmed.split_whitespace().collect();
                    if parts.len() >= 4 {
                        device.supported_lba_sizes.push(LbaSizeRow {
                            id: parts[0].to_string(),
                            format: parts[1].to_string(),
                            data: parts[2].to_string(),
                            metadata: parts[3].to_string(),
                            relative_performance: parts.get(4).copied().unwrap_or("").to_string(),
                        });
                    }
                }
            }
            Section::ErrorLog => {
                if !trimmed.is_empty() && trimmed != "No Errors Logged" {
                    device.error_log.push(trimmed.to_string());
                }
            }
            Section::None | Section::Information | Section::SmartData => {
                let Some((key, value)) = split_key_value(trimmed, ':') else {
                    continue;
                };
                device.all_fields.insert(key, value);
                match section {
                    Section::Information => device.information.insert(key, value),
                    Section::SmartData => {
                        device.smart_attributes.insert(key, value);
                        promote_health(device, key, value);
                    }
                    _ => {}
                }
            }
        }
    }

    if let Some(done) = current.take() {
        devices.insert(done.device_path.clone(), done);
    }
    SmartData { devices }
}

/// Promote well-known SMART-data keys into the typed health summary.
fn promote_health(device: &mut SmartDeviceRecord, key: &str, value: &str) {
    let value = || Some(value.to_string());
    if key.contains("SMART overall-health") {
        device.health.overall_status = value();
    } else if key == "Temperature" {
        device.health.temperature = value();
    } else if key == "Available Spare" {
        device.health.available_spare = value();
    } else if key == "Available Spare Threshold" {
        device.health.available_spare_threshold = value();
    } else if key == "Percentage Used" {
        device.health.percentage_used = value();
    } else if key == "Power On Hours" {
        device.health.power_on_hours = value();
    } else if key == "Power Cycles" {
        device.health.power_cycles = value();
    } else if key == "Data Units Read" {
        device.health.data_units_read = value();
    } else if key == "Data Units Written" {
        device.health.data_units_written = value();
    } else if key == "Host Read Commands" {
        device.health.host_read_commands = value();
    } else if key == "Host Write Commands" {
        device.health.host_write_commands = value();
    } else if key == "Unsafe Shutdowns" {
        device.health.unsafe_shutdowns = value();
    } else if key == "Media and Data Integrity Errors" {
        device.health.media_errors = value();
    } else if key == "Critical Warning" {
        device.health.critical_warning = value();
    } else if key.contains("Temperature Sensor") {
        device.temperature_sensors.insert(key, value().unwrap_or_default());
    }
}
