//! Parsers for storage device detection probes.

use serde::{Deserialize, Serialize};

use super::temperature::{parse_reading, TemperatureReading};

/// Device bus type inferred from the device path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Nvme,
    Sata,
    Ide,
    Unknown,
}

impl DeviceType {
    fn from_path(path: &str) -> Self {
        if path.contains("nvme") {
            DeviceType::Nvme
        } else if path.contains("sd") {
            DeviceType::Sata
        } else if path.contains("hd") {
            DeviceType::Ide
        } else {
            DeviceType::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDeviceRecord {
    pub path: String,
    pub device_type: DeviceType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageDevices {
    pub devices: Vec<StorageDeviceRecord>,
}

/// Parse `Detected storage device: <path>` lines. Lines with an empty
/// path and all other text are ignored.
pub fn parse_storage_devices(text: &str) -> StorageDevices {
    let mut devices = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(path) = trimmed.strip_prefix("Detected storage device:") else {
            continue;
        };
        let path = path.trim();
        if path.is_empty() {
            continue;
        }
        devices.push(StorageDeviceRecord {
            path: path.to_string(),
            device_type: DeviceType::from_path(path),
        });
    }
    StorageDevices { devices }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDevices {
    pub devices: Vec<TemperatureReading>,
}

/// Parse `Storage Device Name: <name> Temperature: <v>°C` lines.
pub fn parse_temperature_devices(text: &str) -> TemperatureDevices {
    let mut devices = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("Storage Device Name:") else {
            continue;
        };
        let Some(idx) = rest.find("Temperature:") else {
            continue;
        };
        let name = rest[..idx].trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            continue;
        }
        if let Some(reading) = parse_reading(name, &rest[idx + "Temperature:".len()..]) {
            devices.push(reading);
        }
    }
    TemperatureDevices { devices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_device_types() {
        let text = "\
Scanning block devices...
Detected storage device: /dev/nvme0n1
Detected storage device: /dev/sda
Detected storage device: /dev/hdb
Detected storage device: /dev/mmcblk0
Detected storage device:
";
        let parsed = parse_storage_devices(text);
        assert_eq!(parsed.devices.len(), 4);
        assert_eq!(parsed.devices[0].device_type, DeviceType::Nvme);
        assert_eq!(parsed.devices[1].device_type, DeviceType::Sata);
        assert_eq!(parsed.devices[2].device_type, DeviceType::Ide);
        assert_eq!(parsed.devices[3].device_type, DeviceType::Unknown);
    }

    #[test]
    fn test_temperature_devices() {
        let text = "\
Storage Device Name: nvme0 Temperature: 36.5°C
Storage Device Name: sda Temperature: N/A
unrelated line
";
        let parsed = parse_temperature_devices(text);
        assert_eq!(parsed.devices.len(), 1);
        assert_eq!(parsed.devices[0].device_name, "nvme0");
        assert_eq!(parsed.devices[0].value, 36.5);
        assert_eq!(parsed.devices[0].unit, "°C");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_storage_devices(""), StorageDevices::default());
        assert_eq!(parse_temperature_devices(""), TemperatureDevices::default());
    }
}
