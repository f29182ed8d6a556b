//! Parser for per-sensor temperature readings.

use serde::{Deserialize, Serialize};

use super::extract::lenient_f64;
use super::primitives::split_key_value;

/// One temperature reading from a named sensor or device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub device_name: String,
    pub value: f64,
    pub unit: String,
}

/// Build a reading from a sensor name and its raw value text.
/// `N/A` and unparseable values yield None.
pub fn parse_reading(name: &str, raw_value: &str) -> Option<TemperatureReading> {
    let value = lenient_f64(raw_value)?;
    Some(TemperatureReading {
        device_name: name.to_string(),
        value,
        unit: "°C".to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTemperatures {
    pub readings: Vec<TemperatureReading>,
}

/// Parse `<Sensor> Temperature: <v>°C` lines in source order.
///
/// The sensor name is the text before the word "Temperature". Sensors
/// reporting `N/A` are skipped, not recorded as zero.
pub fn parse_sensor_temperatures(text: &str) -> SensorTemperatures {
    let mut readings = Vec::new();
    for line in text.lines() {
        let Some((key, value)) = split_key_value(line, ':') else {
            continue;
        };
        let Some(name) = key.strip_suffix("Temperature") else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if let Some(reading) = parse_reading(name, value) {
            readings.push(reading);
        }
    }
    SensorTemperatures { readings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_readings_in_order() {
        let text = "\
CPU Temperature: 48.0°C
GPU Temperature: 41.5°C
VRM Temperature: N/A
Chipset Temperature: 39.0°C
";
        let parsed = parse_sensor_temperatures(text);
        let names: Vec<&str> = parsed.readings.iter().map(|r| r.device_name.as_str()).collect();
        assert_eq!(names, vec!["CPU", "GPU", "Chipset"]);
        assert_eq!(parsed.readings[0].value, 48.0);
        assert_eq!(parsed.readings[0].unit, "°C");
    }

    #[test]
    fn test_non_temperature_lines_ignored() {
        let parsed = parse_sensor_temperatures("Fan Speed: 1200 RPM\nplain text");
        assert!(parsed.readings.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_sensor_temperatures(""), SensorTemperatures::default());
    }
}
