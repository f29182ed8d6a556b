//! Scalar and table extractors over blocks of probe text.
//!
//! Numeric parse failures yield None, never an error. Unit suffixes
//! (`%`, `°C`, `seconds`, `jiffies`) are tolerated and stripped.

use super::primitives::split_key_value;

/// Find the first line labeled `label:` and return its trimmed value.
pub fn labeled_value<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let (key, value) = split_key_value(line, ':')?;
        (key == label).then_some(value)
    })
}

/// Labeled floating-point field. Absent when missing or unparseable.
pub fn labeled_f64(text: &str, label: &str) -> Option<f64> {
    labeled_value(text, label).and_then(lenient_f64)
}

/// Labeled unsigned-integer field. Absent when missing or unparseable.
pub fn labeled_u64(text: &str, label: &str) -> Option<u64> {
    labeled_value(text, label).and_then(lenient_u64)
}

/// Parse a float from the leading numeric token, tolerating unit suffixes.
pub fn lenient_f64(value: &str) -> Option<f64> {
    numeric_token(value)?.parse().ok()
}

/// Parse an unsigned integer from the leading numeric token.
pub fn lenient_u64(value: &str) -> Option<u64> {
    let token = numeric_token(value)?;
    // "17.0" style values still count as integers when whole.
    if let Ok(n) = token.parse::<u64>() {
        return Some(n);
    }
    let f: f64 = token.parse().ok()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

/// Leading numeric token of a value, units stripped.
///
/// Takes the first whitespace-delimited token, then drops a trailing unit
/// (`%`, `°C`, `C`) glued to the digits. Unit words after the number
/// ("seconds", "jiffies") fall away with the token split.
fn numeric_token(value: &str) -> Option<&str> {
    let token = value.split_whitespace().next()?;
    let token = token
        .strip_suffix('%')
        .or_else(|| token.strip_suffix("°C"))
        .or_else(|| token.strip_suffix('C'))
        .unwrap_or(token);
    let token = token.trim();
    (!token.is_empty() && token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+'))
        .then_some(token)
}

/// CPU usage percentage from sampled probe output.
///
/// The probe prints two successive "CPU Usage: X%" measurements, a cheap
/// initial estimate followed by a settled one. The second is authoritative;
/// when only one exists, it is used.
pub fn cpu_usage_percent(text: &str) -> Option<f64> {
    let mut first = None;
    let mut second = None;
    for line in text.lines() {
        let Some((key, value)) = split_key_value(line, ':') else {
            continue;
        };
        if key != "CPU Usage" {
            continue;
        }
        let Some(v) = lenient_f64(value) else {
            continue;
        };
        if first.is_none() {
            first = Some(v);
        } else if second.is_none() {
            second = Some(v);
        }
    }
    second.or(first)
}

/// Decompose a `name=value name=value ...` statistics line by field name.
///
/// Tokens that are not `name=integer` are skipped, so trailing fields may
/// be missing without shifting the ones that are present.
pub fn stat_fields(line: &str) -> Vec<(&str, u64)> {
    line.split_whitespace()
        .filter_map(|token| {
            let (name, value) = split_key_value(token, '=')?;
            Some((name, value.parse().ok()?))
        })
        .collect()
}

/// Look up one named field in a `name=value` statistics line.
pub fn stat_field(line: &str, name: &str) -> Option<u64> {
    stat_fields(line)
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_value_first_match() {
        let text = "Kernel Release: 6.1.0\nKernel Release: other";
        assert_eq!(labeled_value(text, "Kernel Release"), Some("6.1.0"));
    }

    #[test]
    fn test_labeled_f64_units() {
        assert_eq!(labeled_f64("RAM: 42.5%", "RAM"), Some(42.5));
        assert_eq!(labeled_f64("Temperature: 36°C", "Temperature"), Some(36.0));
        assert_eq!(labeled_f64("Uptime: 88123.4 seconds", "Uptime"), Some(88123.4));
        assert_eq!(labeled_f64("Total: 123456 jiffies", "Total"), Some(123456.0));
    }

    #[test]
    fn test_numeric_failure_is_absent() {
        assert_eq!(labeled_f64("CPU Usage: N/A", "CPU Usage"), None);
        assert_eq!(labeled_u64("Max PID: unlimited", "Max PID"), None);
    }

    #[test]
    fn test_cpu_usage_prefers_second_occurrence() {
        let text = "CPU Usage: 3.0%\nCPU Usage: 17.5%";
        assert_eq!(cpu_usage_percent(text), Some(17.5));
        // A third measurement never displaces the second.
        let text = "CPU Usage: 3.0%\nCPU Usage: 17.5%\nCPU Usage: 99.0%";
        assert_eq!(cpu_usage_percent(text), Some(17.5));
    }

    #[test]
    fn test_cpu_usage_single_occurrence() {
        assert_eq!(cpu_usage_percent("CPU Usage: 12.3%"), Some(12.3));
        assert_eq!(cpu_usage_percent("no usage here"), None);
    }

    #[test]
    fn test_stat_fields_tolerates_missing_trailing() {
        let line = "user=100 nice=2 system=30 idle=4000 iowait=5";
        let fields = stat_fields(line);
        assert_eq!(fields.len(), 5);
        assert_eq!(stat_field(line, "system"), Some(30));
        assert_eq!(stat_field(line, "steal"), None);
    }

    #[test]
    fn test_stat_fields_skips_malformed_tokens() {
        let fields = stat_fields("cpu0 user=1 garbage nice=x system=3");
        assert_eq!(fields, vec![("user", 1), ("system", 3)]);
    }
}
