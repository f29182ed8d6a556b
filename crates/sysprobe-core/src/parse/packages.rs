//! Package manager detection and installed-package listing parser.
//!
//! The probe runs every known manager in sequence and interleaves its
//! detection line with that manager's own listing output. The not-found
//! check shares a prefix with the generic detection line and must be
//! evaluated first.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Managers the probe knows how to invoke.
pub const KNOWN_MANAGERS: &[&str] = &[
    "apt", "yum", "dnf", "pacman", "zypper", "brew", "choco", "winget",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub version: String,
    pub status: String,
    pub repository: String,
    pub architecture: String,
    pub flags: Vec<String>,
    /// Original line, kept only for fallback entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManagerEntry {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub packages: BTreeMap<String, PackageInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManagers {
    pub managers: BTreeMap<String, PackageManagerEntry>,
}

/// Parse the combined detection-plus-listing transcript.
pub fn parse_package_managers(text: &str) -> PackageManagers {
    let alternation = KNOWN_MANAGERS.join("|");
    let not_found = Regex::new(&format!(r"({alternation}) detected: sh: .*not found")).unwrap();
    let detected = Regex::new(&format!(r"({alternation}) detected:")).unwrap();
    let package_line = Regex::new(
        r"^\s*([^/\s]+)/([^,\s]+)(?:,(\S+))?\s+(\S+)\s+(\S+)(?:\s+\[([^\]]+)\])?",
    )
    .unwrap();

    let mut managers: BTreeMap<String, PackageManagerEntry> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        // Shared "<manager> detected:" prefix, so the not-found form is
        // checked before the generic detection.
        if let Some(caps) = not_found.captures(line) {
            let manager = caps[1].to_string();
            managers.insert(
                manager.clone(),
                PackageManagerEntry {
                    available: false,
                    version: None,
                    error: Some("Command not found".to_string()),
                    packages: BTreeMap::new(),
                },
            );
            current = Some(manager);
            continue;
        }
        if let Some(caps) = detected.captures(line) {
            let manager = caps[1].to_string();
            let version = line
                .split_once("detected:")
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            managers.insert(
                manager.clone(),
                PackageManagerEntry {
                    available: true,
                    version,
                    error: None,
                    packages: BTreeMap::new(),
                },
            );
            current = Some(manager);
            continue;
        }

        let Some(entry) = current.as_ref().and_then(|m| managers.get_mut(m)) else {
            continue;
        };
        if !entry.available {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || is_noise(line) {
            continue;
        }

        if let Some(caps) = package_line.captures(line) {
            let name = caps[1].trim().to_string();
            entry.packages.insert(
                name,
                PackageInfo {
                    version: caps[4].trim().to_string(),
                    status: caps.get(3).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
                    repository: caps[2].trim().to_string(),
                    architecture: caps[5].trim().to_string(),
                    flags: caps
                        .get(6)
                        .map(|m| m.as_str().split(',').map(|f| f.trim().to_string()).collect())
                        .unwrap_or_default(),
                    raw: None,
                },
            );
        } else {
            // No input line for an available manager is dropped: keep it
            // as a fallback entry with unknown fields.
            let fallback_name = trimmed
                .split('/')
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(trimmed)
                .to_string();
            entry.packages.insert(
                fallback_name,
                PackageInfo {
                    version: "unknown".to_string(),
                    status: "unknown".to_string(),
                    repository: "unknown".to_string(),
                    architecture: "unknown".to_string(),
                    flags: Vec::new(),
                    raw: Some(trimmed.to_string()),
                },
            );
        }
    }
    PackageManagers { managers }
}

fn is_noise(line: &str) -> bool {
    line.contains("WARNING:")
        || line.contains("Listing...")
        || line.contains("Installed packages for")
        || (line.contains("sh: ") && line.contains("not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_and_package_line() {
        let text = "\
apt detected: 2.4.5
Listing...
curl/stable 7.88.1-10 amd64 [installed]
";
        let parsed = parse_package_managers(text);
        let apt = &parsed.managers["apt"];
        assert!(apt.available);
        assert_eq!(apt.version.as_deref(), Some("2.4.5"));
        let curl = &apt.packages["curl"];
        assert_eq!(curl.version, "7.88.1-10");
        assert_eq!(curl.status, "");
        assert_eq!(curl.repository, "stable");
        assert_eq!(curl.architecture, "amd64");
        assert_eq!(curl.flags, vec!["installed"]);
        assert!(curl.raw.is_none());
    }

    #[test]
    fn test_status_after_comma() {
        let text = "apt detected: 2.4.5\nvim/stable,now 2:9.0.1378-2 amd64 [installed,automatic]\n";
        let parsed = parse_package_managers(text);
        let vim = &parsed.managers["apt"].packages["vim"];
        assert_eq!(vim.status, "now");
        assert_eq!(vim.version, "2:9.0.1378-2");
        assert_eq!(vim.flags, vec!["installed", "automatic"]);
    }

    #[test]
    fn test_not_found_wins_over_detected() {
        let text = "\
apt detected: 2.4.5
curl/stable 7.88.1-10 amd64 [installed]
yum detected: sh: yum: not found
";
        let parsed = parse_package_managers(text);
        assert!(parsed.managers["apt"].available);
        assert_eq!(parsed.managers["apt"].packages.len(), 1);
        let yum = &parsed.managers["yum"];
        assert!(!yum.available);
        assert_eq!(yum.error.as_deref(), Some("Command not found"));
        assert!(yum.packages.is_empty());
    }

    #[test]
    fn test_lines_after_unavailable_manager_not_misattributed() {
        let text = "\
apt detected: 2.4.5
yum detected: sh: yum: not found
stray output line
";
        let parsed = parse_package_managers(text);
        // The stray line belongs to the unavailable yum block, not apt.
        assert!(parsed.managers["apt"].packages.is_empty());
        assert!(parsed.managers["yum"].packages.is_empty());
    }

    #[test]
    fn test_fallback_entry_keeps_raw_line() {
        let text = "apt detected: 2.4.5\nsome unstructured listing line\n";
        let parsed = parse_package_managers(text);
        let apt = &parsed.managers["apt"];
        let entry = &apt.packages["some unstructured listing line"];
        assert_eq!(entry.version, "unknown");
        assert_eq!(entry.raw.as_deref(), Some("some unstructured listing line"));
    }

    #[test]
    fn test_noise_lines_skipped() {
        let text = "\
apt detected: 2.4.5
WARNING: apt does not have a stable CLI interface.
Listing...
Installed packages for apt:
";
        let parsed = parse_package_managers(text);
        assert!(parsed.managers["apt"].packages.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_package_managers(""), PackageManagers::default());
    }
}
