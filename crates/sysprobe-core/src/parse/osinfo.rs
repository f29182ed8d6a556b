//! Parsers for OS identity and platform information probes.

use serde::{Deserialize, Serialize};

use super::extract::{labeled_u64, labeled_value};
use super::primitives::{split_key_value, KeyValueBlock};

/// /etc/os-release contents. Well-known keys are promoted to fields and
/// the complete block is kept for anything distribution-specific.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsRelease {
    pub pretty_name: Option<String>,
    pub name: Option<String>,
    pub version_id: Option<String>,
    pub version: Option<String>,
    pub version_codename: Option<String>,
    pub id: Option<String>,
    pub home_url: Option<String>,
    pub support_url: Option<String>,
    pub bug_report_url: Option<String>,
    pub fields: KeyValueBlock,
}

pub fn parse_os_release(text: &str) -> OsRelease {
    let mut fields = KeyValueBlock::new();
    for line in text.lines() {
        if let Some((key, value)) = split_key_value(line, '=') {
            fields.insert(key, value);
        }
    }
    let owned = |key: &str| fields.get(key).map(str::to_string);
    OsRelease {
        pretty_name: owned("PRETTY_NAME"),
        name: owned("NAME"),
        version_id: owned("VERSION_ID"),
        version: owned("VERSION"),
        version_codename: owned("VERSION_CODENAME"),
        id: owned("ID"),
        home_url: owned("HOME_URL"),
        support_url: owned("SUPPORT_URL"),
        bug_report_url: owned("BUG_REPORT_URL"),
        fields,
    }
}

/// Distribution summary. The probe emits exactly four positional lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionInfo {
    pub package_manager: String,
    pub init_system: String,
    pub debian_version: String,
    pub systemd_version: String,
}

pub fn parse_distribution_info(text: &str) -> DistributionInfo {
    let trimmed = text.trim().trim_matches('"').trim();
    let mut lines = trimmed.lines().map(|l| l.trim().to_string());
    DistributionInfo {
        package_manager: lines.next().unwrap_or_default(),
        init_system: lines.next().unwrap_or_default(),
        debian_version: lines.next().unwrap_or_default(),
        systemd_version: lines.next().unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelDetails {
    pub full_version: Option<String>,
    pub command_line: Option<String>,
    pub architecture: Option<String>,
}

pub fn parse_kernel_details(text: &str) -> KernelDetails {
    let owned = |label: &str| labeled_value(text, label).map(str::to_string);
    KernelDetails {
        full_version: owned("Full Kernel Version"),
        command_line: owned("Kernel Command Line"),
        architecture: owned("Kernel Architecture"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryVersions {
    pub glibc_version: Option<String>,
    pub glibc_release: Option<String>,
    pub using_glibc: Option<String>,
    pub gcc_version: Option<String>,
    pub c_standard: Option<String>,
}

pub fn parse_library_versions(text: &str) -> LibraryVersions {
    let owned = |label: &str| labeled_value(text, label).map(str::to_string);
    LibraryVersions {
        glibc_version: owned("GLIBC Version"),
        glibc_release: owned("GLIBC Release"),
        using_glibc: owned("Using GLIBC"),
        gcc_version: owned("GCC Version"),
        c_standard: owned("C Standard"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub security_updates_configured: bool,
    pub security_modules: Vec<String>,
}

pub fn parse_security_info(text: &str) -> SecurityInfo {
    SecurityInfo {
        security_updates_configured: labeled_value(text, "Security updates configured")
            == Some("Yes"),
        security_modules: labeled_value(text, "Security Modules")
            .map(|v| {
                v.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Kernel limits. Counts default to zero when unparseable; zero is the
/// documented recovery value for this record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLimits {
    pub max_pid: u64,
    pub max_threads: u64,
    pub max_ptys: u64,
}

pub fn parse_system_limits(text: &str) -> SystemLimits {
    SystemLimits {
        max_pid: labeled_u64(text, "Maximum PID").unwrap_or(0),
        max_threads: labeled_u64(text, "Maximum threads").unwrap_or(0),
        max_ptys: labeled_u64(text, "Maximum PTYs").unwrap_or(0),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnameInfo {
    pub os: Option<String>,
    pub hostname: Option<String>,
    pub kernel_release: Option<String>,
    pub kernel_version: Option<String>,
    pub architecture: Option<String>,
}

pub fn parse_uname_info(text: &str) -> UnameInfo {
    let owned = |label: &str| labeled_value(text, label).map(str::to_string);
    UnameInfo {
        os: owned("OS"),
        hostname: owned("Hostname"),
        kernel_release: owned("Kernel Release"),
        kernel_version: owned("Kernel Version"),
        architecture: owned("Architecture"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OS_RELEASE: &str = r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
VERSION_ID="12"
VERSION="12 (bookworm)"
VERSION_CODENAME=bookworm
ID=debian
HOME_URL="https://www.debian.org/"
SUPPORT_URL="https://www.debian.org/support"
BUG_REPORT_URL="https://bugs.debian.org/"
"#;

    #[test]
    fn test_os_release_promoted_fields() {
        let os = parse_os_release(OS_RELEASE);
        assert_eq!(os.pretty_name.as_deref(), Some("Debian GNU/Linux 12 (bookworm)"));
        assert_eq!(os.version_codename.as_deref(), Some("bookworm"));
        assert_eq!(os.id.as_deref(), Some("debian"));
        // The raw block keeps everything, quotes stripped.
        assert_eq!(os.fields.get("SUPPORT_URL"), Some("https://www.debian.org/support"));
        assert_eq!(os.fields.len(), 9);
    }

    #[test]
    fn test_distribution_info_positional() {
        let info = parse_distribution_info("\"apt\ninit: systemd\n12.5\n252.22-1~deb12u1\"");
        assert_eq!(info.package_manager, "apt");
        assert_eq!(info.init_system, "init: systemd");
        assert_eq!(info.debian_version, "12.5");
        assert_eq!(info.systemd_version, "252.22-1~deb12u1");
    }

    #[test]
    fn test_distribution_info_short_input() {
        let info = parse_distribution_info("apt\n");
        assert_eq!(info.package_manager, "apt");
        assert_eq!(info.init_system, "");
    }

    #[test]
    fn test_kernel_details() {
        let text = "\
Full Kernel Version: #1 SMP PREEMPT_DYNAMIC Debian 6.1.76-1
Kernel Command Line: BOOT_IMAGE=/boot/vmlinuz-6.1.0-18-amd64 root=/dev/nvme0n1p2 ro quiet
Kernel Architecture: x86_64
";
        let kernel = parse_kernel_details(text);
        assert_eq!(kernel.architecture.as_deref(), Some("x86_64"));
        assert!(kernel.command_line.as_deref().unwrap().contains("BOOT_IMAGE"));
    }

    #[test]
    fn test_security_info() {
        let text = "Security updates configured: Yes\nSecurity Modules: lockdown, capability, apparmor";
        let sec = parse_security_info(text);
        assert!(sec.security_updates_configured);
        assert_eq!(sec.security_modules, vec!["lockdown", "capability", "apparmor"]);

        let sec = parse_security_info("Security updates configured: No");
        assert!(!sec.security_updates_configured);
        assert!(sec.security_modules.is_empty());
    }

    #[test]
    fn test_system_limits_zero_default() {
        let limits = parse_system_limits("Maximum PID: 4194304\nMaximum threads: unknown");
        assert_eq!(limits.max_pid, 4194304);
        assert_eq!(limits.max_threads, 0);
        assert_eq!(limits.max_ptys, 0);
    }

    #[test]
    fn test_uname_info() {
        let text = "\
OS: Linux
Hostname: buildbox
Kernel Release: 6.1.0-18-amd64
Kernel Version: #1 SMP PREEMPT_DYNAMIC
Architecture: x86_64
";
        let uname = parse_uname_info(text);
        assert_eq!(uname.os.as_deref(), Some("Linux"));
        assert_eq!(uname.kernel_release.as_deref(), Some("6.1.0-18-amd64"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_os_release(""), OsRelease::default());
        assert_eq!(parse_uname_info(""), UnameInfo::default());
        assert_eq!(parse_system_limits(""), SystemLimits::default());
    }
}
