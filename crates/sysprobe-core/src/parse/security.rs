//! Single-pass parsers for the security and inventory probes: firewall
//! status, logged-in sessions, autostart directories, user services.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::primitives::split_key_value;

/// Firewall subsystem states plus the overall status line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallStatus {
    pub iptables: Option<String>,
    pub nftables: Option<String>,
    pub ufw: Option<String>,
    pub overall: Option<String>,
}

pub fn parse_firewall_status(text: &str) -> FirewallStatus {
    let mut status = FirewallStatus::default();
    for line in text.lines() {
        let Some((key, value)) = split_key_value(line, ':') else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let owned = value.to_string();
        if key.contains("iptables") {
            status.iptables.get_or_insert(owned);
        } else if key.contains("nftables") {
            status.nftables.get_or_insert(owned);
        } else if key.contains("ufw") {
            status.ufw.get_or_insert(owned);
        } else if key == "Firewall status" || key == "Status" {
            status.overall.get_or_insert(owned);
        }
    }
    status
}

/// One row of `w`-style session output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user: String,
    pub tty: String,
    pub from: String,
    pub login_time: String,
    pub idle: String,
    pub jcpu: String,
    pub pcpu: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedInUsers {
    pub sessions: Vec<UserSession>,
}

/// Parse session rows. The first non-blank line is the header; rows with
/// fewer than 7 tokens are dropped, remaining tokens join as the command.
pub fn parse_logged_in_users(text: &str) -> LoggedInUsers {
    let mut sessions = Vec::new();
    let mut header_seen = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 7 {
            continue;
        }
        sessions.push(UserSession {
            user: tokens[0].to_string(),
            tty: tokens[1].to_string(),
            from: tokens[2].to_string(),
            login_time: tokens[3].to_string(),
            idle: tokens[4].to_string(),
            jcpu: tokens[5].to_string(),
            pcpu: tokens[6].to_string(),
            command: tokens[7..].join(" "),
        });
    }
    LoggedInUsers { sessions }
}

/// Autostart locations the probe reports on.
pub const AUTOSTART_DIRS: &[&str] = &[
    "/etc/init.d",
    "/etc/rc.local",
    "/etc/xdg/autostart",
    ".config/autostart",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutostartDirectory {
    pub found: bool,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutostartAudit {
    pub directories: BTreeMap<String, AutostartDirectory>,
}

/// Parse the autostart directory audit: `<path>: found|not found` checks
/// and `Contents of <path>:` listings terminated by a blank line.
pub fn parse_autostart_dirs(text: &str) -> AutostartAudit {
    let mut audit = AutostartAudit::default();
    let mut listing: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            listing = None;
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Contents of ") {
            let path = rest.trim_end_matches(':').trim();
            if let Some(known) = known_dir(path) {
                audit
                    .directories
                    .entry(known.to_string())
                    .or_insert_with(|| AutostartDirectory {
                        found: true,
                        entries: Vec::new(),
                    })
                    .found = true;
                listing = Some(known.to_string());
            } else {
                listing = None;
            }
            continue;
        }
        if let Some((key, value)) = split_key_value(trimmed, ':') {
            if let Some(known) = known_dir(key) {
                let found = !value.contains("not found");
                audit.directories.insert(
                    known.to_string(),
                    AutostartDirectory {
                        found,
                        entries: Vec::new(),
                    },
                );
                listing = None;
                continue;
            }
        }
        if let Some(dir) = listing.as_ref() {
            if let Some(entry) = audit.directories.get_mut(dir) {
                entry.entries.push(trimmed.to_string());
            }
        }
    }
    audit
}

fn known_dir(path: &str) -> Option<&'static str> {
    AUTOSTART_DIRS.iter().copied().find(|d| path.contains(d))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub name: String,
    pub load_state: String,
    pub active_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemdUserServices {
    pub services: Vec<ServiceState>,
    /// Names whose load state is "enabled", in source order.
    pub enabled: Vec<String>,
}

/// Parse `name.service load-state active-state` triples.
pub fn parse_systemd_user_services(text: &str) -> SystemdUserServices {
    let mut parsed = SystemdUserServices::default();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 || !tokens[0].ends_with(".service") {
            continue;
        }
        let name = tokens[0].to_string();
        if tokens[1] == "enabled" {
            parsed.enabled.push(name.clone());
        }
        parsed.services.push(ServiceState {
            name,
            load_state: tokens[1].to_string(),
            active_state: tokens[2].to_string(),
        });
    }
    parsed
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualInstallDir {
    pub present: bool,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualInstalls {
    pub locations: BTreeMap<String, ManualInstallDir>,
}

/// Parse the manual-install scan: `Scanning <dir>:` opens a bucket and
/// subsequent non-blank lines are its entries. `(empty)` leaves the bucket
/// present but empty; `not found` marks the directory absent.
pub fn parse_manual_installs(text: &str) -> ManualInstalls {
    let mut parsed = ManualInstalls::default();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Scanning ") {
            let dir = rest.trim_end_matches(':').trim().to_string();
            parsed.locations.insert(
                dir.clone(),
                ManualInstallDir {
                    present: true,
                    entries: Vec::new(),
                },
            );
            current = Some(dir);
            continue;
        }
        let Some(bucket) = current.as_ref().and_then(|d| parsed.locations.get_mut(d)) else {
            continue;
        };
        if trimmed == "(empty)" {
            continue;
        }
        if trimmed.contains("not found") {
            bucket.present = false;
            bucket.entries.clear();
            continue;
        }
        bucket.entries.push(trimmed.to_string());
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firewall_status() {
        let text = "\
Firewall status: active
iptables: 12 rules loaded
nftables: table inet filter present
ufw: inactive
";
        let fw = parse_firewall_status(text);
        assert_eq!(fw.overall.as_deref(), Some("active"));
        assert_eq!(fw.iptables.as_deref(), Some("12 rules loaded"));
        assert_eq!(fw.nftables.as_deref(), Some("table inet filter present"));
        assert_eq!(fw.ufw.as_deref(), Some("inactive"));
    }

    #[test]
    fn test_firewall_bare_status_line() {
        let fw = parse_firewall_status("Status: inactive");
        assert_eq!(fw.overall.as_deref(), Some("inactive"));
    }

    #[test]
    fn test_logged_in_users() {
        let text = "\
USER     TTY      FROM             LOGIN@   IDLE   JCPU   PCPU WHAT
alice    pts/0    192.168.1.50     09:15    2.00s  0.05s  0.01s w
bob      tty2     -                08:02    1:02m  0.20s  0.20s /usr/bin/vim notes.txt
short row
";
        let users = parse_logged_in_users(text);
        assert_eq!(users.sessions.len(), 2);
        assert_eq!(users.sessions[0].user, "alice");
        assert_eq!(users.sessions[0].command, "w");
        assert_eq!(users.sessions[1].command, "/usr/bin/vim notes.txt");
    }

    #[test]
    fn test_autostart_flags_and_listing() {
        let text = "\
/etc/rc.local: not found
Contents of /etc/xdg/autostart:
at-spi-dbus-bus.desktop
gnome-keyring-pkcs11.desktop

/etc/init.d: found
";
        let audit = parse_autostart_dirs(text);
        assert!(!audit.directories["/etc/rc.local"].found);
        assert!(audit.directories["/etc/init.d"].found);
        let xdg = &audit.directories["/etc/xdg/autostart"];
        assert!(xdg.found);
        assert_eq!(xdg.entries.len(), 2);
        assert_eq!(xdg.entries[0], "at-spi-dbus-bus.desktop");
    }

    #[test]
    fn test_autostart_listing_stops_at_blank_line() {
        let text = "\
Contents of .config/autostart:
spotify.desktop

stray line after blank
";
        let audit = parse_autostart_dirs(text);
        assert_eq!(audit.directories[".config/autostart"].entries, vec!["spotify.desktop"]);
    }

    #[test]
    fn test_systemd_user_services() {
        let text = "\
pipewire.service enabled active
xdg-desktop-portal.service static inactive
dbus.service enabled active
not-a-service-line
";
        let parsed = parse_systemd_user_services(text);
        assert_eq!(parsed.services.len(), 3);
        assert_eq!(parsed.services[1].load_state, "static");
        assert_eq!(parsed.enabled, vec!["pipewire.service", "dbus.service"]);
    }

    #[test]
    fn test_manual_installs() {
        let text = "\
Scanning /opt:
google-chrome
containerd

Scanning /usr/local/bin:
(empty)

Scanning /snap:
/snap: not found
";
        let parsed = parse_manual_installs(text);
        assert_eq!(parsed.locations["/opt"].entries, vec!["google-chrome", "containerd"]);
        assert!(parsed.locations["/opt"].present);
        assert!(parsed.locations["/usr/local/bin"].present);
        assert!(parsed.locations["/usr/local/bin"].entries.is_empty());
        assert!(!parsed.locations["/snap"].present);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_firewall_status(""), FirewallStatus::default());
        assert_eq!(parse_manual_installs(""), ManualInstalls::default());
        assert_eq!(parse_logged_in_users(""), LoggedInUsers::default());
        assert_eq!(parse_autostart_dirs(""), AutostartAudit::default());
        assert_eq!(parse_systemd_user_services(""), SystemdUserServices::default());
    }
}
