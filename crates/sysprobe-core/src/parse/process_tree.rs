//! Process snapshot parser: indentation-based tree reconstruction plus
//! the per-process detail blocks in the second half of the listing.
//!
//! Tree placement comes from indentation depth alone. The PPID column is
//! kept as metadata but is not authoritative: reparented processes do not
//! nest under their numeric parent in the listing.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Open file descriptors per process kept in a detail block.
const MAX_FD_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdEntry {
    pub fd: u32,
    pub path: String,
}

/// Detail block for one PID: sampled usage plus open files and sockets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDetails {
    pub cpu_percent: Option<f64>,
    pub ram_percent: Option<f64>,
    pub open_files: Option<u64>,
    pub open_sockets: Option<u64>,
    pub file_descriptors: Vec<FdEntry>,
    pub sockets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessNode {
    pub pid: u32,
    pub ppid: u32,
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub ram_kb: u64,
    pub open_files: u64,
    pub open_sockets: u64,
    pub state: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProcessDetails>,
    pub children: Vec<ProcessNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub roots: Vec<ProcessNode>,
    pub total_processes: Option<u64>,
}

/// Parse a process snapshot: the tree listing, an optional
/// `Total processes: N` line, and an optional detail portion opened by a
/// `Per-Process Details` header.
pub fn parse_process_snapshot(text: &str) -> ProcessSnapshot {
    let row = Regex::new(
        r"^(\d+)\s+\((\d+)\)\s+([\d.]+)%\s+([\d.]+)%\s+(\d+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(.+)$",
    )
    .unwrap();
    let total = Regex::new(r"Total processes:\s*(\d+)").unwrap();

    let (tree_text, detail_text) = match text.find("Per-Process Details") {
        Some(idx) => {
            let rest = &text[idx..];
            let rest = rest.split_once('\n').map(|(_, r)| r).unwrap_or("");
            (&text[..idx], rest)
        }
        None => (text, ""),
    };

    let mut snapshot = ProcessSnapshot::default();
    // Stack entries are (indentation level, child-index path from roots).
    let mut stack: Vec<(usize, Vec<usize>)> = Vec::new();

    for line in tree_text.lines() {
        if let Some(caps) = total.captures(line) {
            snapshot.total_processes = caps[1].parse().ok();
            continue;
        }
        let leading_spaces = line.len() - line.trim_start_matches(' ').len();
        let level = leading_spaces / 4;
        let cleaned: String = line
            .trim_start()
            .trim_start_matches(['├', '└', '│', '─', ' '])
            .to_string();
        let Some(caps) = row.captures(&cleaned) else {
            continue;
        };
        let node = ProcessNode {
            pid: caps[1].parse().unwrap_or(0),
            ppid: caps[2].parse().unwrap_or(0),
            cpu_percent: caps[3].parse().unwrap_or(0.0),
            ram_percent: caps[4].parse().unwrap_or(0.0),
            ram_kb: caps[5].parse().unwrap_or(0),
            open_files: caps[6].parse().unwrap_or(0),
            open_sockets: caps[7].parse().unwrap_or(0),
            state: caps[8].to_string(),
            command: caps[9].trim().to_string(),
            details: None,
            children: Vec::new(),
        };

        while let Some((top_level, _)) = stack.last() {
            if *top_level >= level {
                stack.pop();
            } else {
                break;
            }
        }
        let path = match stack.last() {
            Some((_, parent_path)) => {
                let parent = node_at(&mut snapshot.roots, parent_path);
                parent.children.push(node);
                let mut path = parent_path.clone();
                path.push(parent.children.len() - 1);
                path
            }
            None => {
                snapshot.roots.push(node);
                vec![snapshot.roots.len() - 1]
            }
        };
        stack.push((level, path));
    }

    let mut details = parse_detail_blocks(detail_text);
    if !details.is_empty() {
        attach_details(&mut snapshot.roots, &mut details);
    }
    snapshot
}

/// Navigate a child-index path. Paths are built from nodes already pushed,
/// so every index is in bounds.
fn node_at<'a>(roots: &'a mut Vec<ProcessNode>, path: &[usize]) -> &'a mut ProcessNode {
    let mut node = &mut roots[path[0]];
    for &idx in &path[1..] {
        node = &mut node.children[idx];
    }
    node
}

/// Parse `PID <pid>: ...` detail blocks with their fd and socket lines.
fn parse_detail_blocks(text: &str) -> HashMap<u32, ProcessDetails> {
    let header =
        Regex::new(r"^PID\s+(\d+):\s*CPU\s+([\d.]+)%\s+RAM\s+([\d.]+)%\s+Files\s+(\d+)\s+Sockets\s+(\d+)")
            .unwrap();
    let fd_line = Regex::new(r"^fd\s+(\d+)\s*->\s*(.+)$").unwrap();

    let mut blocks = HashMap::new();
    let mut current: Option<u32> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(caps) = header.captures(trimmed) {
            let pid: u32 = match caps[1].parse() {
                Ok(pid) => pid,
                Err(_) => continue,
            };
            blocks.insert(
                pid,
                ProcessDetails {
                    cpu_percent: caps[2].parse().ok(),
                    ram_percent: caps[3].parse().ok(),
                    open_files: caps[4].parse().ok(),
                    open_sockets: caps[5].parse().ok(),
                    file_descriptors: Vec::new(),
                    sockets: Vec::new(),
                },
            );
            current = Some(pid);
            continue;
        }
        let Some(pid) = current else { continue };
        let Some(block) = blocks.get_mut(&pid) else {
            continue;
        };
        if let Some(caps) = fd_line.captures(trimmed) {
            if block.file_descriptors.len() < MAX_FD_ENTRIES {
                if let Ok(fd) = caps[1].parse() {
                    block.file_descriptors.push(FdEntry {
                        fd,
                        path: caps[2].trim().to_string(),
                    });
                }
            }
        } else if let Some(socket) = trimmed.strip_prefix("socket:") {
            block.sockets.push(socket.trim().to_string());
        }
    }
    blocks
}

/// Attach detail blocks to tree nodes by PID. PIDs without a tree position
/// are dropped silently.
fn attach_details(nodes: &mut [ProcessNode], details: &mut HashMap<u32, ProcessDetails>) {
    for node in nodes {
        if let Some(block) = details.remove(&node.pid) {
            node.details = Some(block);
        }
        attach_details(&mut node.children, details);
    }
}
