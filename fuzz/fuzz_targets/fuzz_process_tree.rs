//! Fuzz target for the process snapshot parser.
//!
//! Indentation-stack reconstruction must never panic or build an
//! inconsistent tree for arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sysprobe_core::parse::process_tree::{parse_process_snapshot, ProcessNode};

fn count(nodes: &[ProcessNode]) -> usize {
    nodes.iter().map(|n| 1 + count(&n.children)).sum()
}

fuzz_target!(|data: &str| {
    let snapshot = parse_process_snapshot(data);
    // Every parsed row lands in the tree exactly once.
    let total = count(&snapshot.roots);
    assert!(total <= data.lines().count());
});
