//! Fuzz target for the SMART/NVMe dump parser.
//!
//! The section state machine should accept arbitrary input without
//! panicking, and parsing must be deterministic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sysprobe_core::parse::smart::parse_smart_data;

fuzz_target!(|data: &str| {
    let first = parse_smart_data(data);
    let second = parse_smart_data(data);
    assert_eq!(first, second);
});
