//! Fuzz target for the line/block primitives.
//!
//! Classification, key-value splitting, and quote stripping must handle
//! arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sysprobe_core::parse::{classify_line, split_key_value, strip_quotes};

fuzz_target!(|data: &str| {
    for line in data.lines() {
        let _ = classify_line(line);
        let _ = split_key_value(line, ':');
        let _ = split_key_value(line, '=');
        let _ = strip_quotes(line);
    }
});
