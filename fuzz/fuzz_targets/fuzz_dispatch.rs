//! Fuzz target covering every probe parser through the dispatch layer,
//! including JSON serialization of the resulting record.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sysprobe_common::ProbeId;
use sysprobe_core::parse_probe;

fuzz_target!(|input: (u8, &str)| {
    let (selector, text) = input;
    let probe = ProbeId::ALL[selector as usize % ProbeId::ALL.len()];
    let record = parse_probe(probe, text);
    let _ = serde_json::to_string(&record);
});
