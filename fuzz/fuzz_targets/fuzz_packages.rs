//! Fuzz target for the package manager transcript parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sysprobe_core::parse::packages::parse_package_managers;

fuzz_target!(|data: &str| {
    let parsed = parse_package_managers(data);
    for entry in parsed.managers.values() {
        // Unavailable managers never carry packages.
        if !entry.available {
            assert!(entry.packages.is_empty());
            assert!(entry.error.is_some());
        }
    }
});
