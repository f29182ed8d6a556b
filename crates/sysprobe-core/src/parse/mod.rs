//! Probe output parsers.
//!
//! One module per grammar family. Every parser is a pure function from
//! `&str` to its record type; malformed input degrades per grammar
//! (absent fields, fallback entries, silent drops for known-noise rows)
//! and never produces an error.

pub mod cpu;
pub mod extract;
pub mod osinfo;
pub mod packages;
pub mod primitives;
pub mod process_tree;
pub mod security;
pub mod smart;
pub mod storage;
pub mod temperature;

pub use primitives::{classify_line, is_separator, split_key_value, strip_quotes, KeyValueBlock, LineKind};
