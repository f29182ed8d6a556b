//! Sysprobe core library.
//!
//! The heart of this crate is `parse`: one pure parser per probe grammar,
//! turning a probe's raw text into a typed record. Around it sit:
//! - `report`: closed dispatch and all-settled aggregation into one map
//! - `runner`: the command-execution collaborator (timeout, output cap)
//! - `config`: runner configuration loaded from TOML
//! - `logging`: tracing setup (human or JSONL on stderr)
//!
//! Parsers are synchronous, hold no shared state, and never fail: malformed
//! input degrades to absent fields or fallback entries, per grammar.

pub mod config;
pub mod logging;
pub mod parse;
pub mod report;
pub mod runner;

pub use report::{aggregate, parse_probe, ProbeRecord, ProbeReport, ReportMetadata};
pub use runner::ProbeRunner;
