//! Sysprobe common types, identifiers, and errors.
//!
//! This crate provides the foundational types shared across sysprobe:
//! - Probe identifiers with their backend command mapping
//! - Raw probe output wrapper
//! - The unified error type

pub mod error;
pub mod probe;

pub use error::{Error, ErrorCategory, Result};
pub use probe::{ProbeId, RawOutput};
