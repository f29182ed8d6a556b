//! Error types for sysprobe.
//!
//! Only probe execution, configuration, and I/O can fail. Parsers never
//! return errors: a line that matches no grammar becomes absent data,
//! a fallback entry, or opaque passthrough, so one bad probe can never
//! abort collection of its siblings.

use crate::probe::ProbeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for sysprobe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Probe execution failures (spawn, timeout, exit status).
    Execution,
    /// Configuration file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Execution => write!(f, "execution"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for sysprobe.
#[derive(Error, Debug)]
pub enum Error {
    #[error("probe {probe} failed: {message}")]
    Execution { probe: ProbeId, message: String },

    #[error("probe {probe} timed out after {seconds}s")]
    Timeout { probe: ProbeId, seconds: u64 },

    #[error("backend command not found: {0}")]
    CommandNotFound(String),

    #[error("probe {probe} output exceeded limit of {limit} bytes")]
    OutputTruncated { probe: ProbeId, limit: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Category for grouping related errors.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Execution { .. }
            | Error::Timeout { .. }
            | Error::CommandNotFound(_)
            | Error::OutputTruncated { .. } => ErrorCategory::Execution,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether retrying the probe could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Execution { .. } => true,
            Error::Timeout { .. } => true,
            Error::CommandNotFound(_) => false,
            Error::OutputTruncated { .. } => false,
            Error::Config(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category() {
        let err = Error::Timeout {
            probe: ProbeId::SmartData,
            seconds: 30,
        };
        assert_eq!(err.category(), ErrorCategory::Execution);
        assert_eq!(Error::Config("bad".into()).category(), ErrorCategory::Config);
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::Execution {
            probe: ProbeId::CoreCount,
            message: "exit 1".into()
        }
        .is_recoverable());
        assert!(!Error::CommandNotFound("system-monitor".into()).is_recoverable());
    }

    #[test]
    fn test_display_includes_probe() {
        let err = Error::Timeout {
            probe: ProbeId::CpuUsage,
            seconds: 10,
        };
        assert!(err.to_string().contains("cpu_usage"));
    }
}
