//! Runner configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sysprobe_common::{Error, Result};

/// Default timeout per probe in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum output size in bytes (10MB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Default maximum parallel probe executions.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Configuration for probe execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Path to the monitor backend binary.
    pub backend: PathBuf,

    /// Timeout per probe in seconds.
    pub timeout_secs: u64,

    /// Maximum captured output per probe in bytes.
    pub max_output_bytes: usize,

    /// Maximum probes executed in parallel.
    pub max_parallel: usize,

    /// Allow probes that need elevation to run under sudo.
    pub allow_elevation: bool,

    /// Elevation command. Invoked non-interactively.
    pub sudo_path: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: PathBuf::from("system-monitor"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            max_parallel: DEFAULT_MAX_PARALLEL,
            allow_elevation: false,
            sudo_path: "sudo".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunnerConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot execute any probe.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.max_parallel == 0 {
            return Err(Error::Config("max_parallel must be at least 1".to_string()));
        }
        if self.max_output_bytes == 0 {
            return Err(Error::Config(
                "max_output_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
