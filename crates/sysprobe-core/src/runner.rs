//! Probe execution against the monitor backend binary.
//!
//! One probe is one invocation of the backend with the probe's function
//! name as its argument. Safety controls: per-probe timeout enforced by a
//! watchdog thread (SIGTERM, then SIGKILL), output size cap, and a
//! scrubbed environment so probe output is locale-stable.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sysprobe_common::{Error, ProbeId, RawOutput, Result};
use tracing::{debug, info, warn};

use crate::config::RunnerConfig;

/// Grace period between SIGTERM and SIGKILL in milliseconds.
const SIGTERM_GRACE_MS: u64 = 500;

/// Executes probes against the configured backend.
#[derive(Debug)]
pub struct ProbeRunner {
    config: RunnerConfig,
}

impl ProbeRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(RunnerConfig::default())
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run one probe and capture its raw text output.
    pub fn run(&self, probe: ProbeId) -> Result<RawOutput> {
        let backend = &self.config.backend;
        if backend.is_absolute() && !backend.exists() {
            return Err(Error::CommandNotFound(backend.display().to_string()));
        }

        let elevate = probe.requires_elevation() && self.config.allow_elevation;
        let mut command = if elevate {
            let mut cmd = Command::new(&self.config.sudo_path);
            cmd.arg("-n").arg(backend);
            cmd
        } else {
            Command::new(backend)
        };
        command.arg(probe.command_name());
        command.env("LC_ALL", "C").env("LANG", "C");
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        // Own process group, so the watchdog can kill grandchildren that
        // would otherwise hold the output pipes open past the timeout.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        debug!(probe = %probe, elevate, "spawning probe");
        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CommandNotFound(backend.display().to_string())
            } else {
                Error::Execution {
                    probe,
                    message: format!("spawn failed: {e}"),
                }
            }
        })?;

        // Watchdog: after the timeout, SIGTERM the child and escalate to
        // SIGKILL so the blocking reads below always terminate.
        let timed_out = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let watchdog = {
            let timed_out = Arc::clone(&timed_out);
            let finished = Arc::clone(&finished);
            let timeout = Duration::from_secs(self.config.timeout_secs);
            let pid = child.id() as i32;
            thread::spawn(move || {
                let step = Duration::from_millis(50);
                let mut waited = Duration::ZERO;
                while waited < timeout {
                    if finished.load(Ordering::SeqCst) {
                        return;
                    }
                    thread::sleep(step);
                    waited += step;
                }
                timed_out.store(true, Ordering::SeqCst);
                warn!(pid, "probe timed out, sending SIGTERM");
                kill_with_grace(pid);
            })
        };

        // stderr drains on its own thread so a chatty probe cannot fill
        // the pipe and deadlock the stdout read.
        let limit = self.config.max_output_bytes;
        let pid = child.id() as i32;
        let stderr_pipe = child.stderr.take();
        let stderr_reader = thread::spawn(move || read_capped(stderr_pipe, 64 * 1024));
        let stdout = read_capped(child.stdout.take(), limit);
        if matches!(&stdout, Ok((_, true))) {
            // The probe may still be writing; stop it so wait() returns.
            warn!(probe = %probe, limit, "output cap exceeded, stopping probe");
            kill_with_grace(pid);
        }
        let stderr = stderr_reader
            .join()
            .unwrap_or_else(|_| Ok((Vec::new(), false)));
        let status = child.wait();
        finished.store(true, Ordering::SeqCst);
        let _ = watchdog.join();

        if timed_out.load(Ordering::SeqCst) {
            return Err(Error::Timeout {
                probe,
                seconds: self.config.timeout_secs,
            });
        }
        let (stdout, truncated) = stdout?;
        if truncated {
            return Err(Error::OutputTruncated { probe, limit });
        }

        let status = status?;
        if !status.success() {
            let (stderr, _) = stderr.unwrap_or_default();
            let detail = String::from_utf8_lossy(&stderr);
            return Err(Error::Execution {
                probe,
                message: format!(
                    "exit status {}: {}",
                    status.code().unwrap_or(-1),
                    detail.trim()
                ),
            });
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        debug!(probe = %probe, bytes = text.len(), "probe complete");
        Ok(RawOutput::new(probe, text))
    }

    /// Run many probes with bounded parallelism. Every probe settles
    /// independently; the result covers all of them in input order.
    pub fn run_all(&self, probes: &[ProbeId]) -> Vec<(ProbeId, Result<String>)> {
        if probes.is_empty() {
            return Vec::new();
        }
        info!(
            count = probes.len(),
            max_parallel = self.config.max_parallel,
            "running probes"
        );
        probes
            .chunks(self.config.max_parallel)
            .flat_map(|chunk| {
                thread::scope(|s| {
                    let handles: Vec<_> = chunk
                        .iter()
                        .map(|&probe| s.spawn(move || (probe, self.run(probe))))
                        .collect();
                    handles
                        .into_iter()
                        .zip(chunk.iter())
                        .map(|(h, &probe)| match h.join() {
                            Ok((probe, result)) => (probe, result.map(|raw| raw.text)),
                            Err(_) => (
                                probe,
                                Err(Error::Execution {
                                    probe,
                                    message: "probe thread panicked".to_string(),
                                }),
                            ),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect()
    }
}

/// Read a stream to its end, keeping at most `limit` bytes. The boolean
/// reports whether the stream held more than the limit.
fn read_capped<R: Read>(stream: Option<R>, limit: usize) -> Result<(Vec<u8>, bool)> {
    let Some(stream) = stream else {
        return Ok((Vec::new(), false));
    };
    let mut buf = Vec::new();
    let mut handle = stream.take(limit as u64 + 1);
    handle.read_to_end(&mut buf)?;
    let truncated = buf.len() > limit;
    if truncated {
        buf.truncate(limit);
    }
    Ok((buf, truncated))
}

/// SIGTERM first, SIGKILL after the grace period. Signals target the
/// process group rooted at `pid`.
#[cfg(unix)]
fn kill_with_grace(pid: i32) {
    unsafe {
        libc::kill(-pid, libc::SIGTERM);
    }
    thread::sleep(Duration::from_millis(SIGTERM_GRACE_MS));
    unsafe {
        libc::kill(-pid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_with_grace(_pid: i32) {}
