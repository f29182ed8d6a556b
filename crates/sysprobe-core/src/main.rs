//! sysprobe CLI: run diagnostic probes against the monitor backend and
//! print the aggregated JSON report on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sysprobe_common::ProbeId;
use sysprobe_core::config::RunnerConfig;
use sysprobe_core::logging::{init_logging, LogFormat};
use sysprobe_core::{aggregate, ProbeRunner};

#[derive(Debug, Parser)]
#[command(
    name = "sysprobe",
    version,
    about = "Collect OS diagnostic probes and emit a structured JSON report"
)]
struct Cli {
    /// Probes to run. Defaults to every known probe.
    #[arg(value_enum)]
    probes: Vec<ProbeId>,

    /// Path to the monitor backend binary.
    #[arg(long, env = "SYSPROBE_BACKEND")]
    backend: Option<PathBuf>,

    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-probe timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Run elevation-requiring probes under sudo.
    #[arg(long)]
    allow_elevation: bool,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,

    /// Log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("sysprobe: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> sysprobe_common::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.allow_elevation {
        config.allow_elevation = true;
    }
    config.validate()?;

    let probes: Vec<ProbeId> = if cli.probes.is_empty() {
        ProbeId::ALL.to_vec()
    } else {
        cli.probes
    };

    let runner = ProbeRunner::new(config);
    let report = aggregate(runner.run_all(&probes));

    let payload = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{payload}");

    // Partial failure still reports; only a fully failed run is an error.
    Ok(if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
