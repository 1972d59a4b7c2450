//! stackcheck binary
//!
//! Runs the connectivity checks against the configured stack, prints the
//! report and exits non-zero when any check failed.

use clap::Parser;
use cli::{render, OutputFormat};
use stackcheck_core::gate::GateConfig;
use stackcheck_core::utils::{init_tracing, validate_config};
use stackcheck_core::{Harness, HarnessConfig, Report};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

/// Exit status for invocation errors, distinct from "a check failed"
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "stackcheck")]
#[command(about = "Smoke-test connectivity to the local development stack")]
#[command(version)]
struct Cli {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "STACKCHECK_LOG", default_value = "warn")]
    log_level: String,

    /// How long to wait for a service port to accept connections
    #[arg(long, env = "STACKCHECK_GATE_WINDOW_MS", default_value_t = 2000)]
    gate_window_ms: u64,

    /// Timeout for a single connection attempt while waiting
    #[arg(long, env = "STACKCHECK_GATE_ATTEMPT_TIMEOUT_MS", default_value_t = 500)]
    gate_attempt_timeout_ms: u64,

    /// Pause between connection attempts
    #[arg(long, env = "STACKCHECK_GATE_RETRY_INTERVAL_MS", default_value_t = 200)]
    gate_retry_interval_ms: u64,

    /// Upper bound on each service round-trip; unbounded when unset
    #[arg(long, env = "STACKCHECK_OPERATION_TIMEOUT_SECS")]
    operation_timeout_secs: Option<u64>,
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            gate: GateConfig {
                window: Duration::from_millis(self.gate_window_ms),
                attempt_timeout: Duration::from_millis(self.gate_attempt_timeout_ms),
                retry_interval: Duration::from_millis(self.gate_retry_interval_ms),
            },
            operation_timeout: self.operation_timeout_secs.map(Duration::from_secs),
        }
    }
}

async fn run(cli: Cli) -> cli::Result<u8> {
    let config = cli.harness_config();
    validate_config(&config)?;
    debug!(?config, "starting checks");

    let results = Harness::new(config).run_all().await;
    let report = Report::new(results);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&mut out, &report, cli.format)?;
    out.flush()?;

    Ok(u8::try_from(report.exit_code()).unwrap_or(1))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error [{}]: {}", e.code(), e);
        return ExitCode::from(EXIT_USAGE);
    }

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}
