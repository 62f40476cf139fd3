//! Bench diagnostics host entry point.
//!
//! Runs the relay-toggle or soft access-point diagnostic against simulated
//! collaborators on the host clock, so the polling behavior can be watched
//! before the firmware is flashed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diag_common::config::{DiagConfig, ReportFormat};
use diag_hal::clock::{SystemClock, ThreadIdle};
use diag_hal::output::SimulatedOutput;
use diag_hal::wireless::SimulatedAccessPoint;
use diag_runtime::{
    AccessPointDiagnostic, JsonReporter, RelayDiagnostic, Reporter, RunSummary, Runner,
    TracingReporter,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

/// Bench diagnostics command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "greenhouse-diag",
    about = "Greenhouse controller bench diagnostics - relay toggle and access point checks",
    version,
    long_about = None
)]
struct Args {
    /// Path to a diagnostics configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Stop after this many fires (0 = run until killed).
    #[arg(long, default_value = "0", global = true)]
    max_fires: u64,

    /// Start the host clock at this millisecond reading (to exercise wraparound).
    #[arg(long, default_value = "0", global = true)]
    clock_start: u32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Toggle the relay output at a fixed interval.
    Relay,
    /// Start a soft access point and poll its client count.
    AccessPoint,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), command = ?args.command, "Starting bench diagnostic");

    let config = load_config(&args)?;
    let reporter = create_reporter(config.report.format, std::io::stdout());
    let clock = SystemClock::starting_at(args.clock_start);

    let summary = match args.command {
        Command::Relay => run_relay(&config, clock, reporter, args.max_fires)?,
        Command::AccessPoint => run_access_point(&config, clock, reporter, args.max_fires)?,
    };

    info!(
        fires = summary.fires,
        transitions = summary.transitions,
        milestones = summary.milestones,
        "Diagnostic finished"
    );
    Ok(())
}

/// Initialize logging with the specified log level.
///
/// Logs go to stderr so stdout carries only the report stream.
fn init_logging(level: &str) {
    log_subscriber(level, std::io::stderr).init();
}

/// Build the log subscriber writing to `writer`.
fn log_subscriber<W>(level: &str, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = format!(
        "greenhouse_diag={},diag_runtime={},diag_hal={},diag_monitor={}",
        level, level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(writer)
        .finish()
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `GREENHOUSE_DIAG_CONFIG` environment variable
/// 3. `/etc/greenhouse-diag/config.toml` (system path)
/// 4. `config/default.toml` (local development)
/// 5. Built-in defaults
fn load_config(args: &Args) -> Result<DiagConfig> {
    if let Some(config_path) = &args.config {
        return read_config(config_path, "command-line argument");
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            return read_config(&config_path, CONFIG_ENV);
        }
        warn!(
            path = %env_path,
            "{CONFIG_ENV} set but file does not exist, checking other locations"
        );
    }

    let found = [SYSTEM_CONFIG_PATH, LOCAL_CONFIG_PATH]
        .into_iter()
        .map(Path::new)
        .find(|path| path.exists());
    if let Some(config_path) = found {
        return read_config(config_path, "search path");
    }

    info!("No config file found, using built-in defaults");
    Ok(DiagConfig::default())
}

const CONFIG_ENV: &str = "GREENHOUSE_DIAG_CONFIG";
const SYSTEM_CONFIG_PATH: &str = "/etc/greenhouse-diag/config.toml";
const LOCAL_CONFIG_PATH: &str = "config/default.toml";

fn read_config(path: &Path, source: &str) -> Result<DiagConfig> {
    info!(config_path = ?path, source, "Loading config");
    DiagConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {:?} ({source})", path))
}

/// Create the report sink for the configured format; JSON lines go to `out`.
fn create_reporter<W: Write + 'static>(format: ReportFormat, out: W) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Text => Box::new(TracingReporter),
        ReportFormat::Json => Box::new(JsonReporter::new(out)),
    }
}

/// Run the relay-toggle diagnostic.
fn run_relay(
    config: &DiagConfig,
    clock: SystemClock,
    reporter: Box<dyn Reporter>,
    max_fires: u64,
) -> Result<RunSummary> {
    let relay = &config.relay;
    info!(
        pin = relay.pin,
        interval = ?relay.interval,
        polarity = ?relay.polarity,
        "Running relay diagnostic with simulated pin"
    );

    let mut diagnostic =
        RelayDiagnostic::new(clock, SimulatedOutput::new(relay.pin), relay, reporter)
            .context("Invalid relay configuration")?;

    Ok(Runner::new(relay.idle_sleep)
        .max_fires(max_fires)
        .run(&mut diagnostic, &mut ThreadIdle))
}

/// Run the soft access-point diagnostic.
fn run_access_point(
    config: &DiagConfig,
    clock: SystemClock,
    reporter: Box<dyn Reporter>,
    max_fires: u64,
) -> Result<RunSummary> {
    let ap = &config.access_point;
    info!(
        ssid = %ap.ssid,
        interval = ?ap.interval,
        scripted_polls = ap.simulated_clients.len(),
        "Running access point diagnostic with simulated radio"
    );

    let mut radio = SimulatedAccessPoint::new(ap.simulated_clients.iter().copied());
    if !ap.simulated_start_ok {
        radio = radio.failing_start();
    }

    let mut diagnostic = AccessPointDiagnostic::new(clock, radio, ap, reporter)
        .context("Invalid access point configuration")?;

    Ok(Runner::new(ap.idle_sleep)
        .max_fires(max_fires)
        .run(&mut diagnostic, &mut ThreadIdle))
}
