//! pollwatch - poll metrics, evaluate thresholds, alert on transitions.
//!
//! One invocation is one poll cycle; an external scheduler (cron,
//! systemd timer, K8s CronJob) runs it on cadence. The process exit
//! code is the worst severity observed: 0 OK, 1 WARNING, 2 HIGH,
//! 3 CRITICAL.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pollwatch_config::ConfigLoader;
use pollwatch_core::MonitorType;
use pollwatch_engine::{JsonFileFetcher, RunDriver};
use pollwatch_notify::Dispatcher;
use pollwatch_state::FileStateStore;

/// pollwatch CLI.
#[derive(Parser)]
#[command(name = "pollwatch")]
#[command(about = "Poll metrics, evaluate thresholds, alert on transitions")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: PathBuf,

    /// JSON document of pre-collected metric samples to evaluate
    #[arg(short, long)]
    samples: PathBuf,

    /// Evaluate and log decisions without dispatching notifications or
    /// writing state
    #[arg(long)]
    dry_run: bool,

    /// Log every decision, not just transitions and errors
    #[arg(short, long)]
    verbose: bool,

    /// Override the configured state directory
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Only run monitors of this type (e.g. agent-health)
    #[arg(long)]
    monitor: Option<MonitorType>,
}

/// Initialize tracing with a console layer and, when a log directory is
/// configured, a daily-rolling file layer.
fn init_tracing(verbose: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true));

    match log_dir {
        Some(dir) => {
            let dir = ConfigLoader::expand_path(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {dir}"))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("pollwatch")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the worker guard alive for the process lifetime so
            // buffered log lines are not dropped.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            registry
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    init_tracing(cli.verbose, config.log_dir.as_deref())?;

    info!("pollwatch v{}", env!("CARGO_PKG_VERSION"));

    let mut monitors = config.compile().context("invalid configuration")?;
    if let Some(monitor_type) = cli.monitor {
        monitors.retain(|m| m.monitor_type == monitor_type);
        anyhow::ensure!(
            !monitors.is_empty(),
            "no configured monitor of type {monitor_type}"
        );
    }
    debug!(
        "running {} monitor(s), {} entities total",
        monitors.len(),
        monitors.iter().map(|m| m.entities.len()).sum::<usize>()
    );

    let state_dir = match &cli.state_dir {
        Some(dir) => dir.display().to_string(),
        None => ConfigLoader::expand_path(&config.state_dir),
    };
    let store = Arc::new(
        FileStateStore::new(state_dir.as_str())
            .await
            .with_context(|| format!("failed to open state directory {state_dir}"))?,
    );

    let fetcher = Arc::new(
        JsonFileFetcher::load(&cli.samples)
            .await
            .with_context(|| format!("failed to load samples from {}", cli.samples.display()))?,
    );

    let dispatcher = Dispatcher::from_config(&config.channels);
    info!("notification channels: {:?}", dispatcher.channel_names());
    if cli.dry_run {
        info!("DRY RUN: notifications and state writes are suppressed");
    }

    let driver = RunDriver::new(monitors, fetcher, store, dispatcher)
        .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_seconds))
        .with_dry_run(cli.dry_run);

    let report = driver.run_once().await;
    std::process::exit(report.exit_code());
}
