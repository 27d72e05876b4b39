//! Complaint Monitor CLI
//!
//! Local execution entry point for the polling loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use complaint_monitor::{
    error::Result,
    models::Config,
    pipeline::{CycleOutcome, CycleReport, Monitor, PollCycle},
    services::HttpRenderer,
    storage::{LocalStore, SnapshotLoad, SnapshotStore},
};

/// Complaint Monitor - reports newly listed complaints on a status page
#[derive(Parser, Debug)]
#[command(
    name = "complaint-monitor",
    version,
    about = "Polls a complaint status page for new complaints"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll on the configured interval until interrupted
    Run {
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<usize>,
    },

    /// Run a single poll cycle
    Once,

    /// Validate the configuration file
    Validate,

    /// Show the stored snapshot
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn build_cycle(config: &Config, store: Arc<LocalStore>) -> PollCycle {
    let renderer = Arc::new(HttpRenderer::new(config.source.clone()));
    PollCycle::new(renderer, store, config.source.wait_timeout())
}

fn log_report(report: &CycleReport) {
    let elapsed = report.finished_at - report.started_at;
    log::info!(
        "Cycle finished in {}ms: {} labels, {} parsed, {} skipped",
        elapsed.num_milliseconds(),
        report.label_count,
        report.records.len(),
        report.rejected.len()
    );

    match &report.outcome {
        CycleOutcome::NewComplaints { diff, persist_error } => {
            log::info!(
                "{} new complaints in: {}",
                diff.new_count(),
                diff.categories().join(", ")
            );
            if persist_error.is_some() {
                log::warn!("Snapshot was not updated; it will be retried next cycle");
            }
        }
        CycleOutcome::NoNewComplaints => {}
        CycleOutcome::FetchFailed(e) => log::warn!("Cycle failed: {}", e),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Starting complaint monitor...");

    let mut config = Config::load_or_default(&cli.config);
    let base_dir = cli.config.parent().unwrap_or(Path::new("."));
    let snapshot_path = config.snapshot_path(base_dir);
    let store = Arc::new(LocalStore::new(&snapshot_path));

    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { cycles } => {
            config.validate()?;
            if cycles.is_some() {
                config.monitor.max_cycles = cycles;
            }

            let (monitor, handle) = Monitor::new(build_cycle(&config, store), &config.monitor);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Interrupt received, stopping after the current cycle");
                    handle.stop();
                }
            });

            let summary = monitor.run().await?;
            log::info!(
                "Monitor stopped after {} cycles ({} failed, {} with new complaints, {} new records)",
                summary.cycles,
                summary.failed_cycles,
                summary.cycles_with_new,
                summary.new_records
            );
        }

        Command::Once => {
            config.validate()?;
            let report = build_cycle(&config, store).run().await?;
            log_report(&report);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("    Source: {}", config.source.url);
            log::info!("    Selector: {}", config.source.item_selector);
            log::info!("    Interval: {}s", config.monitor.interval_secs);
            log::info!("    Snapshot: {}", snapshot_path.display());
        }

        Command::Info => {
            log::info!("Snapshot file: {}", store.describe());
            match store.load().await {
                SnapshotLoad::Missing => log::info!("No snapshot found yet."),
                SnapshotLoad::Corrupt(e) => log::warn!("Snapshot unreadable: {}", e),
                SnapshotLoad::Loaded(snapshot) => {
                    log::info!("Stored complaints: {}", snapshot.len());
                    for record in snapshot.iter() {
                        log::info!("    {}", record);
                    }
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
