// src/pipeline/monitor.rs

//! Poll cadence owner.
//!
//! Runs [`PollCycle`]s back to back with a fixed pause in between until
//! stopped, a cycle limit is reached, or the renderer fails fatally.
//! Stopping only takes effect between cycles.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::Result;
use crate::models::MonitorConfig;
use crate::pipeline::cycle::{CycleReport, PollCycle};

/// Totals across a monitor run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    pub cycles: usize,
    pub failed_cycles: usize,
    pub cycles_with_new: usize,
    pub new_records: usize,
}

impl MonitorSummary {
    fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        if report.is_failed() {
            self.failed_cycles += 1;
        }
        if report.has_new() {
            self.cycles_with_new += 1;
            self.new_records += report.new_records().len();
        }
    }
}

/// Stops a running [`Monitor`].
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Ask the monitor to stop once the current cycle, if any, finishes.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

pub struct Monitor {
    cycle: PollCycle,
    interval: Duration,
    max_cycles: Option<usize>,
    stop_rx: watch::Receiver<bool>,
}

impl Monitor {
    pub fn new(cycle: PollCycle, config: &MonitorConfig) -> (Self, MonitorHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let monitor = Self {
            cycle,
            interval: config.interval(),
            max_cycles: config.max_cycles,
            stop_rx,
        };
        (monitor, MonitorHandle { stop_tx })
    }

    /// Run until stopped. A fatal renderer error ends the run with that error.
    pub async fn run(mut self) -> Result<MonitorSummary> {
        let mut summary = MonitorSummary::default();

        loop {
            if self.stop_requested() {
                log::info!("Stop requested, shutting down monitor");
                break;
            }
            if self.limit_reached(&summary) {
                log::info!("Completed {} cycles, stopping", summary.cycles);
                break;
            }

            let report = self.cycle.run().await?;
            summary.record(&report);

            if self.limit_reached(&summary) {
                log::info!("Completed {} cycles, stopping", summary.cycles);
                break;
            }

            log::info!(
                "Waiting {} before next check...",
                describe_interval(self.interval)
            );
            self.pause().await;
        }

        Ok(summary)
    }

    fn limit_reached(&self, summary: &MonitorSummary) -> bool {
        self.max_cycles.is_some_and(|max| summary.cycles >= max)
    }

    fn stop_requested(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Sleep for the interval, waking early on a stop request.
    async fn pause(&mut self) {
        let sleep = tokio::time::sleep(self.interval);
        tokio::pin!(sleep);

        tokio::select! {
            _ = &mut sleep => {}
            Ok(()) = self.stop_rx.changed() => {}
        }
    }
}

fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s if s > 0 => format!("{} seconds", s),
        _ => format!("{}ms", interval.as_millis()),
    }
}
