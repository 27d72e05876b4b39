//! Pipeline entry points for complaint polling.
//!
//! - `calculate_diff`: Find records missing from the stored snapshot
//! - `PollCycle`: Run one fetch → parse → diff → persist cycle
//! - `Monitor`: Repeat cycles on a fixed cadence until stopped

pub mod cycle;
pub mod diff;
pub mod monitor;

#[cfg(test)]
pub(crate) mod testing;

pub use cycle::{CycleDecision, CycleOutcome, CycleReport, PollCycle, evaluate};
pub use diff::{DiffResult, calculate_diff};
pub use monitor::{Monitor, MonitorHandle, MonitorSummary};
