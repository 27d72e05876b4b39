// src/pipeline/cycle.rs

//! A single poll cycle: fetch, parse, load, diff, persist, report.
//!
//! Every per-cycle failure is contained here and ends up in the
//! [`CycleReport`]. Only a renderer that cannot be opened at all escapes
//! as an error, since no later cycle could succeed either.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{ComplaintRecord, Snapshot};
use crate::pipeline::diff::{DiffResult, calculate_diff};
use crate::services::{NoMatch, RenderSession, Renderer, parse_labels};
use crate::storage::{SnapshotLoad, SnapshotStore};

/// What to do with the store after comparing a poll against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDecision {
    pub diff: DiffResult,
    /// The full current set, present only when something new was seen
    pub snapshot_to_persist: Option<Vec<ComplaintRecord>>,
}

/// Decide the cycle's result from the parsed records and the stored snapshot.
pub fn evaluate(current: &[ComplaintRecord], previous: &Snapshot) -> CycleDecision {
    let diff = calculate_diff(current, previous);
    let snapshot_to_persist = diff.has_changes().then(|| current.to_vec());
    CycleDecision {
        diff,
        snapshot_to_persist,
    }
}

/// How a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Every visible complaint was already in the snapshot
    NoNewComplaints,
    /// New complaints were seen; `persist_error` is set if the save failed
    NewComplaints {
        diff: DiffResult,
        persist_error: Option<AppError>,
    },
    /// The complaint list could not be fetched
    FetchFailed(AppError),
}

/// Summary of one poll cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Raw labels returned by the renderer
    pub label_count: usize,
    /// Records parsed this cycle, in page order
    pub records: Vec<ComplaintRecord>,
    /// Labels that did not parse
    pub rejected: Vec<NoMatch>,
    /// The stored snapshot was unreadable and treated as empty
    pub previous_corrupt: bool,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    fn fetch_failed(started_at: DateTime<Utc>, error: AppError) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            label_count: 0,
            records: Vec::new(),
            rejected: Vec::new(),
            previous_corrupt: false,
            outcome: CycleOutcome::FetchFailed(error),
        }
    }

    pub fn has_new(&self) -> bool {
        matches!(self.outcome, CycleOutcome::NewComplaints { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, CycleOutcome::FetchFailed(_))
    }

    /// New records found this cycle (empty unless `has_new`).
    pub fn new_records(&self) -> &[ComplaintRecord] {
        match &self.outcome {
            CycleOutcome::NewComplaints { diff, .. } => &diff.new_records,
            _ => &[],
        }
    }

    /// Distinct categories of the new records.
    pub fn new_categories(&self) -> Vec<&str> {
        match &self.outcome {
            CycleOutcome::NewComplaints { diff, .. } => diff.categories(),
            _ => Vec::new(),
        }
    }

    /// Whether the snapshot was rewritten this cycle.
    pub fn persisted(&self) -> bool {
        matches!(
            self.outcome,
            CycleOutcome::NewComplaints {
                persist_error: None,
                ..
            }
        )
    }
}

/// Coordinates one poll cycle against a renderer and a snapshot store.
pub struct PollCycle {
    renderer: Arc<dyn Renderer>,
    store: Arc<dyn SnapshotStore>,
    wait: Duration,
}

impl PollCycle {
    /// `wait` bounds how long the renderer may take to show the complaint list.
    pub fn new(renderer: Arc<dyn Renderer>, store: Arc<dyn SnapshotStore>, wait: Duration) -> Self {
        Self {
            renderer,
            store,
            wait,
        }
    }

    /// Run one cycle. Only renderer initialization failures are returned as errors.
    pub async fn run(&self) -> Result<CycleReport> {
        let started_at = Utc::now();
        log::info!("Checking for complaints...");

        let mut session = self.renderer.open().await.map_err(|e| {
            let e = if e.is_fatal() {
                e
            } else {
                AppError::renderer_init(e)
            };
            log::error!("Error occurred: {}", e);
            e
        })?;

        let report = self.observe(session.as_mut(), started_at).await;

        if let Err(e) = session.close().await {
            log::warn!("Failed to close render session: {}", e);
        }

        Ok(report)
    }

    async fn observe(&self, session: &mut dyn RenderSession, started_at: DateTime<Utc>) -> CycleReport {
        // Fetch
        let labels = match session.fetch_labels(self.wait).await {
            Ok(labels) => labels,
            Err(e) => {
                log::error!("Error occurred: {}", e);
                return CycleReport::fetch_failed(started_at, e);
            }
        };

        // Parse
        let parsed = parse_labels(&labels);
        for rejected in &parsed.rejected {
            log::info!("{}", rejected);
        }
        log::debug!(
            "Parsed {} of {} complaint labels",
            parsed.records.len(),
            labels.len()
        );

        // Load
        let load = self.store.load().await;
        if let SnapshotLoad::Corrupt(e) = &load {
            log::error!("Error reading previous data file: {}", e);
        }
        let previous_corrupt = load.is_corrupt();
        let previous = load.into_snapshot();

        // Diff
        let decision = evaluate(&parsed.records, &previous);

        // Persist
        let persist_error = match &decision.snapshot_to_persist {
            Some(records) => match self.store.save(records).await {
                Ok(()) => None,
                Err(e) => {
                    log::error!("Error occurred: {}", e);
                    Some(e)
                }
            },
            None => None,
        };

        // Report
        let outcome = if decision.diff.has_changes() {
            log::info!("New complaints found!");
            for record in &decision.diff.new_records {
                log::debug!("New complaint: {}", record);
            }
            CycleOutcome::NewComplaints {
                diff: decision.diff,
                persist_error,
            }
        } else {
            log::info!("No new complaints found");
            CycleOutcome::NoNewComplaints
        };

        CycleReport {
            started_at,
            finished_at: Utc::now(),
            label_count: labels.len(),
            records: parsed.records,
            rejected: parsed.rejected,
            previous_corrupt,
            outcome,
        }
    }
}
