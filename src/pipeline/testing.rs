//! Scripted collaborators for pipeline tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ComplaintRecord;
use crate::services::{RenderSession, Renderer};
use crate::storage::{SnapshotLoad, SnapshotStore};

/// What one session should return from `fetch_labels`.
#[derive(Debug, Clone)]
pub enum Script {
    Labels(Vec<&'static str>),
    Timeout,
}

/// Renderer that replays scripted pages, one per opened session.
///
/// Once the script runs out the last entry repeats.
#[derive(Default)]
pub struct ScriptedRenderer {
    script: Mutex<VecDeque<Script>>,
    last: Mutex<Option<Script>>,
    fail_open: bool,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl ScriptedRenderer {
    pub fn new(script: impl IntoIterator<Item = Script>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn labels(labels: Vec<&'static str>) -> Self {
        Self::new([Script::Labels(labels)])
    }

    pub fn broken() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn next_script(&self) -> Script {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = script.pop_front() {
            *last = Some(next);
        }
        last.clone().unwrap_or(Script::Labels(Vec::new()))
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>> {
        if self.fail_open {
            return Err(AppError::renderer_init("browser binary not found"));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            script: Some(self.next_script()),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct ScriptedSession {
    script: Option<Script>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn fetch_labels(&mut self, wait: Duration) -> Result<Vec<String>> {
        match self.script.take() {
            Some(Script::Labels(labels)) => Ok(labels.into_iter().map(String::from).collect()),
            Some(Script::Timeout) | None => Err(AppError::FetchTimeout {
                url: "scripted://status".into(),
                waited_ms: wait.as_millis(),
            }),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose saves always fail, as on a full or read-only disk.
#[derive(Default)]
pub struct ReadOnlyStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl SnapshotStore for ReadOnlyStore {
    async fn load(&self) -> SnapshotLoad {
        SnapshotLoad::Missing
    }

    async fn save(&self, _records: &[ComplaintRecord]) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::persist("read-only", "permission denied"))
    }

    fn describe(&self) -> String {
        "read-only".to_string()
    }
}
