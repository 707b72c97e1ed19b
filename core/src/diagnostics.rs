use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::DiagnosticsConfig;

/// Recoverable conditions the graph core tolerates silently but can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownFilterKey,
    StaleFetchDiscarded,
    StaleHitTest,
    AssetNotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub sequence: u64,
    pub kind: DiagnosticKind,
    pub detail: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl DiagnosticEvent {
    pub fn new(kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            sequence: 0,
            kind,
            detail: detail.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("diagnostic sink lock poisoned")]
    LockPoisoned,
    #[error("diagnostic io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("diagnostic serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent) -> Result<(), DiagnosticError>;
}

/// Records into an optional sink. Sink failures are logged and swallowed.
pub fn report(sink: Option<&dyn DiagnosticSink>, event: DiagnosticEvent) {
    if let Some(sink) = sink {
        if let Err(err) = sink.record(event) {
            tracing::warn!(error = %err, "failed to record diagnostic event");
        }
    }
}

#[derive(Default)]
pub struct InMemoryDiagnosticSink {
    events: Mutex<Vec<DiagnosticEvent>>,
    sequence: AtomicU64,
}

impl InMemoryDiagnosticSink {
    pub fn events(&self) -> Result<Vec<DiagnosticEvent>, DiagnosticError> {
        let events = self
            .events
            .lock()
            .map_err(|_| DiagnosticError::LockPoisoned)?;
        Ok(events.clone())
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.events()
            .map(|events| events.iter().filter(|e| e.kind == kind).count())
            .unwrap_or(0)
    }
}

impl DiagnosticSink for InMemoryDiagnosticSink {
    fn record(&self, mut event: DiagnosticEvent) -> Result<(), DiagnosticError> {
        let next = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        event.sequence = next;
        let mut events = self
            .events
            .lock()
            .map_err(|_| DiagnosticError::LockPoisoned)?;
        events.push(event);
        Ok(())
    }
}

pub struct JsonlDiagnosticSink {
    writer: Mutex<std::fs::File>,
    sequence: AtomicU64,
}

impl JsonlDiagnosticSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DiagnosticError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;

        Ok(Self {
            writer: Mutex::new(writer),
            sequence: AtomicU64::new(0),
        })
    }
}

impl DiagnosticSink for JsonlDiagnosticSink {
    fn record(&self, mut event: DiagnosticEvent) -> Result<(), DiagnosticError> {
        let next = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        event.sequence = next;

        let line = serde_json::to_string(&event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| DiagnosticError::LockPoisoned)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// JSON-lines sink at `config.path`, or `None` when no path is configured.
pub fn open_configured(
    config: &DiagnosticsConfig,
) -> Result<Option<Arc<dyn DiagnosticSink>>, DiagnosticError> {
    match &config.path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "writing diagnostics");
            let sink: Arc<dyn DiagnosticSink> = Arc::new(JsonlDiagnosticSink::open(path)?);
            Ok(Some(sink))
        }
        None => Ok(None),
    }
}
