use crate::error::{Result, SimError};
use crate::sandbox::Sandbox;
use crate::{io, paths};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Closed set of wire tags an action may emit. The string forms are the
/// stable contract consumed by log readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    PersistenceSimulated,
    PayloadStubCreated,
    DuplicationSimulated,
    ScanStarted,
    FileFound,
    ScanFinished,
    RansomNoteCreated,
    RansomTargets,
    RansomRenameSimulated,
    UndoRename,
    UndoConflictMovedToQuarantine,
    UndoDone,
    PropagationGraph,
    PropagationState,
    PropagationTransition,
    PropagationDone,
    ScenarioStart,
    ScenarioEnd,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::PersistenceSimulated,
            EventKind::PayloadStubCreated,
            EventKind::DuplicationSimulated,
            EventKind::ScanStarted,
            EventKind::FileFound,
            EventKind::ScanFinished,
            EventKind::RansomNoteCreated,
            EventKind::RansomTargets,
            EventKind::RansomRenameSimulated,
            EventKind::UndoRename,
            EventKind::UndoConflictMovedToQuarantine,
            EventKind::UndoDone,
            EventKind::PropagationGraph,
            EventKind::PropagationState,
            EventKind::PropagationTransition,
            EventKind::PropagationDone,
            EventKind::ScenarioStart,
            EventKind::ScenarioEnd,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::PersistenceSimulated => "PERSISTENCE_SIMULATED",
            EventKind::PayloadStubCreated => "PAYLOAD_STUB_CREATED",
            EventKind::DuplicationSimulated => "DUPLICATION_SIMULATED",
            EventKind::ScanStarted => "SCAN_STARTED",
            EventKind::FileFound => "FILE_FOUND",
            EventKind::ScanFinished => "SCAN_FINISHED",
            EventKind::RansomNoteCreated => "RANSOM_NOTE_CREATED",
            EventKind::RansomTargets => "RANSOM_TARGETS",
            EventKind::RansomRenameSimulated => "RANSOM_RENAME_SIMULATED",
            EventKind::UndoRename => "UNDO_RENAME",
            EventKind::UndoConflictMovedToQuarantine => "UNDO_CONFLICT_MOVED_TO_QUARANTINE",
            EventKind::UndoDone => "UNDO_DONE",
            EventKind::PropagationGraph => "PROPAGATION_GRAPH",
            EventKind::PropagationState => "PROPAGATION_STATE",
            EventKind::PropagationTransition => "PROPAGATION_TRANSITION",
            EventKind::PropagationDone => "PROPAGATION_DONE",
            EventKind::ScenarioStart => "SCENARIO_START",
            EventKind::ScenarioEnd => "SCENARIO_END",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::all()
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| SimError::UnknownEventKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// LogEvent
// ---------------------------------------------------------------------------

/// One immutable, append-only log record. Never edited after append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Wall-clock epoch seconds at append time.
    pub ts: f64,
    pub kind: EventKind,
    /// Free-form string → JSON mapping describing the outcome.
    pub detail: Value,
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Dual-sink append-only event log: `logs/sim.log` for humans,
/// `logs/sim.jsonl` for machines. One line per event in each; prior lines
/// are never reordered or rewritten.
#[derive(Debug, Clone)]
pub struct EventLog {
    sandbox: Sandbox,
}

impl EventLog {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    /// Append one event to both sinks. Ensures the sandbox first, so logging
    /// is safe even before explicit initialization. Write failures are fatal.
    pub fn append(&self, kind: EventKind, detail: Value) -> Result<()> {
        self.sandbox.ensure()?;

        let now = Local::now();
        let event = LogEvent {
            ts: now.timestamp_millis() as f64 / 1000.0,
            kind,
            detail,
        };

        let human = format!(
            "{} | {} | {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            kind,
            serde_json::to_string(&event.detail)?
        );
        io::append_line(&paths::sim_log_path(self.sandbox.root()), &human)?;

        let machine = serde_json::to_string(&event)?;
        io::append_line(&paths::sim_jsonl_path(self.sandbox.root()), &machine)?;
        Ok(())
    }

    /// Parse the machine sink back into events, in append order.
    pub fn read_events(&self) -> Result<Vec<LogEvent>> {
        let path = paths::sim_jsonl_path(self.sandbox.root());
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path)?;
        let mut events = Vec::new();
        for line in data.lines() {
            if line.is_empty() {
                continue;
            }
            let event: LogEvent = serde_json::from_str(line)
                .map_err(|_| SimError::MalformedEvent(line.to_string()))?;
            events.push(event);
        }
        Ok(events)
    }

    /// Last `n` lines of the human sink, for tail-style display.
    pub fn tail(&self, n: usize) -> Result<Vec<String>> {
        let path = paths::sim_log_path(self.sandbox.root());
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = data.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|s| s.to_string()).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
