use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::event::{EventKind, EventLog};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// PropagationState
// ---------------------------------------------------------------------------

/// Stages of the simulated propagation run. The graph is a simple path:
/// every state except the last has exactly one successor, so a traversal
/// cannot branch or cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropagationState {
    Idle,
    Discovery,
    Staging,
    Execution,
    Cleanup,
}

impl PropagationState {
    pub fn all() -> &'static [PropagationState] {
        &[
            PropagationState::Idle,
            PropagationState::Discovery,
            PropagationState::Staging,
            PropagationState::Execution,
            PropagationState::Cleanup,
        ]
    }

    pub fn initial() -> PropagationState {
        PropagationState::Idle
    }

    pub fn terminal() -> PropagationState {
        PropagationState::Cleanup
    }

    pub fn next(self) -> Option<PropagationState> {
        let all = PropagationState::all();
        all.get(self as usize + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropagationState::Idle => "IDLE",
            PropagationState::Discovery => "DISCOVERY",
            PropagationState::Staging => "STAGING",
            PropagationState::Execution => "EXECUTION",
            PropagationState::Cleanup => "CLEANUP",
        }
    }
}

impl fmt::Display for PropagationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropagationState {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        PropagationState::all()
            .iter()
            .find(|state| state.as_str() == s)
            .copied()
            .ok_or_else(|| SimError::UnknownState(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationEdge {
    pub from: PropagationState,
    pub to: PropagationState,
}

/// The transition table, derived from the successor function.
pub fn edges() -> Vec<PropagationEdge> {
    PropagationState::all()
        .windows(2)
        .map(|w| PropagationEdge {
            from: w[0],
            to: w[1],
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Walk the full graph, logging each step. Purely log-driven — touches no
/// files beyond the log sinks. Stateless between invocations: every call
/// starts at Idle and completes at Cleanup. The per-edge pause is uniform
/// within the configured bounds and carries no semantic meaning.
pub fn traverse(log: &EventLog, config: &SimConfig) -> Result<PropagationState> {
    let states: Vec<&str> = PropagationState::all().iter().map(|s| s.as_str()).collect();
    let edge_list: Vec<[&str; 2]> = edges()
        .iter()
        .map(|e| [e.from.as_str(), e.to.as_str()])
        .collect();
    log.append(
        EventKind::PropagationGraph,
        json!({"states": states, "edges": edge_list}),
    )?;

    let mut current = PropagationState::initial();
    log.append(EventKind::PropagationState, json!({"state": current.as_str()}))?;

    while let Some(next) = current.next() {
        pause(config.pause_min_ms, config.pause_max_ms);
        log.append(
            EventKind::PropagationTransition,
            json!({"frm": current.as_str(), "to": next.as_str()}),
        )?;
        current = next;
    }

    log.append(EventKind::PropagationDone, json!({"final": current.as_str()}))?;
    Ok(current)
}

fn pause(min_ms: u64, max_ms: u64) {
    let upper = max_ms.max(min_ms);
    let ms = rand::thread_rng().gen_range(min_ms..=upper);
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
