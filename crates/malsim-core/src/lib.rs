//! Sandboxed malware-behavior simulation engine. All effects are confined to
//! one directory subtree and fully reversible: persistence and duplication
//! write labeled stub files, "locking" is a reversible rename, propagation is
//! a pure log trace.

pub mod actions;
pub mod config;
pub mod error;
pub mod event;
pub mod io;
pub mod paths;
pub mod propagation;
pub mod sandbox;
pub mod scenario;

pub use actions::{LockOutcome, Simulator, UndoOutcome};
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use event::{EventKind, EventLog, LogEvent};
pub use propagation::PropagationState;
pub use sandbox::Sandbox;
