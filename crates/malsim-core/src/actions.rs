use crate::config::SimConfig;
use crate::error::Result;
use crate::event::{EventKind, EventLog};
use crate::propagation::{self, PropagationState};
use crate::sandbox::Sandbox;
use crate::{io, paths};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Fixed stub payload content. Harmless by construction; its size is part of
/// the logged contract.
pub const PAYLOAD_STUB: &[u8] = b"SIMULATED_PAYLOAD_DO_NOT_EXECUTE";

const AUTOSTART_MARKER: &str = "SIMULATED AUTOSTART ENTRY (NO REAL PERSISTENCE)";

const RANSOM_NOTE: &str = "SIMULATION: your files were 'locked' by a reversible rename \
inside user_files.\nNo data was encrypted.\n";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one lock pass. `skipped` counts targets whose marked name
/// already existed; those are left untouched and emit no event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LockOutcome {
    pub targets: usize,
    pub renamed: usize,
    pub skipped: usize,
}

/// Result of one undo pass. Every marked file ends up in exactly one bucket;
/// nothing is ever deleted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UndoOutcome {
    pub restored: usize,
    pub quarantined: usize,
}

impl UndoOutcome {
    pub fn total(&self) -> usize {
        self.restored + self.quarantined
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// The action set. Every action first ensures the sandbox, performs its
/// bounded filesystem effect, and logs the events that are its observable
/// contract.
#[derive(Debug, Clone)]
pub struct Simulator {
    sandbox: Sandbox,
    log: EventLog,
}

impl Simulator {
    pub fn new(root: impl Into<PathBuf>, config: SimConfig) -> Self {
        let sandbox = Sandbox::new(root, config);
        let log = EventLog::new(sandbox.clone());
        Self { sandbox, log }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write a fictitious autostart registration into `system_boot`.
    /// Idempotent: re-invocation overwrites the same file with fresh content.
    pub fn simulate_persistence(&self) -> Result<PathBuf> {
        self.sandbox.ensure()?;
        let entry = paths::autostart_path(self.sandbox.root());
        let content = format!(
            "{AUTOSTART_MARKER}\nwould_run=malsim run\ntimestamp={}\n",
            Utc::now().timestamp()
        );
        io::atomic_write(&entry, content.as_bytes())?;
        self.log.append(
            EventKind::PersistenceSimulated,
            json!({"created": entry.display().to_string()}),
        )?;
        Ok(entry)
    }

    // -----------------------------------------------------------------------
    // Duplication
    // -----------------------------------------------------------------------

    /// Write the stub payload at the sandbox root, then copy it `copies`
    /// times into `strategic_locations` with sequential numbered names.
    /// Zero copies is legal and logs only the stub-creation event.
    pub fn simulate_duplication(&self, copies: usize) -> Result<Vec<PathBuf>> {
        self.sandbox.ensure()?;
        let payload = paths::payload_stub_path(self.sandbox.root());
        io::atomic_write(&payload, PAYLOAD_STUB)?;
        self.log.append(
            EventKind::PayloadStubCreated,
            json!({"path": payload.display().to_string(), "size": PAYLOAD_STUB.len()}),
        )?;

        let strategic = paths::strategic_locations(self.sandbox.root());
        let mut created = Vec::with_capacity(copies);
        for i in 1..=copies {
            let dest = strategic.join(format!("copy_{i}_payload_stub.bin"));
            std::fs::copy(&payload, &dest)?;
            self.log.append(
                EventKind::DuplicationSimulated,
                json!({
                    "src": payload.display().to_string(),
                    "dest": dest.display().to_string(),
                }),
            )?;
            created.push(dest);
        }
        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Scan
    // -----------------------------------------------------------------------

    /// Enumerate all regular files under `user_files` recursively in sorted
    /// order and log their metadata. Mutates nothing.
    pub fn simulate_scan(&self) -> Result<Vec<PathBuf>> {
        self.sandbox.ensure()?;
        let user_files = paths::user_files(self.sandbox.root());
        let files = io::collect_files_sorted(&user_files)?;

        self.log.append(
            EventKind::ScanStarted,
            json!({
                "directory": user_files.display().to_string(),
                "count": files.len(),
            }),
        )?;
        for file in &files {
            let size = std::fs::metadata(file)?.len();
            self.log.append(
                EventKind::FileFound,
                json!({"path": file.display().to_string(), "size": size}),
            )?;
        }
        self.log
            .append(EventKind::ScanFinished, json!({"count": files.len()}))?;
        Ok(files)
    }

    // -----------------------------------------------------------------------
    // Lock (fake ransomware)
    // -----------------------------------------------------------------------

    /// Drop the ransom note, then rename every other file under `user_files`
    /// by appending the `.locked` marker. A target whose marked name already
    /// exists is skipped without error or event. No content byte is ever
    /// modified, only names.
    pub fn simulate_lock(&self) -> Result<LockOutcome> {
        self.sandbox.ensure()?;
        let note = paths::ransom_note_path(self.sandbox.root());
        io::atomic_write(&note, RANSOM_NOTE.as_bytes())?;
        self.log.append(
            EventKind::RansomNoteCreated,
            json!({"path": note.display().to_string()}),
        )?;

        let user_files = paths::user_files(self.sandbox.root());
        let targets: Vec<PathBuf> = io::collect_files_sorted(&user_files)?
            .into_iter()
            .filter(|p| p.file_name().map(|n| n != paths::RANSOM_NOTE_FILE).unwrap_or(true))
            .collect();
        self.log
            .append(EventKind::RansomTargets, json!({"count": targets.len()}))?;

        let mut outcome = LockOutcome {
            targets: targets.len(),
            ..LockOutcome::default()
        };
        for target in &targets {
            let locked = paths::locked_name(target);
            if locked.exists() {
                outcome.skipped += 1;
                continue;
            }
            std::fs::rename(target, &locked)?;
            self.log.append(
                EventKind::RansomRenameSimulated,
                json!({
                    "before": target.display().to_string(),
                    "after": locked.display().to_string(),
                }),
            )?;
            outcome.renamed += 1;
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Undo lock
    // -----------------------------------------------------------------------

    /// Strip one `.locked` marker from every marked file under `user_files`,
    /// in sorted order. On a name collision the marked file moves into
    /// `quarantine` instead of overwriting; the pre-existing file is left
    /// untouched. Guarantee: no file is ever deleted — every marked file ends
    /// up restored or safely archived.
    pub fn undo_lock(&self) -> Result<UndoOutcome> {
        self.sandbox.ensure()?;
        let user_files = paths::user_files(self.sandbox.root());
        let locked: Vec<PathBuf> = io::collect_files_sorted(&user_files)?
            .into_iter()
            .filter(|p| paths::is_locked(p))
            .collect();

        let mut outcome = UndoOutcome::default();
        for path in &locked {
            let Some(unlocked) = paths::strip_locked(path) else {
                continue;
            };
            if unlocked.exists() {
                let dest = self.quarantine_slot(&unlocked)?;
                std::fs::rename(path, &dest)?;
                self.log.append(
                    EventKind::UndoConflictMovedToQuarantine,
                    json!({
                        "src": path.display().to_string(),
                        "dest": dest.display().to_string(),
                    }),
                )?;
                outcome.quarantined += 1;
            } else {
                std::fs::rename(path, &unlocked)?;
                self.log.append(
                    EventKind::UndoRename,
                    json!({
                        "before": path.display().to_string(),
                        "after": unlocked.display().to_string(),
                    }),
                )?;
                outcome.restored += 1;
            }
        }
        self.log
            .append(EventKind::UndoDone, json!({"reverted": outcome.total()}))?;
        Ok(outcome)
    }

    /// A free quarantine path for `unlocked`'s base name, stamped with the
    /// current epoch second. A numeric suffix resolves same-second collisions
    /// so the returned path is always unique.
    fn quarantine_slot(&self, unlocked: &Path) -> Result<PathBuf> {
        let quarantine = paths::quarantine(self.sandbox.root());
        let base = unlocked
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let ts = Utc::now().timestamp();
        let mut dest = quarantine.join(format!("{base}.{ts}"));
        let mut n = 1u32;
        while dest.exists() {
            dest = quarantine.join(format!("{base}.{ts}.{n}"));
            n += 1;
        }
        Ok(dest)
    }

    // -----------------------------------------------------------------------
    // Propagation
    // -----------------------------------------------------------------------

    /// Walk the propagation graph, logging every step. Touches no files.
    pub fn simulate_propagation(&self) -> Result<PropagationState> {
        self.sandbox.ensure()?;
        propagation::traverse(&self.log, self.sandbox.config())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
