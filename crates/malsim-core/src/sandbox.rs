use crate::config::SimConfig;
use crate::error::Result;
use crate::{io, paths};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Sandbox
// ---------------------------------------------------------------------------

/// The confined directory tree all simulated effects live in. The root path
/// is an explicit constructor argument so each test gets an isolated tree.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
    config: SimConfig,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>, config: SimConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Create the five role directories if absent and seed `user_files` with
    /// labeled documents only when it is empty. Idempotent and never
    /// destructive; safe to call from every operation unconditionally.
    /// Storage failures propagate — the sandbox is unusable without write
    /// access.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            paths::user_files(&self.root),
            paths::system_boot(&self.root),
            paths::strategic_locations(&self.root),
            paths::logs_dir(&self.root),
            paths::quarantine(&self.root),
        ] {
            io::ensure_dir(&dir)?;
        }
        self.seed_user_files()
    }

    fn seed_user_files(&self) -> Result<()> {
        let user_files = paths::user_files(&self.root);
        if std::fs::read_dir(&user_files)?.next().is_some() {
            return Ok(());
        }
        for i in 1..=self.config.seed_files {
            let doc = user_files.join(format!("doc{i}.txt"));
            io::atomic_write(
                &doc,
                format!("Document {i}: security awareness course notes.\n").as_bytes(),
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
