use crate::error::Result;
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Tunables for one sandbox. Passed explicitly into [`crate::Simulator`];
/// the core reads no ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Number of labeled seed documents written when `user_files` is empty.
    #[serde(default = "default_seed_files")]
    pub seed_files: usize,

    /// Copy count used by the full scenario's duplication step.
    #[serde(default = "default_copies")]
    pub default_copies: usize,

    /// Bounds (ms) of the cosmetic pause between propagation transitions.
    #[serde(default = "default_pause_min")]
    pub pause_min_ms: u64,
    #[serde(default = "default_pause_max")]
    pub pause_max_ms: u64,
}

fn default_seed_files() -> usize {
    5
}

fn default_copies() -> usize {
    3
}

fn default_pause_min() -> u64 {
    20
}

fn default_pause_max() -> u64 {
    80
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed_files: default_seed_files(),
            default_copies: default_copies(),
            pause_min_ms: default_pause_min(),
            pause_max_ms: default_pause_max(),
        }
    }
}

impl SimConfig {
    /// Load `<root>/config.yaml` if present, otherwise the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: SimConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
