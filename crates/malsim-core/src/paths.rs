use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const USER_FILES_DIR: &str = "user_files";
pub const SYSTEM_BOOT_DIR: &str = "system_boot";
pub const STRATEGIC_DIR: &str = "strategic_locations";
pub const LOGS_DIR: &str = "logs";
pub const QUARANTINE_DIR: &str = "quarantine";

pub const SIM_LOG_FILE: &str = "sim.log";
pub const SIM_JSONL_FILE: &str = "sim.jsonl";
pub const CONFIG_FILE: &str = "config.yaml";

pub const AUTOSTART_FILE: &str = "autostart_entry.txt";
pub const PAYLOAD_STUB_FILE: &str = "payload_stub.bin";
pub const RANSOM_NOTE_FILE: &str = "LOCKED.txt";

/// Reversible marker appended to a file name in place of real encryption.
pub const LOCKED_SUFFIX: &str = ".locked";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn user_files(root: &Path) -> PathBuf {
    root.join(USER_FILES_DIR)
}

pub fn system_boot(root: &Path) -> PathBuf {
    root.join(SYSTEM_BOOT_DIR)
}

pub fn strategic_locations(root: &Path) -> PathBuf {
    root.join(STRATEGIC_DIR)
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join(LOGS_DIR)
}

pub fn quarantine(root: &Path) -> PathBuf {
    root.join(QUARANTINE_DIR)
}

pub fn sim_log_path(root: &Path) -> PathBuf {
    logs_dir(root).join(SIM_LOG_FILE)
}

pub fn sim_jsonl_path(root: &Path) -> PathBuf {
    logs_dir(root).join(SIM_JSONL_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn autostart_path(root: &Path) -> PathBuf {
    system_boot(root).join(AUTOSTART_FILE)
}

pub fn payload_stub_path(root: &Path) -> PathBuf {
    root.join(PAYLOAD_STUB_FILE)
}

pub fn ransom_note_path(root: &Path) -> PathBuf {
    user_files(root).join(RANSOM_NOTE_FILE)
}

// ---------------------------------------------------------------------------
// Locked-marker helpers
// ---------------------------------------------------------------------------

/// True if the file name carries the `.locked` marker.
pub fn is_locked(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(LOCKED_SUFFIX))
}

/// The same path with the `.locked` marker appended to the file name.
pub fn locked_name(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(LOCKED_SUFFIX);
    path.with_file_name(name)
}

/// The same path with exactly one trailing `.locked` marker stripped.
/// Returns `None` if the name does not carry the marker.
pub fn strip_locked(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let base = name.strip_suffix(LOCKED_SUFFIX)?;
    Some(path.with_file_name(base))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/sandbox");
        assert_eq!(user_files(root), PathBuf::from("/tmp/sandbox/user_files"));
        assert_eq!(
            sim_log_path(root),
            PathBuf::from("/tmp/sandbox/logs/sim.log")
        );
        assert_eq!(
            sim_jsonl_path(root),
            PathBuf::from("/tmp/sandbox/logs/sim.jsonl")
        );
        assert_eq!(
            ransom_note_path(root),
            PathBuf::from("/tmp/sandbox/user_files/LOCKED.txt")
        );
    }

    #[test]
    fn locked_marker_roundtrip() {
        let p = Path::new("/tmp/sandbox/user_files/doc1.txt");
        let locked = locked_name(p);
        assert_eq!(locked, PathBuf::from("/tmp/sandbox/user_files/doc1.txt.locked"));
        assert!(is_locked(&locked));
        assert!(!is_locked(p));
        assert_eq!(strip_locked(&locked), Some(p.to_path_buf()));
    }

    #[test]
    fn strip_removes_exactly_one_marker() {
        let double = Path::new("/tmp/doc1.txt.locked.locked");
        let once = strip_locked(double).unwrap();
        assert_eq!(once, PathBuf::from("/tmp/doc1.txt.locked"));
        assert!(is_locked(&once));
    }

    #[test]
    fn strip_rejects_unmarked() {
        assert_eq!(strip_locked(Path::new("/tmp/doc1.txt")), None);
    }
}
