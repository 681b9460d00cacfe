use std::path::{Path, PathBuf};

/// Resolve the sandbox root directory.
///
/// Priority:
/// 1. `--root` flag / `MALSIM_ROOT` env var (passed in as `explicit`)
/// 2. `demo_data/` under the current directory
///
/// The default keeps every simulated effect inside one clearly named
/// subdirectory instead of scattering role directories across the cwd.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("demo_data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())), dir.path());
    }

    #[test]
    fn default_is_demo_data_under_cwd() {
        let root = resolve_root(None);
        assert!(root.ends_with("demo_data"));
    }
}
