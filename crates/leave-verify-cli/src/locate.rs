use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "leave-verify.yaml";

/// Find the config file to load.
///
/// Priority:
/// 1. `--config` flag / `LEAVE_VERIFY_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `leave-verify.yaml`
/// 3. None: use the built-in scenario
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        assert_eq!(resolve_config_path(Some(&path)), Some(path));
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();
        let deep = dir.path().join("a/b/c");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_upward(&deep), Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_FILE)).unwrap();
        let found = find_upward(dir.path());
        assert_ne!(found, Some(dir.path().join(CONFIG_FILE)));
    }
}
