//! Cross-platform utilities for directory resolution and file operations.
//!
//! This module provides OS-agnostic state directory resolution with
//! permission fallback chains to handle various deployment scenarios.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that pins the state directory (tests, CI, portable installs).
pub const STATE_DIR_ENV: &str = "PTIMER_STATE_DIR";

const DIR_NAME: &str = ".ptimer";

/// Get the state directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (`PTIMER_STATE_DIR` or config)
/// 2. Home directory (~/.ptimer)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
///
/// Each directory is validated for write access before being selected.
pub fn get_state_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.to_path_buf());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(DIR_NAME);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        tracing::warn!(
            "Cannot write to {}. Trying fallback locations.",
            dir.display()
        );
    }

    // - Linux: ~/.local/share/ptimer
    // - macOS: ~/Library/Application Support/ptimer
    // - Windows: C:\Users\<User>\AppData\Local\ptimer
    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("ptimer");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(DIR_NAME);
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set PTIMER_STATE_DIR.",
    )?;
    Ok(dir)
}

/// Directory override taken from the environment, if set and non-empty.
pub fn env_override() -> Option<PathBuf> {
    std::env::var_os(STATE_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Ensure a directory exists and is writable by the current user.
///
/// Creates the directory if it doesn't exist, then tests write access
/// by creating and removing a temporary file.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // Cleanup test file, ignore errors (file might be held by antivirus on Windows)
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// Lock and session file locations inside a state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub dir: PathBuf,
    pub lock: PathBuf,
    pub session: PathBuf,
}

impl StatePaths {
    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            lock: dir.join("session.lock"),
            session: dir.join("session.json"),
            dir,
        }
    }
}

/// Resolves the state directory and the files in it.
pub fn state_paths(override_dir: Option<&Path>) -> Result<StatePaths> {
    Ok(StatePaths::in_dir(get_state_dir(override_dir)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_dir_takes_priority() {
        let temp = TempDir::new().unwrap();
        let override_path = temp.path().to_path_buf();

        let result = get_state_dir(Some(override_path.as_path()));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), override_path);
    }

    #[test]
    fn test_ensure_writable_creates_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("c");

        let result = ensure_writable(&nested);
        assert!(result.is_ok());
        assert!(nested.exists());
    }

    #[test]
    fn test_state_paths_with_override() {
        let temp = TempDir::new().unwrap();
        let override_path = temp.path().to_path_buf();

        let paths = state_paths(Some(override_path.as_path())).unwrap();
        assert_eq!(paths.dir, override_path);
        assert_eq!(paths.lock, override_path.join("session.lock"));
        assert_eq!(paths.session, override_path.join("session.json"));
    }
}
