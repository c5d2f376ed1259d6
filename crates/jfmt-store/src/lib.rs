pub mod action;
pub mod buffer;
pub mod config;
pub mod history;
pub mod kv;

pub use action::{apply, Applied, ActionError};
pub use buffer::{clear_last_content, load_last_content, save_last_content};
pub use config::Config;
pub use history::History;
pub use kv::{FileKv, KvStore, MemoryKv};

use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the store root.
pub const HOME_ENV: &str = "JFMT_HOME";

/// Return the per-user store root.
/// `$JFMT_HOME` wins; otherwise `<data_dir>/jfmt`, falling back to `~/.jfmt`.
pub fn store_root() -> PathBuf {
    resolve_store_root(std::env::var_os(HOME_ENV).map(PathBuf::from))
}

fn resolve_store_root(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        dir
    } else if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("jfmt")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".jfmt")
    } else {
        PathBuf::from(".jfmt-store")
    }
}

/// Path of the config file under a store root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join("config.json")
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive file lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_dir_wins() {
        let root = resolve_store_root(Some(PathBuf::from("/tmp/jfmt-home")));
        assert_eq!(root, PathBuf::from("/tmp/jfmt-home"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let root = resolve_store_root(Some(PathBuf::new()));
        assert!(!root.as_os_str().is_empty());
        assert_ne!(root, PathBuf::new());
    }

    #[test]
    fn write_atomic_creates_parent_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("test.txt");
        write_atomic(&path, b"hello world").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn write_atomic_replaces_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blob");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let leftovers = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn lock_file_acquires_and_drops() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("LOCK");
        let guard = lock_file(&lock_path).unwrap();
        assert!(lock_path.exists());
        drop(guard);
        let _again = lock_file(&lock_path).unwrap();
    }
}
