use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::types::{HistoryFile, HistorySnapshot, Totals, HISTORY_VERSION};
use crate::error::PersistenceError;

/// Append-only store of totals snapshots
pub trait HistoryStore {
    /// Record one run's totals under `timestamp`
    fn append(&self, timestamp: &str, totals: &Totals) -> Result<(), PersistenceError>;

    /// Every stored snapshot, unordered. Each call re-reads the store.
    fn retrieve_all(&self) -> Result<Vec<HistorySnapshot>, PersistenceError>;
}

/// Get the default history file path (~/.config/table-tipper/history.json)
pub fn get_history_path() -> PathBuf {
    crate::config::get_config_dir().join("history.json")
}

/// History kept in a single JSON file, rewritten atomically on append
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&self, timestamp: &str, totals: &Totals) -> Result<(), PersistenceError> {
        let mut file = load_history_file(&self.path)?;
        if file.insert(timestamp, totals.clone()) {
            warn!("history already had a snapshot at {}, replacing it", timestamp);
        }
        save_history_file(&self.path, &file)?;
        debug!(%timestamp, path = %self.path.display(), "appended history snapshot");
        Ok(())
    }

    fn retrieve_all(&self) -> Result<Vec<HistorySnapshot>, PersistenceError> {
        Ok(load_history_file(&self.path)?.snapshots())
    }
}

/// Load the history document.
///
/// If the file doesn't exist, returns an empty history.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history_file(path: &Path) -> Result<HistoryFile, PersistenceError> {
    if !path.exists() {
        return Ok(HistoryFile::new());
    }

    let file = File::open(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let history: HistoryFile =
        serde_json::from_reader(file).map_err(|source| PersistenceError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    if history.version != HISTORY_VERSION {
        return Err(PersistenceError::UnsupportedVersion(history.version));
    }

    Ok(history)
}

/// Save the history document atomically.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_history_file(path: &Path, history: &HistoryFile) -> Result<(), PersistenceError> {
    let io_err = |source: std::io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut file = AtomicWriteFile::open(path).map_err(io_err)?;
    serde_json::to_writer_pretty(&mut file, history)
        .map_err(|e| io_err(std::io::Error::from(e)))?;
    file.write_all(b"\n").map_err(io_err)?;
    file.commit().map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, u32)]) -> Totals {
        pairs.iter().map(|(n, t)| (n.to_string(), *t)).collect()
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        assert!(store.retrieve_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));

        store
            .append("2026-10-13 08:00:00", &totals(&[("Alice", 40), ("Bob", 35)]))
            .unwrap();
        store
            .append("2026-10-14 08:00:00", &totals(&[("Alice", 42), ("Bob", 44)]))
            .unwrap();

        let mut snapshots = store.retrieve_all().unwrap();
        snapshots.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].totals["Alice"], 40);
        assert_eq!(snapshots[1].totals["Bob"], 44);
    }

    #[test]
    fn test_retrieve_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        store.append("2026-10-14 08:00:00", &totals(&[("Alice", 1)])).unwrap();

        let first = store.retrieve_all().unwrap();
        let second = store.retrieve_all().unwrap();
        assert_eq!(first, second);

        store.append("2026-10-14 09:00:00", &totals(&[("Alice", 2)])).unwrap();
        assert_eq!(store.retrieve_all().unwrap().len(), 2);
    }

    #[test]
    fn test_same_timestamp_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        store.append("2026-10-14 08:00:00", &totals(&[("Alice", 1)])).unwrap();
        store.append("2026-10-14 08:00:00", &totals(&[("Alice", 9)])).unwrap();

        let snapshots = store.retrieve_all().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].totals["Alice"], 9);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let store = JsonHistoryStore::new(path.clone());
        store.append("2026-10-14 08:00:00", &totals(&[("Alice", 1)])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, r#"{"version": 7, "snapshots": {}}"#).unwrap();

        let result = JsonHistoryStore::new(path).retrieve_all();
        assert!(matches!(result, Err(PersistenceError::UnsupportedVersion(7))));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonHistoryStore::new(path.clone());
        assert!(matches!(store.retrieve_all(), Err(PersistenceError::Corrupt { .. })));
        // A corrupt file is never overwritten by append
        assert!(store.append("2026-10-14 08:00:00", &Totals::new()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }
}
