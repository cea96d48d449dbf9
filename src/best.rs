use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::app_dirs::AppDirs;

/// Key the personal best is stored under.
pub const BEST_WPM_KEY: &str = "typing_best_wpm";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("store contents are not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Key-value store kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::store_path().unwrap_or_else(|| PathBuf::from("typetest_store.json")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // a corrupt file is replaced rather than blocking every future save
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&entries)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-process store, for tests and for running without a writable data dir.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps the highest WPM ever reached. Never fails: store problems are logged
/// and treated as "no best known".
#[derive(Debug)]
pub struct BestScoreTracker<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> BestScoreTracker<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn load(&self) -> Option<u32> {
        match self.store.get(BEST_WPM_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(best) => Some(best),
                Err(e) => {
                    warn!(value = %raw, error = %e, "ignoring unparsable best score");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read best score");
                None
            }
        }
    }

    /// Returns `Some(wpm)` when `wpm` beats the stored best.
    pub fn record(&mut self, wpm: u32) -> Option<u32> {
        let prior = self.load().unwrap_or(0);
        if wpm <= prior {
            return None;
        }

        if let Err(e) = self.store.set(BEST_WPM_KEY, &wpm.to_string()) {
            warn!(error = %e, wpm, "could not save best score");
        } else {
            info!(wpm, prior, "new best score");
        }
        Some(wpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::with_path(dir.path().join("store.json"));
        assert_eq!(store.get(BEST_WPM_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_set_then_get() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = FileStore::with_path(&path);

        store.set(BEST_WPM_KEY, "42").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::with_path(&path);
        assert_eq!(reopened.get(BEST_WPM_KEY).unwrap(), Some("42".to_string()));
        assert_eq!(reopened.get("other").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn file_store_corrupt_file_errors_on_get_and_recovers_on_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, b"{ not json").unwrap();
        let mut store = FileStore::with_path(&path);

        assert!(matches!(store.get(BEST_WPM_KEY), Err(StoreError::Json(_))));
        store.set(BEST_WPM_KEY, "10").unwrap();
        assert_eq!(store.get(BEST_WPM_KEY).unwrap(), Some("10".to_string()));
    }

    #[test]
    fn tracker_defaults_to_unknown() {
        let tracker = BestScoreTracker::new(MemoryStore::new());
        assert_eq!(tracker.load(), None);
    }

    #[test]
    fn tracker_only_moves_up() {
        let mut tracker = BestScoreTracker::new(MemoryStore::with_entry(BEST_WPM_KEY, "40"));

        assert_eq!(tracker.record(55), Some(55));
        assert_eq!(tracker.load(), Some(55));

        assert_eq!(tracker.record(30), None);
        assert_eq!(tracker.record(55), None);
        assert_eq!(tracker.load(), Some(55));
    }

    #[test]
    fn tracker_zero_wpm_is_never_a_best() {
        let mut tracker = BestScoreTracker::new(MemoryStore::new());
        assert_eq!(tracker.record(0), None);
        assert_eq!(tracker.load(), None);
    }

    #[test]
    fn tracker_treats_garbage_as_zero() {
        let mut tracker = BestScoreTracker::new(MemoryStore::with_entry(BEST_WPM_KEY, "fast"));

        assert_eq!(tracker.load(), None);
        assert_eq!(tracker.record(12), Some(12));
        assert_eq!(tracker.load(), Some(12));
    }

    #[test]
    fn tracker_survives_broken_store() {
        let mut tracker = BestScoreTracker::new(BrokenStore);

        assert_eq!(tracker.load(), None);
        assert_eq!(tracker.record(70), Some(70));
    }
}
