//! Durable key-value storage.
//!
//! The save manager only needs string values under string keys. Two stores
//! are provided:
//!
//! - [`MemoryStore`]: a map in process memory, for tests and throwaway
//!   sessions.
//! - [`FileStore`]: one file per key inside a directory. Writes go to a
//!   temporary file first and are renamed into place, so a crash mid-write
//!   leaves the previous value intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::StoreError;

/// String values under string keys.
pub trait KeyValueStore {
    /// Read a value, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Is there a value under `key`?
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(key))
    }
}

/// Directory-backed store: the value of `key` lives in `<dir>/<key>`.
///
/// Keys are used as file names verbatim and must not contain path
/// separators. The directory is created on the first write.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key)(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        let path = self.path(key);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, value).map_err(io_error(key))?;
        fs::rename(&tmp_path, &path).map_err(io_error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key)(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("card-match-store-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        assert!(!store.contains("a").unwrap());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store() {
        let dir = scratch_dir("basic");
        let _ = fs::remove_dir_all(&dir);
        let mut store = FileStore::new(&dir);

        assert!(store.get("slot").unwrap().is_none());
        store.set("slot", "{\"x\":1}").unwrap();
        assert!(store.contains("slot").unwrap());
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("{\"x\":1}"));
        assert!(!dir.join("slot.tmp").exists());

        store.remove("slot").unwrap();
        store.remove("slot").unwrap();
        assert!(!store.contains("slot").unwrap());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_reports_io_failure() {
        let dir = scratch_dir("blocked");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        // A directory where the value file should go cannot be read as text.
        fs::create_dir_all(dir.join("slot")).unwrap();

        let store = FileStore::new(&dir);
        let err = store.get("slot").unwrap_err();
        assert!(matches!(err, StoreError::Io { ref key, .. } if key == "slot"));

        let _ = fs::remove_dir_all(&dir);
    }
}
