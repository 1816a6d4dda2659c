//! Key-value persistence for collection snapshots.
//!
//! Values are whole-collection JSON blobs written on every mutation; there
//! is no partial or delta persistence. [`FileStorage`] keeps one file per
//! key under a data directory, [`MemoryStorage`] backs the tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to prepare data directory `{path}`: {source}")]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read key `{key}`: {source}")]
    Read { key: String, source: std::io::Error },
    #[error("failed to write key `{key}`: {source}")]
    Write { key: String, source: std::io::Error },
}

/// String key-value store holding JSON-encoded snapshots.
///
/// All reads and writes are synchronous and whole-value.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// File-per-key storage under a data directory (`<key>.json`).
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|source| StorageError::Prepare {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Read {
                key: key.to_string(),
                source,
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Atomic-ish write via temp + rename.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let write = |tmp: &Path| -> std::io::Result<()> {
            let mut f = File::create(tmp)?;
            f.write_all(value.as_bytes())?;
            f.flush()?;
            fs::rename(tmp, &path)
        };
        write(&tmp).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| StorageError::Write {
                key: key.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        assert_eq!(storage.get("projects").unwrap(), None);
        storage.set("projects", "[]").unwrap();
        assert_eq!(storage.get("projects").unwrap().as_deref(), Some("[]"));

        storage.set("projects", "[{\"id\":\"1\"}]").unwrap();
        assert_eq!(
            storage.get("projects").unwrap().as_deref(),
            Some("[{\"id\":\"1\"}]")
        );

        storage.remove("projects").unwrap();
        assert_eq!(storage.get("projects").unwrap(), None);
        // Removing an absent key is not an error.
        storage.remove("projects").unwrap();
    }

    #[test]
    fn memory_storage_round_trips() {
        let mut storage = MemoryStorage::new();
        storage.set("currentUser", "{}").unwrap();
        assert_eq!(storage.get("currentUser").unwrap().as_deref(), Some("{}"));
        storage.remove("currentUser").unwrap();
        assert_eq!(storage.get("currentUser").unwrap(), None);
    }
}
