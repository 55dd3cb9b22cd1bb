//! Key-value storage substrate.
//!
//! The rest of the crate only ever sees the [`KeyValueStore`] trait, so the
//! substrate can be swapped per platform: files on desktop, an in-memory
//! map in tests, a mobile shell's preference store behind a thin adapter.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable, process-surviving storage of opaque string-keyed blobs.
///
/// Contract: `get` returns `Ok(None)` for a key that was never written
/// (absence is not an error), and `remove` of a missing key succeeds.
/// Each operation is a single atomic read or write per key; a write either
/// completes or fails entirely, never half-written.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is Ok.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A shared substrate is still a substrate. Lets callers keep a handle to
/// the store they hand to [`SessionStore`](crate::persistence::SessionStore).
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// File-per-key store rooted at a data directory.
///
/// Writes go to `<key>.tmp` first and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;

        let file_path = self.path_for(key);
        let temp_path = self.dir.join(format!("{key}.tmp"));

        fs::write(&temp_path, value).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::rename(&temp_path, &file_path).map_err(|e| StorageError::Write(e.to_string()))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write(e.to_string())),
        }
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// HashMap-backed store for tests and embedding.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
