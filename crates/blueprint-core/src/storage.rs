//! Persistence backends.
//!
//! The store persists exactly one serialized record under a fixed key, so
//! the backend contract is a synchronous key-value byte store: `get` returns
//! the bytes if the key exists, `set` replaces them.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// Fixed key under which the store persists its snapshot.
pub const STORAGE_KEY: &str = "blueprint.state";

/// Synchronous key-value byte store.
pub trait StorageBackend {
    /// Read the bytes stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the bytes stored under `key`.
    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// In-memory backend. Used by tests and by embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// File-per-key backend rooted in a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// failed write never truncates the previous snapshot.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create the backend, making sure the root directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create storage root {}", root.display()))?;
        Ok(Self { root })
    }

    /// Platform default root (`<data_dir>/blueprint`), if one is known.
    #[must_use]
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("blueprint"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed constants, but keep the mapping safe for any input.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(name)
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read(err.to_string())),
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|err| StorageError::Write(err.to_string()))?;
        fs::rename(&tmp, &path).map_err(|err| StorageError::Write(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{FileBackend, MemoryBackend, STORAGE_KEY, StorageBackend};

    #[test]
    fn memory_backend_roundtrips() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get(STORAGE_KEY).unwrap(), None);

        backend.set(STORAGE_KEY, b"payload").unwrap();
        assert_eq!(backend.get(STORAGE_KEY).unwrap().as_deref(), Some(&b"payload"[..]));

        backend.set(STORAGE_KEY, b"replaced").unwrap();
        assert_eq!(backend.get(STORAGE_KEY).unwrap().as_deref(), Some(&b"replaced"[..]));
    }

    #[test]
    fn file_backend_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("store")).unwrap();

        assert_eq!(backend.get(STORAGE_KEY).unwrap(), None);
        backend.set(STORAGE_KEY, b"{}").unwrap();
        assert_eq!(backend.get(STORAGE_KEY).unwrap().as_deref(), Some(&b"{}"[..]));

        // A second backend over the same root sees the same bytes.
        let other = FileBackend::new(dir.path().join("store")).unwrap();
        assert_eq!(other.get(STORAGE_KEY).unwrap().as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn file_backend_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path()).unwrap();
        backend.set("a/b:c", b"x").unwrap();
        assert_eq!(backend.get("a/b:c").unwrap().as_deref(), Some(&b"x"[..]));
    }
}
