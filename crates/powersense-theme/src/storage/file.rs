//! JSON-file preference store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::PreferenceStore;
use crate::error::StorageError;

/// A store persisted as a flat JSON object of string values.
///
/// A missing or empty file is an empty store. The file is re-read on every
/// access, so edits made by other processes are picked up by the next read.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let source = match std::fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if source.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&source).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads for a write; a corrupt file is replaced rather than kept forever.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Malformed { path, source }) => {
                warn!(path = %path.display(), error = %source, "discarding malformed preference file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
