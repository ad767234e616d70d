//! Client-local preference storage.
//!
//! This module provides:
//!
//! - [`PreferenceStore`]: the key/value seam the controller persists through
//! - [`MemoryStore`]: shared in-memory store, with failure injection
//! - [`FileStore`]: a JSON object file on disk
//!
//! Reads of the override are best-effort: an unreadable store or a value that
//! is not a JSON boolean counts as "no override".

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::debug;

use crate::error::StorageError;
use crate::preference::ThemePreference;

/// A string key/value store, in the manner of browser local storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads the persisted override, treating every failure as absent.
pub fn read_override(store: &dyn PreferenceStore, key: &str) -> Option<ThemePreference> {
    match store.get(key) {
        Ok(Some(raw)) => {
            let parsed = ThemePreference::from_json(&raw);
            if parsed.is_none() {
                debug!(key, raw = %raw, "ignoring malformed persisted theme preference");
            }
            parsed
        }
        Ok(None) => None,
        Err(error) => {
            debug!(key, %error, "persisted theme preference unreadable");
            None
        }
    }
}

/// Persists a preference as a JSON boolean.
pub fn write_override(
    store: &mut dyn PreferenceStore,
    key: &str,
    pref: ThemePreference,
) -> Result<(), StorageError> {
    store.set(key, &pref.to_json())
}
