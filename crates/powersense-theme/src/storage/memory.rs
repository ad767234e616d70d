//! In-memory preference store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::PreferenceStore;
use crate::error::StorageError;

/// A store held in memory.
///
/// Clones share the same entries, so a host (or a test) can keep a handle
/// while the controller owns another. Failure modes of browser storage can be
/// simulated with [`set_unavailable`](Self::set_unavailable) and
/// [`set_quota`](Self::set_quota).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    unavailable: bool,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning the store for chaining.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
        self
    }

    /// When set, every operation fails with [`StorageError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    /// Caps the total size of keys and values, in bytes.
    pub fn set_quota(&self, quota: Option<usize>) {
        self.inner.borrow_mut().quota = quota;
    }

    /// Returns the stored value regardless of failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemoryInner {
    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn size_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        inner.check_available()?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        inner.check_available()?;
        if let Some(limit) = inner.quota {
            if inner.size_with(key, value) > limit {
                return Err(StorageError::QuotaExceeded { limit });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        inner.check_available()?;
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let handle = MemoryStore::new();
        let mut owned = handle.clone();
        owned.set("k", "v").unwrap();
        assert_eq!(handle.raw("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_unavailable() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Unavailable)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota_exceeded() {
        let mut store = MemoryStore::new();
        store.set_quota(Some(8));
        store.set("key", "true").unwrap();
        // Replacing a value only counts the new value.
        store.set("key", "false").unwrap();
        let err = store.set("another", "true").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit: 8 }));
        assert_eq!(store.len(), 1);
    }
}
