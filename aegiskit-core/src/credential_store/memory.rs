//! In-memory credential store.
//!
//! This implementation is NOT secure for production use. Secrets live in process memory
//! and vanish with it. It backs unit tests and hosts that have no secure storage.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialStore, StorageError, StorageResult};

/// In-memory credential store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, secret: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), secret.to_string());
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> StorageResult<usize> {
        self.entries
            .read()
            .map(|entries| entries.len())
            .map_err(|e| StorageError::Read(e.to_string()))
    }

    /// Returns `true` if no entries are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> StorageResult<bool> {
        self.len().map(|len| len == 0)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: String) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: String, secret: String) -> StorageResult<()> {
        self.entries
            .write()
            .map_err(|e| StorageError::Write(e.to_string()))?
            .insert(key, secret);
        Ok(())
    }

    fn delete(&self, key: String) -> StorageResult<()> {
        self.entries
            .write()
            .map_err(|e| StorageError::Delete(e.to_string()))?
            .remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryCredentialStore::new();
        assert!(store.get("k".to_string()).unwrap().is_none());

        store.set("k".to_string(), "secret".to_string()).unwrap();
        assert_eq!(store.get("k".to_string()).unwrap().as_deref(), Some("secret"));
        assert_eq!(store.len().unwrap(), 1);

        store.set("k".to_string(), "rotated".to_string()).unwrap();
        assert_eq!(store.get("k".to_string()).unwrap().as_deref(), Some("rotated"));

        store.delete("k".to_string()).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let store = MemoryCredentialStore::new();
        store.delete("missing".to_string()).unwrap();
        store.delete("missing".to_string()).unwrap();
    }
}
