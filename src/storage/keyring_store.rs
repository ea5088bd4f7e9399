//! Usage: Platform keychain implementation of the secure store.
//!
//! macOS Keychain, Windows Credential Manager, or the Secret Service API on
//! Linux, all via the `keyring` crate.

use crate::storage::{SecureStore, StorageError};
use keyring::Entry;

pub struct KeyringStore {
    service_name: String,
}

impl KeyringStore {
    /// `service_name` namespaces entries per application (e.g.
    /// `"com.fellowship.client"`).
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Entry::new(&self.service_name, key).map_err(|e| {
            StorageError::AccessFailed(format!("keychain entry for {key} unavailable: {e}"))
        })
    }
}

impl SecureStore for KeyringStore {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        let entry = self.entry(key)?;
        entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                StorageError::NotFound
            } else {
                StorageError::AccessFailed(format!("keychain read for {key} failed: {e}"))
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let entry = self.entry(key)?;
        entry.set_password(value).map_err(|e| {
            StorageError::AccessFailed(format!("keychain write for {key} failed: {e}"))
        })?;
        tracing::debug!(service = %self.service_name, key = %key, "secret stored in keychain");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let entry = self.entry(key)?;
        if let Err(e) = entry.delete_credential() {
            if !matches!(e, keyring::Error::NoEntry) {
                return Err(StorageError::AccessFailed(format!(
                    "keychain delete for {key} failed: {e}"
                )));
            }
        }
        Ok(())
    }
}
