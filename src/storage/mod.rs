//! Usage: Durable storage contracts (secure keychain + profile blob) and
//! in-memory doubles.

pub mod keyring_store;
pub mod profile;

use crate::session::user::User;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

pub use keyring_store::KeyringStore;
pub use profile::FileProfileStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("entry not found")]
    NotFound,
    #[error("storage access failed: {0}")]
    AccessFailed(String),
}

/// Durable key-value store for secrets (the refresh token). Backed by the
/// platform keychain in production.
pub trait SecureStore: Send + Sync {
    fn get(&self, key: &str) -> Result<String, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Deleting an absent entry is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Durable store for the logged-in user's profile blob.
pub trait ProfileStore: Send + Sync {
    fn load(&self) -> Result<Option<User>, StorageError>;
    fn save(&self, user: &User) -> Result<(), StorageError>;
    /// Clearing an absent profile is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory [`SecureStore`], for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, String>>,
}

impl SecureStore for MemorySecureStore {
    fn get(&self, key: &str) -> Result<String, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))?
            .get(key)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))?
            .remove(key);
        Ok(())
    }
}

/// In-memory [`ProfileStore`], for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryProfileStore {
    profile: Mutex<Option<User>>,
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<User>, StorageError> {
        Ok(self
            .profile
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))?
            .clone())
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        *self
            .profile
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))? =
            Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self
            .profile
            .lock()
            .map_err(|_| StorageError::AccessFailed("memory store lock".to_string()))? = None;
        Ok(())
    }
}
