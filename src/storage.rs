//! Key-value storage seam for persisted client state.
//!
//! The favorites store only needs to read and overwrite a single string slot,
//! so the interface is two methods. [`crate::local_db_state::AppDbState`] is the
//! on-disk implementation; [`MemoryStorage`] backs tests and ephemeral
//! sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use crate::app_response::AppResponse;

/// A string-to-string persistent slot store.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse>;

    /// Overwrites the slot under `key` with `value`.
    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        (**self).set(key, value)
    }
}

/// Process-local storage. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a storage with one slot already written, as a browser profile
    /// with existing data would look.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.into(), value.into());
        }
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppResponse::DatabaseError("Memory storage lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppResponse::DatabaseError("Memory storage lock poisoned".to_string()))?;
        debug!("Memory storage write: {} ({} bytes)", key, value.len());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
