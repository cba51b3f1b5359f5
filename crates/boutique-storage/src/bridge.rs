//! Fail-soft persistence bridge
//!
//! Callers of the bridge never see a storage error: loads degrade to
//! "absent" and saves are logged and dropped. In-memory state stays
//! authoritative for the session whenever the store misbehaves.

use crate::error::StorageError;
use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fail-soft wrapper around a [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct StorageBridge<S> {
    store: S,
}

impl<S: KeyValueStore> StorageBridge<S> {
    /// Wrap a store
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read a slot; any store error reads as absent
    #[must_use]
    pub fn load(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage load failed, treating slot as absent");
                None
            }
        }
    }

    /// Write a slot; failures are logged and swallowed
    ///
    /// Returns whether the write reached the store, for callers that want
    /// to report it. Nothing depends on the result for correctness.
    pub fn save(&self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage save failed, keeping in-memory state");
                false
            }
        }
    }

    /// Delete a slot; failures are logged and swallowed
    pub fn discard(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage discard failed");
                false
            }
        }
    }

    /// Read and decode a JSON slot; undecodable content reads as absent
    #[must_use]
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed snapshot");
                None
            }
        }
    }

    /// Encode and write a JSON slot; failures are logged and swallowed
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match encode(value) {
            Ok(raw) => self.save(key, &raw),
            Err(e) => {
                tracing::warn!(key, error = %e, "snapshot not saved");
                false
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(value)?)
}
