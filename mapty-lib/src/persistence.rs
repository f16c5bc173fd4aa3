// mapty-lib/src/persistence.rs
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::DbError;
use crate::workout::Workout;

/// Name of the slot holding the serialized workout list.
pub const WORKOUTS_KEY: &str = "workouts";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] DbError),
    #[error("Failed to serialize workouts: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string slots addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        (**self).set(key, value)
    }
}

/// Non-durable store, handy for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the whole workout list as JSON in one slot.
pub struct WorkoutStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, WORKOUTS_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Overwrites the slot with the full list.
    /// # Errors
    /// `StorageError` if serialization or the backend write fails.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), StorageError> {
        let json = serde_json::to_string(workouts)?;
        self.store.set(&self.key, &json)?;
        debug!(count = workouts.len(), key = %self.key, "Saved workouts");
        Ok(())
    }

    /// Reads the slot. A missing, unreadable or unparsable slot is an empty list.
    pub fn load(&self) -> Vec<Workout> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "Could not read stored workouts");
                return Vec::new();
            }
        };
        // A stored `null` counts as an empty list.
        match serde_json::from_str::<Option<Vec<Workout>>>(&raw) {
            Ok(workouts) => workouts.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "Discarding unparsable stored workouts");
                Vec::new()
            }
        }
    }
}
