//! In-memory key-value store for testing.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::store::{KvStore, StoreError};

/// Mock implementation of [`KvStore`] for tests.
///
/// Keeps values in a map, records every write in order and can be primed
/// to fail the next read or write.
pub struct MockKvStore {
    values: RwLock<HashMap<String, String>>,
    sets: RwLock<Vec<(String, String)>>,
    next_get_error: Mutex<Option<StoreError>>,
    next_set_error: Mutex<Option<StoreError>>,
}

impl MockKvStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            sets: RwLock::new(Vec::new()),
            next_get_error: Mutex::new(None),
            next_set_error: Mutex::new(None),
        }
    }

    /// Insert a value directly, without recording a write.
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Every write made through [`KvStore::set`], in order.
    pub fn recorded_sets(&self) -> Vec<(String, String)> {
        self.sets.read().unwrap().clone()
    }

    pub fn set_count(&self) -> usize {
        self.sets.read().unwrap().len()
    }

    /// Make the next read fail with the given error. Consumed once.
    pub fn fail_next_get(&self, error: StoreError) {
        *self.next_get_error.lock().unwrap() = Some(error);
    }

    /// Make the next write fail with the given error. Consumed once.
    pub fn fail_next_set(&self, error: StoreError) {
        *self.next_set_error.lock().unwrap() = Some(error);
    }
}

impl Default for MockKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MockKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(error) = self.next_get_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.values.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(error) = self.next_set_error.lock().unwrap().take() {
            return Err(error);
        }
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.sets
            .write()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}
