//! Nullable store — thread-safe in-memory key-value storage for testing.

use offers_store::{KeyValueStore, StoreError};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// An in-memory string + set store for testing.
/// Thread-safe so one instance can be shared between several ledgers.
pub struct NullKvStore {
    strings: Mutex<HashMap<String, String>>,
    sets: Mutex<HashMap<String, BTreeSet<String>>>,
    failure: Mutex<Option<String>>,
    write_budget: Mutex<Option<(usize, String)>>,
}

impl NullKvStore {
    pub fn new() -> Self {
        Self {
            strings: Mutex::new(HashMap::new()),
            sets: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            write_budget: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `StoreError::Backend(message)`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Let `writes` more `set`/`set_add` calls through, then fail every
    /// write with `StoreError::Backend(message)`. Reads keep working.
    pub fn fail_writes_after(&self, writes: usize, message: impl Into<String>) {
        *self.write_budget.lock().unwrap() = Some((writes, message.into()));
    }

    /// Clear every injected failure.
    pub fn heal(&self) {
        *self.failure.lock().unwrap() = None;
        *self.write_budget.lock().unwrap() = None;
    }

    /// Total number of string keys and non-empty sets held.
    pub fn key_count(&self) -> usize {
        self.strings.lock().unwrap().len() + self.sets.lock().unwrap().len()
    }

    /// Snapshot of every string key, sorted.
    pub fn string_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.strings.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop all data, like flushing a database between tests.
    pub fn flush(&self) {
        self.strings.lock().unwrap().clear();
        self.sets.lock().unwrap().clear();
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check()?;
        match self.write_budget.lock().unwrap().as_mut() {
            Some((0, message)) => Err(StoreError::Backend(message.clone())),
            Some((remaining, _)) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for NullKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for NullKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.strings.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_write()?;
        self.strings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.check_write()?;
        Ok(self
            .sets
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        self.check()?;
        Ok(self
            .sets
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }
}
