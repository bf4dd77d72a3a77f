//! Flat string key-value storage trait.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::StoreError;

/// The four primitives the referral ledger is built on.
///
/// String values and sets live in separate key spaces: `set` never touches a
/// set stored under the same key and vice versa. No primitive composes with
/// another into a transaction; callers get per-call atomicity only.
pub trait KeyValueStore {
    /// Read a string value. Missing keys are `Ok(None)`, never an error.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a string value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Add `member` to the set under `key`, creating the set if needed.
    ///
    /// Returns `true` when the member was not already present.
    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// All members of the set under `key`; empty when the set does not exist.
    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).set_add(key, member)
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        (**self).set_members(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).set_add(key, member)
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        (**self).set_members(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        (**self).set_add(key, member)
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        (**self).set_members(key)
    }
}
