//! Key-prefixing wrapper so several ledgers can share one physical store.

use std::collections::BTreeSet;

use crate::{KeyValueStore, StoreError};

/// Prefixes every key with `{namespace}:` before delegating.
///
/// Set members and values are passed through untouched.
pub struct NamespacedStore<S> {
    namespace: String,
    inner: S,
}

impl<S: KeyValueStore> NamespacedStore<S> {
    pub fn new(namespace: impl Into<String>, inner: S) -> Self {
        Self {
            namespace: namespace.into(),
            inner,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

impl<S: KeyValueStore> KeyValueStore for NamespacedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.inner.set_add(&self.scoped(key), member)
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        self.inner.set_members(&self.scoped(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Minimal recording store; the full in-memory fake lives in the nullables crate.
    #[derive(Default)]
    struct RecordingStore {
        strings: Mutex<HashMap<String, String>>,
        sets: Mutex<HashMap<String, BTreeSet<String>>>,
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.strings.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.strings
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
            Ok(self
                .sets
                .lock()
                .unwrap()
                .entry(key.to_string())
                .or_default()
                .insert(member.to_string()))
        }

        fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
            Ok(self
                .sets
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[test]
    fn keys_are_prefixed() {
        let store = NamespacedStore::new("test", RecordingStore::default());
        store.set("offers:person:code:1", "abc123").unwrap();
        assert!(store
            .inner()
            .strings
            .lock()
            .unwrap()
            .contains_key("test:offers:person:code:1"));
        assert_eq!(
            store.get("offers:person:code:1").unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn namespaces_do_not_collide() {
        let shared = RecordingStore::default();
        let a = NamespacedStore::new("a", &shared);
        let b = NamespacedStore::new("b", &shared);
        assert!(a.set_add("members", "1").unwrap());
        assert!(b.set_members("members").unwrap().is_empty());
        assert_eq!(a.set_members("members").unwrap().len(), 1);
    }
}
