//! LMDB implementation of KeyValueStore.
//!
//! String values are stored as `key -> value` in the `strings` database.
//! Set members are stored as `set_key ++ 0x00 ++ member -> member` in the
//! `sets` database, so listing a set is a range scan over the
//! `set_key ++ 0x00` prefix.
//!
//! LMDB caps key length (511 bytes by default). Any key or key component
//! that would overflow it is replaced by `0xFF ++ Blake2b-256(component)`.
//! `0xFF` never occurs in UTF-8, so digests cannot collide with literal
//! keys. Set members are always kept verbatim in the value.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ops::Bound;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use heed::types::Bytes;
use heed::{Database, Env};

use offers_store::{KeyValueStore, StoreError};

use crate::{LmdbEnvironment, LmdbError};

type Blake2b256 = Blake2b<U32>;

const SET_SEPARATOR: u8 = 0x00;
const DIGEST_MARKER: u8 = 0xFF;
/// Marker byte plus a 32-byte digest.
const DIGEST_KEY_LEN: usize = 33;

pub struct LmdbKvStore {
    env: Env,
    strings_db: Database<Bytes, Bytes>,
    sets_db: Database<Bytes, Bytes>,
    max_key_size: usize,
}

impl LmdbKvStore {
    pub(crate) fn new(environment: &LmdbEnvironment) -> Self {
        let env = environment.env().clone();
        let max_key_size = env.max_key_size();
        Self {
            env,
            strings_db: environment.strings_db,
            sets_db: environment.sets_db,
            max_key_size,
        }
    }

    /// Key under which a string value is stored.
    fn string_key<'a>(&self, key: &'a str) -> Cow<'a, [u8]> {
        if key.len() <= self.max_key_size {
            Cow::Borrowed(key.as_bytes())
        } else {
            Cow::Owned(digest_key(key.as_bytes()))
        }
    }

    /// Scan prefix shared by every member of a set: `set_key ++ 0x00`.
    ///
    /// The set key is digested when a digested member would no longer fit
    /// behind it, so every member of one set shares the same prefix.
    fn set_prefix(&self, key: &str) -> Vec<u8> {
        let mut prefix = if key.len() + 1 + DIGEST_KEY_LEN <= self.max_key_size {
            key.as_bytes().to_vec()
        } else {
            digest_key(key.as_bytes())
        };
        prefix.push(SET_SEPARATOR);
        prefix
    }

    /// Build the composite key `prefix ++ member`, digesting the member if it overflows.
    fn member_key(&self, prefix: &[u8], member: &str) -> Vec<u8> {
        let mut composite = prefix.to_vec();
        if prefix.len() + member.len() <= self.max_key_size {
            composite.extend_from_slice(member.as_bytes());
        } else {
            composite.extend_from_slice(&digest_key(member.as_bytes()));
        }
        composite
    }
}

fn digest_key(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let mut key = Vec::with_capacity(DIGEST_KEY_LEN);
    key.push(DIGEST_MARKER);
    key.extend_from_slice(&hasher.finalize());
    key
}

fn reject_nul(what: &str, s: &str) -> Result<(), LmdbError> {
    if s.as_bytes().contains(&SET_SEPARATOR) {
        return Err(LmdbError::Serialization(format!(
            "{what} must not contain a NUL byte"
        )));
    }
    Ok(())
}

fn decode_utf8(bytes: &[u8]) -> Result<String, LmdbError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| LmdbError::Corruption(e.to_string()))
}

impl KeyValueStore for LmdbKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let stored = self.string_key(key);
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .strings_db
            .get(&rtxn, &stored)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let stored = self.string_key(key);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.strings_db
            .put(&mut wtxn, &stored, value.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        reject_nul("set key", key)?;
        let composite = self.member_key(&self.set_prefix(key), member);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .sets_db
            .get(&wtxn, &composite)
            .map_err(LmdbError::from)?
            .is_some();
        if existed {
            return Ok(false);
        }
        self.sets_db
            .put(&mut wtxn, &composite, member.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn set_members(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        reject_nul("set key", key)?;
        let lower = self.set_prefix(key);
        let mut upper = lower.clone();
        if let Some(last) = upper.last_mut() {
            *last = SET_SEPARATOR + 1;
        }

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bounds = (
            Bound::Included(lower.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );
        let iter = self
            .sets_db
            .range(&rtxn, &bounds)
            .map_err(LmdbError::from)?;
        let mut members = BTreeSet::new();
        for result in iter {
            let (_composite, member) = result.map_err(LmdbError::from)?;
            members.insert(decode_utf8(member)?);
        }
        Ok(members)
    }
}
