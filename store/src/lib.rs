//! Abstract storage trait for the offers referral ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`KeyValueStore`]. The rest of the codebase depends only on the trait.

pub mod error;
pub mod kv;
pub mod namespace;

pub use error::StoreError;
pub use kv::KeyValueStore;
pub use namespace::NamespacedStore;
