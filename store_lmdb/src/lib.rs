//! LMDB storage backend for the offers referral ledger.
//!
//! Implements [`offers_store::KeyValueStore`] using the `heed` LMDB bindings.
//! String values and set members live in two databases within a single environment.

pub mod environment;
pub mod error;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use kv::LmdbKvStore;
