//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the ledger (storage, randomness) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod random;
pub mod store;

pub use random::NullCodeGenerator;
pub use store::NullKvStore;
