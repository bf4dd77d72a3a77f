//! Referral ledger.
//!
//! Issues one short code per person, records which people used which code,
//! and keeps a credit tally per code: the size of its referral list plus a
//! manually adjusted bonus. Everything is stored as flat string keys and
//! sets in a [`offers_store::KeyValueStore`]; there is no cross-call
//! atomicity beyond what the store offers for a single primitive.

pub mod config;
pub mod error;
pub mod generator;
pub mod keys;
pub mod ledger;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use generator::RandomCodeGenerator;
pub use ledger::{ReferralLedger, DEFAULT_MIN_CREDITS};
