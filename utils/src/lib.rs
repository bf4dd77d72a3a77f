//! Shared utilities for the offers referral ledger.

pub mod logging;
pub mod stats;

pub use logging::{init_logging, LogFormat};
pub use stats::StatsCounter;
