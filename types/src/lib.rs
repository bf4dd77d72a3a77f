//! Fundamental types for the offers referral ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! person and code identifiers, the leaderboard record, the code generator seam,
//! and the crate-spanning error classification.

pub mod code;
pub mod credits;
pub mod error;
pub mod person;

pub use code::{CodeGenerator, ReferralCode};
pub use credits::CodeCredits;
pub use error::OffersError;
pub use person::PersonId;
