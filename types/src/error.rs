//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error classification for the offers workspace.
///
/// Library crates keep their own precise error enums; this type is what
/// outer layers collapse them into when reporting.
#[derive(Debug, Error)]
pub enum OffersError {
    #[error("no referral code for person {0}")]
    NoCode(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
