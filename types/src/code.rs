//! Referral code type and the generator seam used to mint new codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A short opaque string identifying one person's referral invitation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty code can never be issued and never resolves to an owner.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ReferralCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReferralCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of fresh candidate codes.
///
/// Implementations only need to make collisions unlikely; the ledger checks
/// every candidate against the code→owner index before issuing it.
pub trait CodeGenerator {
    fn generate(&self) -> ReferralCode;
}

impl<T: CodeGenerator + ?Sized> CodeGenerator for &T {
    fn generate(&self) -> ReferralCode {
        (**self).generate()
    }
}

impl<T: CodeGenerator + ?Sized> CodeGenerator for Box<T> {
    fn generate(&self) -> ReferralCode {
        (**self).generate()
    }
}
