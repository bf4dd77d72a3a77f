//! Nullable code generator — deterministic referral codes.

use offers_types::{CodeGenerator, ReferralCode};
use std::sync::Mutex;

/// A deterministic code generator for testing.
///
/// Returns pre-configured codes in order, cycling back to the first one
/// when the sequence is exhausted.
pub struct NullCodeGenerator {
    codes: Vec<ReferralCode>,
    index: Mutex<usize>,
}

impl NullCodeGenerator {
    /// Create with a sequence of deterministic codes.
    ///
    /// # Panics
    /// Panics if `codes` is empty.
    pub fn new<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ReferralCode>,
    {
        let codes: Vec<ReferralCode> = codes.into_iter().map(Into::into).collect();
        assert!(!codes.is_empty(), "NullCodeGenerator needs at least one code");
        Self {
            codes,
            index: Mutex::new(0),
        }
    }

    /// Create with a single code that will be returned for every call.
    pub fn constant(code: impl Into<ReferralCode>) -> Self {
        let code: ReferralCode = code.into();
        Self::new([code])
    }

    /// How many codes have been handed out so far.
    pub fn calls(&self) -> usize {
        *self.index.lock().unwrap()
    }
}

impl CodeGenerator for NullCodeGenerator {
    fn generate(&self) -> ReferralCode {
        let mut idx = self.index.lock().unwrap();
        let current = *idx % self.codes.len();
        *idx += 1;
        self.codes[current].clone()
    }
}
