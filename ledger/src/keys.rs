//! Store key layout.
//!
//! These strings are the persisted format; existing data is only readable
//! if they stay byte-for-byte identical.

use offers_types::{PersonId, ReferralCode};

/// Global set of every code that ever received a referral or bonus adjustment.
pub const CODES_WITH_CREDITS_KEY: &str = "offers:codes_with_credits";

/// person → code
pub fn person_code_key(person: &PersonId) -> String {
    format!("offers:person:code:{}", person)
}

/// code → owning person
pub fn code_person_key(code: &ReferralCode) -> String {
    format!("offers:code:person:{}", code)
}

/// code → set of people credited to it
pub fn referral_list_key(code: &ReferralCode) -> String {
    format!("offers:list:referral:code:{}", code)
}

/// code → signed bonus integer
pub fn bonus_key(code: &ReferralCode) -> String {
    format!("offers:code:bonus:{}", code)
}

/// person → owner of the code they were last credited to
pub fn referrer_key(person: &PersonId) -> String {
    format!("offers:referral:code:owner:used:{}", person)
}
