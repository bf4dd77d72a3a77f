//! Per-code credit summary returned by the leaderboard query.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{PersonId, ReferralCode};

/// Credit standing of one referral code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCredits {
    pub code: ReferralCode,
    /// `None` when the code is indexed but its owner mapping is missing.
    pub owner: Option<PersonId>,
    pub referrals: BTreeSet<PersonId>,
    pub referral_count: u64,
    pub bonus_credits: i64,
    /// `referral_count + bonus_credits`.
    pub total_credits: i64,
}

impl CodeCredits {
    pub fn new(
        code: ReferralCode,
        owner: Option<PersonId>,
        referrals: BTreeSet<PersonId>,
        bonus_credits: i64,
    ) -> Self {
        let referral_count = referrals.len() as u64;
        let total_credits = total_credits(referral_count, bonus_credits);
        Self {
            code,
            owner,
            referrals,
            referral_count,
            bonus_credits,
            total_credits,
        }
    }
}

/// Total credits for a code: referral count plus (possibly negative) bonus.
///
/// Saturates instead of overflowing.
pub fn total_credits(referral_count: u64, bonus_credits: i64) -> i64 {
    i64::try_from(referral_count)
        .unwrap_or(i64::MAX)
        .saturating_add(bonus_credits)
}
