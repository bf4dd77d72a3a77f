//! The referral ledger itself.
//!
//! Every operation is a short sequence of store primitives with no
//! surrounding transaction. Association calls resolve and validate both
//! sides before the first write, so a rejected call never leaves a partial
//! mutation behind; a store failure half-way through a successful call can.

use std::collections::BTreeSet;

use offers_store::KeyValueStore;
use offers_types::credits::total_credits;
use offers_types::{CodeCredits, CodeGenerator, PersonId, ReferralCode};
use offers_utils::StatsCounter;

use crate::keys::{
    bonus_key, code_person_key, person_code_key, referral_list_key, referrer_key,
    CODES_WITH_CREDITS_KEY,
};
use crate::{LedgerConfig, LedgerError, RandomCodeGenerator};

/// Thresholds below this are raised to it by [`ReferralLedger::list_high_credit_codes`].
pub const DEFAULT_MIN_CREDITS: i64 = 1;

const STAT_CODES_ISSUED: &str = "codes_issued";
const STAT_CODE_COLLISIONS: &str = "code_collisions";
const STAT_REFERRALS_RECORDED: &str = "referrals_recorded";
const STAT_ASSOCIATIONS: &str = "associations";
const STAT_BONUS_ADJUSTMENTS: &str = "bonus_adjustments";

const STAT_NAMES: &[&str] = &[
    STAT_CODES_ISSUED,
    STAT_CODE_COLLISIONS,
    STAT_REFERRALS_RECORDED,
    STAT_ASSOCIATIONS,
    STAT_BONUS_ADJUSTMENTS,
];

/// Referral bookkeeping over an injected key-value store.
pub struct ReferralLedger<S, G = RandomCodeGenerator> {
    store: S,
    generator: G,
    config: LedgerConfig,
    stats: StatsCounter,
}

impl<S: KeyValueStore> ReferralLedger<S> {
    /// Ledger with random 6-character hex codes.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        let generator = RandomCodeGenerator::new(config.code_length);
        Self::with_generator(store, generator, config)
    }
}

impl<S: KeyValueStore, G: CodeGenerator> ReferralLedger<S, G> {
    pub fn with_generator(store: S, generator: G, config: LedgerConfig) -> Self {
        Self {
            store,
            generator,
            config,
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Codes ───────────────────────────────────────────────────────────

    /// Return the person's code, issuing one on first request.
    ///
    /// Candidates that are empty or already owned by someone are discarded;
    /// after `max_code_attempts` discarded candidates the call fails with
    /// [`LedgerError::CodeSpaceExhausted`].
    pub fn create_or_get_code(&self, person: &PersonId) -> Result<ReferralCode, LedgerError> {
        if let Some(code) = self.get_code(person)? {
            return Ok(code);
        }

        let attempts = self.config.max_code_attempts.max(1);
        for attempt in 1..=attempts {
            let candidate = self.generator.generate();
            if candidate.is_empty() || self.get_owner(&candidate)?.is_some() {
                self.stats.increment(STAT_CODE_COLLISIONS);
                tracing::debug!(person = %person, code = %candidate, attempt, "discarding taken code");
                continue;
            }

            // Owner first: an interrupted issuance leaves an unused reservation only.
            self.store
                .set(&code_person_key(&candidate), person.as_str())?;
            self.store
                .set(&person_code_key(person), candidate.as_str())?;
            self.stats.increment(STAT_CODES_ISSUED);
            tracing::info!(person = %person, code = %candidate, "issued referral code");
            return Ok(candidate);
        }

        tracing::warn!(person = %person, attempts, "could not find an unused referral code");
        Err(LedgerError::CodeSpaceExhausted { attempts })
    }

    pub fn get_code(&self, person: &PersonId) -> Result<Option<ReferralCode>, LedgerError> {
        let code = self.store.get(&person_code_key(person))?;
        Ok(code.filter(|c| !c.is_empty()).map(ReferralCode::new))
    }

    pub fn get_owner(&self, code: &ReferralCode) -> Result<Option<PersonId>, LedgerError> {
        if code.is_empty() {
            return Ok(None);
        }
        let owner = self.store.get(&code_person_key(code))?;
        Ok(owner.map(PersonId::new))
    }

    // ── Referrals ───────────────────────────────────────────────────────

    /// Credit `user` to `code`.
    ///
    /// Returns `false` without writing anything when the code has no owner or
    /// `user` owns it. Repeating a successful call returns `true` again and
    /// leaves the referral list unchanged.
    pub fn record_referral(
        &self,
        user: &PersonId,
        code: &ReferralCode,
    ) -> Result<bool, LedgerError> {
        let owner = match self.get_owner(code)? {
            Some(owner) => owner,
            None => {
                tracing::debug!(user = %user, code = %code, "referral to unknown code rejected");
                return Ok(false);
            }
        };
        if owner == *user {
            tracing::debug!(user = %user, code = %code, "self-referral rejected");
            return Ok(false);
        }

        self.credit(code, &owner, user)?;
        self.stats.increment(STAT_REFERRALS_RECORDED);
        Ok(true)
    }

    /// Make the owners of two codes referrals of each other.
    ///
    /// Both codes must resolve to distinct owners; otherwise nothing is
    /// written and `false` is returned.
    pub fn associate_by_codes(
        &self,
        code_a: &ReferralCode,
        code_b: &ReferralCode,
    ) -> Result<bool, LedgerError> {
        if code_a == code_b {
            tracing::debug!(code = %code_a, "association of a code with itself rejected");
            return Ok(false);
        }

        let (owner_a, owner_b) = match (self.get_owner(code_a)?, self.get_owner(code_b)?) {
            (Some(a), Some(b)) if a != b => (a, b),
            _ => {
                tracing::debug!(code_a = %code_a, code_b = %code_b, "association rejected");
                return Ok(false);
            }
        };

        self.credit(code_a, &owner_a, &owner_b)?;
        self.credit(code_b, &owner_b, &owner_a)?;
        self.stats.increment(STAT_ASSOCIATIONS);
        tracing::info!(
            code_a = %code_a,
            code_b = %code_b,
            person_a = %owner_a,
            person_b = %owner_b,
            "associated referral codes"
        );
        Ok(true)
    }

    /// [`associate_by_codes`](Self::associate_by_codes) for the codes of two people.
    ///
    /// Returns `false` if either person has no code yet.
    pub fn associate_by_people(
        &self,
        person_a: &PersonId,
        person_b: &PersonId,
    ) -> Result<bool, LedgerError> {
        match (self.get_code(person_a)?, self.get_code(person_b)?) {
            (Some(code_a), Some(code_b)) => self.associate_by_codes(&code_a, &code_b),
            _ => {
                tracing::debug!(person_a = %person_a, person_b = %person_b, "association rejected: missing code");
                Ok(false)
            }
        }
    }

    pub fn get_referral_list(&self, code: &ReferralCode) -> Result<BTreeSet<PersonId>, LedgerError> {
        let members = self.store.set_members(&referral_list_key(code))?;
        Ok(members.into_iter().map(PersonId::new).collect())
    }

    /// Owner of the code `person` was most recently credited to.
    pub fn get_referrer(&self, person: &PersonId) -> Result<Option<PersonId>, LedgerError> {
        let owner = self.store.get(&referrer_key(person))?;
        Ok(owner.map(PersonId::new))
    }

    fn credit(
        &self,
        code: &ReferralCode,
        owner: &PersonId,
        referral: &PersonId,
    ) -> Result<(), LedgerError> {
        let added = self
            .store
            .set_add(&referral_list_key(code), referral.as_str())?;
        self.store.set_add(CODES_WITH_CREDITS_KEY, code.as_str())?;
        self.store.set(&referrer_key(referral), owner.as_str())?;
        tracing::debug!(code = %code, referral = %referral, added, "credited referral");
        Ok(())
    }

    // ── Credits ─────────────────────────────────────────────────────────

    pub fn get_bonus_credits(&self, code: &ReferralCode) -> Result<i64, LedgerError> {
        match self.store.get(&bonus_key(code))? {
            None => Ok(0),
            Some(raw) => raw.trim().parse().map_err(|_| LedgerError::CorruptBonus {
                code: code.to_string(),
                value: raw,
            }),
        }
    }

    /// Add `delta` (possibly negative) to the code's bonus and return the new bonus.
    pub fn adjust_bonus_credits(&self, code: &ReferralCode, delta: i64) -> Result<i64, LedgerError> {
        let total = self.get_bonus_credits(code)?.saturating_add(delta);
        self.store.set_add(CODES_WITH_CREDITS_KEY, code.as_str())?;
        self.store.set(&bonus_key(code), &total.to_string())?;
        self.stats.increment(STAT_BONUS_ADJUSTMENTS);
        tracing::debug!(code = %code, delta, bonus = total, "adjusted bonus credits");
        Ok(total)
    }

    /// `Ok(None)` when the person has no code.
    pub fn adjust_bonus_credits_by_person(
        &self,
        person: &PersonId,
        delta: i64,
    ) -> Result<Option<i64>, LedgerError> {
        match self.get_code(person)? {
            Some(code) => self.adjust_bonus_credits(&code, delta).map(Some),
            None => Ok(None),
        }
    }

    /// Referral count plus bonus credits.
    pub fn get_total_credits(&self, code: &ReferralCode) -> Result<i64, LedgerError> {
        let referrals = self.store.set_members(&referral_list_key(code))?;
        let bonus = self.get_bonus_credits(code)?;
        Ok(total_credits(referrals.len() as u64, bonus))
    }

    /// `Ok(None)` when the person has no code.
    pub fn get_total_credits_by_person(&self, person: &PersonId) -> Result<Option<i64>, LedgerError> {
        match self.get_code(person)? {
            Some(code) => self.get_total_credits(&code).map(Some),
            None => Ok(None),
        }
    }

    /// Full credit record for one code.
    pub fn code_credits(&self, code: &ReferralCode) -> Result<CodeCredits, LedgerError> {
        let owner = self.get_owner(code)?;
        let referrals = self.get_referral_list(code)?;
        let bonus = self.get_bonus_credits(code)?;
        Ok(CodeCredits::new(code.clone(), owner, referrals, bonus))
    }

    /// Every indexed code with at least `min_credits` total credits.
    ///
    /// `min_credits` is raised to [`DEFAULT_MIN_CREDITS`] if lower. Results
    /// are sorted by total credits, highest first; ties are ordered by code.
    pub fn list_high_credit_codes(&self, min_credits: i64) -> Result<Vec<CodeCredits>, LedgerError> {
        let threshold = min_credits.max(DEFAULT_MIN_CREDITS);
        let codes = self.store.set_members(CODES_WITH_CREDITS_KEY)?;

        let mut records = Vec::new();
        for code in codes {
            let record = self.code_credits(&ReferralCode::new(code))?;
            if record.total_credits >= threshold {
                records.push(record);
            }
        }
        records.sort_by(|a, b| {
            b.total_credits
                .cmp(&a.total_credits)
                .then_with(|| a.code.cmp(&b.code))
        });

        tracing::debug!(threshold, matched = records.len(), "listed high-credit codes");
        Ok(records)
    }
}
