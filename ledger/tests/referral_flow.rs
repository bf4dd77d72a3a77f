//! End-to-end referral flows against the in-memory store.

use std::collections::BTreeSet;
use std::sync::Arc;

use offers_ledger::keys::CODES_WITH_CREDITS_KEY;
use offers_ledger::{LedgerConfig, ReferralLedger};
use offers_nullables::{NullCodeGenerator, NullKvStore};
use offers_store::{KeyValueStore, NamespacedStore};
use offers_types::{PersonId, ReferralCode};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn person(id: &str) -> PersonId {
    PersonId::from(id)
}

fn people(ids: &[&str]) -> BTreeSet<PersonId> {
    ids.iter().copied().map(PersonId::from).collect()
}

fn fresh_ledger() -> ReferralLedger<NullKvStore> {
    ReferralLedger::new(NullKvStore::new())
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

#[test]
fn issued_code_resolves_back_to_its_owner() {
    let ledger = fresh_ledger();
    let code = ledger.create_or_get_code(&person("1")).unwrap();
    assert!(!code.is_empty());
    assert_eq!(code.as_str().len(), 6);
    assert_eq!(ledger.create_or_get_code(&person("1")).unwrap(), code);
    assert_eq!(ledger.get_code(&person("1")).unwrap(), Some(code.clone()));
    assert_eq!(ledger.get_owner(&code).unwrap(), Some(person("1")));
}

#[test]
fn identifiers_are_not_numerically_coerced() {
    let ledger = ReferralLedger::with_generator(
        NullKvStore::new(),
        NullCodeGenerator::new(["aaa111", "bbb222"]),
        LedgerConfig::default(),
    );
    let one = ledger.create_or_get_code(&person("1")).unwrap();
    let padded = ledger.create_or_get_code(&person("01")).unwrap();
    assert_ne!(one, padded);
    assert!(ledger.record_referral(&person("01"), &one).unwrap());
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

#[test]
fn associating_people_is_mutual() {
    let ledger = fresh_ledger();
    let code_a = ledger.create_or_get_code(&person("A")).unwrap();
    let code_b = ledger.create_or_get_code(&person("B")).unwrap();

    assert!(ledger.associate_by_people(&person("A"), &person("B")).unwrap());

    assert_eq!(ledger.get_referral_list(&code_a).unwrap(), people(&["B"]));
    assert_eq!(ledger.get_referral_list(&code_b).unwrap(), people(&["A"]));
    assert_eq!(ledger.get_total_credits(&code_a).unwrap(), 1);

    ledger.adjust_bonus_credits(&code_a, 3).unwrap();
    assert_eq!(ledger.get_total_credits(&code_a).unwrap(), 4);
    assert_eq!(ledger.get_total_credits_by_person(&person("A")).unwrap(), Some(4));

    let indexed = ledger.store().set_members(CODES_WITH_CREDITS_KEY).unwrap();
    assert!(indexed.contains(code_a.as_str()));
    assert!(indexed.contains(code_b.as_str()));

    assert_eq!(ledger.get_referrer(&person("A")).unwrap(), Some(person("B")));
    assert_eq!(ledger.get_referrer(&person("B")).unwrap(), Some(person("A")));
}

#[test]
fn associating_a_code_with_itself_writes_nothing() {
    let ledger = fresh_ledger();
    let code = ledger.create_or_get_code(&person("A")).unwrap();
    let keys_before = ledger.store().key_count();

    assert!(!ledger.associate_by_codes(&code, &code).unwrap());
    assert!(!ledger.associate_by_people(&person("A"), &person("A")).unwrap());

    assert_eq!(ledger.store().key_count(), keys_before);
    assert!(ledger.get_referral_list(&code).unwrap().is_empty());
}

#[test]
fn associating_with_unknown_code_writes_nothing() {
    let ledger = fresh_ledger();
    let code = ledger.create_or_get_code(&person("A")).unwrap();
    let unknown = ReferralCode::from("ffffff-missing");
    let keys_before = ledger.store().key_count();

    assert!(!ledger.associate_by_codes(&code, &unknown).unwrap());
    assert!(!ledger.associate_by_codes(&unknown, &code).unwrap());

    assert_eq!(ledger.store().key_count(), keys_before);
    assert!(ledger.store().set_members(CODES_WITH_CREDITS_KEY).unwrap().is_empty());
}

#[test]
fn associating_codes_with_the_same_owner_writes_nothing() {
    let store = NullKvStore::new();
    let ledger = ReferralLedger::new(&store);
    let code = ledger.create_or_get_code(&person("A")).unwrap();
    // A stray second code pointing at the same owner.
    store.set("offers:code:person:alias", "A").unwrap();

    assert!(!ledger
        .associate_by_codes(&code, &ReferralCode::from("alias"))
        .unwrap());
    assert!(ledger.get_referral_list(&code).unwrap().is_empty());
}

#[test]
fn associating_people_without_codes_fails() {
    let ledger = fresh_ledger();
    ledger.create_or_get_code(&person("A")).unwrap();
    assert!(!ledger.associate_by_people(&person("A"), &person("B")).unwrap());
    assert!(!ledger.associate_by_people(&person("C"), &person("A")).unwrap());
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[test]
fn leaderboard_filters_and_sorts() {
    let ledger = fresh_ledger();
    let code_1 = ledger.create_or_get_code(&person("1")).unwrap();
    let code_2 = ledger.create_or_get_code(&person("2")).unwrap();
    let code_3 = ledger.create_or_get_code(&person("3")).unwrap();

    for user in ["10", "11", "12"] {
        ledger.record_referral(&person(user), &code_1).unwrap();
    }
    ledger.record_referral(&person("13"), &code_2).unwrap();
    ledger.adjust_bonus_credits(&code_2, 4).unwrap();
    ledger.adjust_bonus_credits(&code_3, -2).unwrap();

    let board = ledger.list_high_credit_codes(1).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].code, code_2);
    assert_eq!(board[0].total_credits, 5);
    assert_eq!(board[0].referral_count, 1);
    assert_eq!(board[0].bonus_credits, 4);
    assert_eq!(board[0].owner, Some(person("2")));
    assert_eq!(board[1].code, code_1);
    assert_eq!(board[1].referrals, people(&["10", "11", "12"]));

    let top = ledger.list_high_credit_codes(4).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].code, code_2);
}

#[test]
fn leaderboard_threshold_is_clamped_to_one() {
    let ledger = fresh_ledger();
    let code = ledger.create_or_get_code(&person("1")).unwrap();
    ledger.adjust_bonus_credits(&code, 0).unwrap();

    assert!(ledger.list_high_credit_codes(0).unwrap().is_empty());
    assert!(ledger.list_high_credit_codes(-100).unwrap().is_empty());

    ledger.adjust_bonus_credits(&code, 1).unwrap();
    assert_eq!(ledger.list_high_credit_codes(i64::MIN).unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Isolation
// ---------------------------------------------------------------------------

#[test]
fn namespaced_ledgers_share_a_store_without_colliding() {
    let shared = Arc::new(NullKvStore::new());
    let first = ReferralLedger::new(NamespacedStore::new("test", Arc::clone(&shared)));
    let second = ReferralLedger::new(NamespacedStore::new("staging", Arc::clone(&shared)));

    let code = first.create_or_get_code(&person("1")).unwrap();
    assert!(second.get_code(&person("1")).unwrap().is_none());
    assert!(second.get_owner(&code).unwrap().is_none());

    let keys = shared.string_keys();
    assert!(keys.contains(&"test:offers:person:code:1".to_string()));
    assert!(keys.iter().all(|k| k.starts_with("test:")));
}
