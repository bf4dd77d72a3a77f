//! Ledger running on the LMDB backend: persisted data must be readable
//! after the environment is reopened.

use offers_ledger::ReferralLedger;
use offers_store_lmdb::LmdbEnvironment;
use offers_types::PersonId;

fn open(dir: &tempfile::TempDir) -> LmdbEnvironment {
    LmdbEnvironment::open(dir.path(), 8, 16 * 1024 * 1024).expect("open env")
}

#[test]
fn referral_state_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let alice = PersonId::from("alice");
    let bob = PersonId::from("bob");

    let code = {
        let env = open(&dir);
        let ledger = ReferralLedger::new(env.kv_store());
        let code = ledger.create_or_get_code(&alice).unwrap();
        ledger.create_or_get_code(&bob).unwrap();
        assert!(ledger.associate_by_people(&alice, &bob).unwrap());
        ledger.adjust_bonus_credits(&code, 2).unwrap();
        code
    };

    let env = open(&dir);
    let ledger = ReferralLedger::new(env.kv_store());
    assert_eq!(ledger.get_code(&alice).unwrap(), Some(code.clone()));
    assert_eq!(ledger.get_total_credits(&code).unwrap(), 3);

    let board = ledger.list_high_credit_codes(1).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].code, code);
    assert_eq!(board[0].owner, Some(alice));
}

#[test]
fn long_person_ids_work_like_the_in_memory_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = open(&dir);
    let ledger = ReferralLedger::new(env.kv_store());

    let long_owner = PersonId::new("o".repeat(600));
    let long_user = PersonId::new("u".repeat(600));

    let code = ledger.create_or_get_code(&long_owner).unwrap();
    assert_eq!(ledger.create_or_get_code(&long_owner).unwrap(), code);
    assert_eq!(ledger.get_owner(&code).unwrap(), Some(long_owner.clone()));

    assert!(ledger.record_referral(&long_user, &code).unwrap());
    assert!(ledger.get_referral_list(&code).unwrap().contains(&long_user));
    assert_eq!(ledger.get_referrer(&long_user).unwrap(), Some(long_owner));
    assert_eq!(ledger.get_total_credits(&code).unwrap(), 1);
}
