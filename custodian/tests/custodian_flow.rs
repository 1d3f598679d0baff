//! Integration tests exercising the contract entry points end to end:
//! config → registration → voting/delegation → rollover → disbursement.
//!
//! These tests wire the engine to the nullable tables, token ledger and member
//! registry exactly as a host would, and check the behaviour visible to callers.

use dac_custodian::{CustodianError, DacCustodian};
use dac_nullables::{NullMembers, NullStore, NullTokenLedger};
use dac_store::{CandidateStore, PendingPayStore, VoteStore};
use dac_types::{AccountName, Asset, Symbol};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Contract = DacCustodian<NullStore, NullTokenLedger, NullMembers>;

const TERMS: u64 = 1;

fn sym() -> Symbol {
    Symbol::new(4, "EOSDAC").unwrap()
}

fn dac(amount: u128) -> Asset {
    Asset::new(amount, sym())
}

fn acct(name: &str) -> AccountName {
    AccountName::new(name)
}

fn authority() -> AccountName {
    acct("daccustodian")
}

/// A contract with `num_elected` seats and the given members, each holding `balance`.
fn contract_with(num_elected: u32, members: &[(&str, u128)]) -> Contract {
    let contract = DacCustodian::new(
        authority(),
        NullStore::new(),
        NullTokenLedger::new(),
        NullMembers::new(),
    );
    contract
        .ledger()
        .set_balance(&authority(), &dac(10_000_000));
    for (name, balance) in members {
        contract.members().register(&acct(name), TERMS);
        contract.ledger().set_balance(&acct(name), &dac(*balance));
    }
    contract
        .update_config(&authority(), dac(100_000), 3, num_elected, TERMS)
        .unwrap();
    contract
}

fn register(contract: &Contract, name: &str, pay: u128) {
    contract
        .register_candidate(&acct(name), &acct(name), "bio", &dac(pay))
        .unwrap();
}

fn cast(contract: &Contract, voter: &str, candidates: &[&str]) {
    let list: Vec<AccountName> = candidates.iter().map(|c| acct(c)).collect();
    contract.cast_votes(&acct(voter), &acct(voter), &list).unwrap();
}

fn custodians(contract: &Contract) -> Vec<String> {
    contract
        .store()
        .iter_candidates()
        .unwrap()
        .into_iter()
        .filter(|c| c.is_custodian)
        .map(|c| c.name.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Authorization and membership
// ---------------------------------------------------------------------------

#[test]
fn authority_operations_reject_other_callers() {
    let contract = contract_with(1, &[("alice", 200_000)]);
    let alice = acct("alice");

    assert!(matches!(
        contract.run_period_rollover(&alice),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.disburse_pending_payments(&alice),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.update_config(&alice, dac(1), 1, 1, TERMS),
        Err(CustodianError::NotAuthorized { .. })
    ));
}

#[test]
fn member_operations_require_the_named_caller() {
    let contract = contract_with(1, &[("alice", 200_000), ("bob", 200_000)]);
    let (alice, bob) = (acct("alice"), acct("bob"));

    assert!(matches!(
        contract.register_candidate(&bob, &alice, "", &dac(1)),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.cast_votes(&bob, &alice, &[]),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.delegate_vote(&bob, &alice, &bob),
        Err(CustodianError::NotAuthorized { .. })
    ));

    register(&contract, "alice", 10);
    assert!(matches!(
        contract.update_bio(&bob, &alice, "hijacked"),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.update_requested_pay(&bob, &alice, &dac(1)),
        Err(CustodianError::NotAuthorized { .. })
    ));
    assert!(matches!(
        contract.deregister_candidate(&bob, &alice),
        Err(CustodianError::NotAuthorized { .. })
    ));
}

#[test]
fn non_members_and_outdated_terms_are_rejected() {
    let contract = contract_with(1, &[("alice", 200_000)]);
    let mallory = acct("mallory");
    contract.ledger().set_balance(&mallory, &dac(200_000));

    assert!(matches!(
        contract.cast_votes(&mallory, &mallory, &[]),
        Err(CustodianError::NotMember(_))
    ));

    contract.members().register(&mallory, TERMS + 1);
    assert!(matches!(
        contract.register_candidate(&mallory, &mallory, "", &dac(1)),
        Err(CustodianError::OutdatedTerms { agreed: 2, latest: 1, .. })
    ));

    let config = contract.config().unwrap();
    assert!(contract.is_verified_member(&config, &acct("alice")).unwrap());
    assert!(!contract.is_verified_member(&config, &mallory).unwrap());
}

// ---------------------------------------------------------------------------
// 2. Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_update_keeps_lockup_symbol() {
    let contract = contract_with(1, &[]);
    let eos = Asset::new(5, Symbol::new(4, "EOS").unwrap());

    let err = contract
        .update_config(&authority(), eos, 3, 1, TERMS)
        .unwrap_err();
    assert!(matches!(err, CustodianError::SymbolMismatch { .. }));

    let updated = contract
        .update_config(&authority(), dac(250_000), 2, 5, TERMS)
        .unwrap();
    assert_eq!(contract.config().unwrap(), updated);
    assert_eq!(updated.num_elected, 5);
}

#[test]
fn registration_locks_the_configured_stake() {
    let contract = contract_with(1, &[("alice", 250_000)]);
    register(&contract, "alice", 10);

    let alice = contract
        .store()
        .get_candidate(&acct("alice"))
        .unwrap()
        .unwrap();
    assert_eq!(alice.locked_stake, dac(100_000));
    let transfer = contract.ledger().transfers().pop().unwrap();
    assert_eq!(transfer.from, acct("alice"));
    assert_eq!(transfer.to, authority());
    assert_eq!(transfer.quantity, dac(100_000));
}

// ---------------------------------------------------------------------------
// 3. Voting rules
// ---------------------------------------------------------------------------

#[test]
fn chained_proxy_is_rejected() {
    let contract = contract_with(1, &[("alice", 1), ("bob", 1), ("carol", 1)]);
    contract
        .delegate_vote(&acct("bob"), &acct("bob"), &acct("carol"))
        .unwrap();

    let err = contract
        .delegate_vote(&acct("alice"), &acct("alice"), &acct("bob"))
        .unwrap_err();
    assert!(matches!(err, CustodianError::ChainedProxy(_)));
}

#[test]
fn vote_limit_follows_config() {
    let contract = contract_with(1, &[("alice", 1)]);
    let too_many: Vec<AccountName> = ["a", "b", "c", "d"].iter().map(|c| acct(c)).collect();
    let err = contract
        .cast_votes(&acct("alice"), &acct("alice"), &too_many)
        .unwrap_err();
    assert!(matches!(err, CustodianError::TooManyVotes { cast: 4, max: 3 }));
}

// ---------------------------------------------------------------------------
// 4. Periods
// ---------------------------------------------------------------------------

#[test]
fn full_period_cycle_elects_and_pays() {
    let contract = contract_with(
        2,
        &[
            ("alice", 200_000),
            ("bob", 200_000),
            ("carol", 200_000),
            ("v1", 500),
            ("v2", 300),
            ("v3", 100),
        ],
    );
    register(&contract, "alice", 10);
    register(&contract, "bob", 30);
    register(&contract, "carol", 20);

    // v3 delegates to v2, who votes for bob and carol; v1 votes for alice.
    cast(&contract, "v1", &["alice"]);
    cast(&contract, "v2", &["bob", "carol"]);
    contract
        .delegate_vote(&acct("v3"), &acct("v3"), &acct("v2"))
        .unwrap();

    // First rollover: nobody sits yet, so no payroll; v2 carries 400.
    let first = contract.run_period_rollover(&authority()).unwrap();
    assert_eq!(first.median_pay, None);
    assert_eq!(first.elected, vec![acct("alice"), acct("bob")]);
    assert_eq!(custodians(&contract), ["alice", "bob"]);
    assert_eq!(
        contract.store().get_vote(&acct("v2")).unwrap().unwrap().weight,
        400
    );

    // Second rollover pays the sitting custodians the median of {10, 30} = 30.
    let second = contract.run_period_rollover(&authority()).unwrap();
    assert_eq!(second.median_pay, Some(dac(30)));
    for name in ["alice", "bob"] {
        let pending = contract
            .store()
            .get_pending(&acct(name), &sym())
            .unwrap()
            .unwrap();
        assert_eq!(pending.quantity, dac(30));
    }
    assert!(contract
        .store()
        .get_pending(&acct("carol"), &sym())
        .unwrap()
        .is_none());

    let paid = contract.disburse_pending_payments(&authority()).unwrap();
    assert_eq!(paid.len(), 2);
    assert!(contract.store().iter_pending().unwrap().is_empty());
    let payouts: Vec<_> = contract
        .ledger()
        .transfers()
        .into_iter()
        .filter(|t| t.from == authority())
        .collect();
    assert_eq!(payouts.len(), 2);
}

#[test]
fn requested_pay_change_waits_for_next_period() {
    let contract = contract_with(1, &[("alice", 200_000), ("v1", 10)]);
    register(&contract, "alice", 10);
    cast(&contract, "v1", &["alice"]);
    contract.run_period_rollover(&authority()).unwrap();

    contract
        .update_requested_pay(&acct("alice"), &acct("alice"), &dac(50))
        .unwrap();
    contract.run_period_rollover(&authority()).unwrap();
    contract.run_period_rollover(&authority()).unwrap();

    let pending = contract
        .store()
        .get_pending(&acct("alice"), &sym())
        .unwrap()
        .unwrap();
    assert_eq!(pending.quantity, dac(60));
}

#[test]
fn requested_pay_symbol_is_checked() {
    let contract = contract_with(1, &[("alice", 200_000)]);
    register(&contract, "alice", 10);
    let eos = Asset::new(5, Symbol::new(4, "EOS").unwrap());
    assert!(matches!(
        contract.update_requested_pay(&acct("alice"), &acct("alice"), &eos),
        Err(CustodianError::SymbolMismatch { .. })
    ));
}

#[test]
fn deregistration_refunds_stake_once() {
    let contract = contract_with(1, &[("alice", 100_000)]);
    register(&contract, "alice", 10);

    let refund = contract
        .deregister_candidate(&acct("alice"), &acct("alice"))
        .unwrap();
    assert_eq!(refund.quantity, dac(100_000));
    assert_eq!(contract.store().iter_pending().unwrap(), vec![refund]);
    assert!(matches!(
        contract.deregister_candidate(&acct("alice"), &acct("alice")),
        Err(CustodianError::NotFound(_))
    ));

    contract.disburse_pending_payments(&authority()).unwrap();
    let balance = contract
        .ledger()
        .transfers()
        .into_iter()
        .filter(|t| t.to == acct("alice"))
        .map(|t| t.quantity.amount())
        .sum::<u128>();
    assert_eq!(balance, 100_000);
}

#[test]
fn votes_for_deregistered_candidate_do_not_abort_rollover() {
    let contract = contract_with(1, &[("alice", 200_000), ("bob", 200_000), ("v1", 10)]);
    register(&contract, "alice", 10);
    register(&contract, "bob", 10);
    cast(&contract, "v1", &["alice", "bob"]);
    contract
        .deregister_candidate(&acct("alice"), &acct("alice"))
        .unwrap();

    let report = contract.run_period_rollover(&authority()).unwrap();
    assert_eq!(report.skipped_candidate_refs, 1);
    assert_eq!(report.elected, vec![acct("bob")]);
}

#[test]
fn sitting_custodian_deregistration_refunds_exactly_the_stake() {
    let contract = contract_with(1, &[("alice", 100_000), ("v1", 10)]);
    register(&contract, "alice", 10);
    cast(&contract, "v1", &["alice"]);
    contract.run_period_rollover(&authority()).unwrap();
    contract.run_period_rollover(&authority()).unwrap();

    let refund = contract
        .deregister_candidate(&acct("alice"), &acct("alice"))
        .unwrap();
    assert_eq!(refund.quantity, dac(100_000));
    assert_eq!(refund.memo, "Returning locked up stake. Thank you.");

    // The stake joins the accrued pay in the single (receiver, symbol) entry.
    let pending = contract.store().iter_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].quantity, dac(100_010));
    assert_eq!(pending[0].memo, refund.memo);
}
