//! Candidate storage trait.

use crate::StoreError;
use dac_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A registered custodian candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: AccountName,
    pub bio: String,
    /// Pay rate used for the current period's payroll.
    pub requested_pay: Asset,
    /// Pay rate that replaces `requested_pay` at the next rollover (zero = no change).
    pub pending_requested_pay: Asset,
    pub is_custodian: bool,
    /// Stake locked at registration, refunded on deregistration.
    pub locked_stake: Asset,
    /// Weighted votes from the last tally.
    pub total_votes: u128,
}

impl Candidate {
    /// Sort key of the vote ranking: `total_votes` descending, then name.
    ///
    /// The election seats candidates in exactly this order.
    pub fn vote_rank(&self) -> (Reverse<u128>, &AccountName) {
        (Reverse(self.total_votes), &self.name)
    }

    /// Sort key of the payroll ranking: custodians first, then
    /// `requested_pay` descending, then name.
    pub fn pay_rank(&self) -> (Reverse<bool>, Reverse<u128>, &AccountName) {
        (
            Reverse(self.is_custodian),
            Reverse(self.requested_pay.amount()),
            &self.name,
        )
    }
}

/// Trait for the candidates table.
///
/// The primary order is by candidate name. The two secondary orders are
/// provided as default methods; backends with real secondary indexes may
/// override them but must keep the same order.
pub trait CandidateStore {
    fn get_candidate(&self, name: &AccountName) -> Result<Option<Candidate>, StoreError>;

    /// Insert or replace a candidate.
    fn put_candidate(&self, candidate: &Candidate) -> Result<(), StoreError>;

    fn delete_candidate(&self, name: &AccountName) -> Result<(), StoreError>;

    /// All candidates in primary (name) order.
    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Candidates ordered by `(is_custodian, requested_pay)` descending,
    /// ties by name ascending.
    fn iter_by_custodian_and_pay(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates = self.iter_candidates()?;
        candidates.sort_by(|a, b| a.pay_rank().cmp(&b.pay_rank()));
        Ok(candidates)
    }

    /// Candidates ordered by `total_votes` descending, ties by name ascending.
    fn iter_by_votes(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates = self.iter_candidates()?;
        candidates.sort_by(|a, b| a.vote_rank().cmp(&b.vote_rank()));
        Ok(candidates)
    }
}
