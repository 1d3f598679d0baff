//! Vote storage trait.

use crate::StoreError;
use dac_types::AccountName;
use serde::{Deserialize, Serialize};

/// One member's standing vote: either a candidate list or a proxy, never both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: AccountName,
    /// Voter this member delegates to (`None` for a direct vote).
    pub proxy: Option<AccountName>,
    /// Weight accumulated during the last tally.
    pub weight: u128,
    /// Candidates voted for, in the order given. Empty while proxying.
    pub candidates: Vec<AccountName>,
}

impl VoteRecord {
    pub fn is_delegation(&self) -> bool {
        self.proxy.is_some()
    }
}

/// Trait for the votes table, keyed by voter with a secondary index on proxy.
pub trait VoteStore {
    fn get_vote(&self, voter: &AccountName) -> Result<Option<VoteRecord>, StoreError>;

    /// Insert or replace a vote record.
    fn put_vote(&self, vote: &VoteRecord) -> Result<(), StoreError>;

    /// All vote records in primary (voter) order.
    fn iter_votes(&self) -> Result<Vec<VoteRecord>, StoreError>;

    /// Voters that currently delegate to `proxy`, in voter order.
    fn iter_delegators_of(&self, proxy: &AccountName) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .iter_votes()?
            .into_iter()
            .filter(|v| v.proxy.as_ref() == Some(proxy))
            .collect())
    }

    fn vote_count(&self) -> Result<u64, StoreError> {
        self.iter_votes().map(|v| v.len() as u64)
    }
}
