//! Vote book: direct votes and one-level proxy delegation.
//!
//! A member either votes for a list of candidates or delegates their weight
//! to another member (the proxy). Delegation is never transitive: a proxy
//! may not itself delegate, and a member others delegate to may not delegate
//! onward. Both operations are upserts: repeating a call with the same
//! arguments leaves the record unchanged.

use crate::error::CustodianError;
use dac_store::{VoteRecord, VoteStore};
use dac_types::{AccountName, CustodianConfig};
use std::collections::HashSet;
use tracing::debug;

/// Manages the votes table.
pub struct VoteBook<'a, S> {
    store: &'a S,
}

impl<'a, S: VoteStore> VoteBook<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The voter's record, failing with `NotFound`.
    pub fn get(&self, voter: &AccountName) -> Result<VoteRecord, CustodianError> {
        self.store
            .get_vote(voter)?
            .ok_or_else(|| CustodianError::NotFound(format!("vote of {voter}")))
    }

    /// Vote directly for `candidates`, replacing any previous vote or delegation.
    ///
    /// Candidates are not checked for registration: references to candidates
    /// that are gone at tally time are skipped.
    pub fn cast_direct_votes(
        &self,
        config: &CustodianConfig,
        voter: &AccountName,
        candidates: &[AccountName],
    ) -> Result<VoteRecord, CustodianError> {
        if candidates.len() > usize::from(config.max_votes) {
            return Err(CustodianError::TooManyVotes {
                cast: candidates.len(),
                max: config.max_votes,
            });
        }
        let mut seen = HashSet::new();
        for candidate in candidates {
            if !seen.insert(candidate) {
                return Err(CustodianError::DuplicateVote(candidate.to_string()));
            }
        }

        let record = match self.store.get_vote(voter)? {
            Some(mut existing) => {
                existing.candidates = candidates.to_vec();
                existing.proxy = None;
                existing
            }
            None => VoteRecord {
                voter: voter.clone(),
                proxy: None,
                weight: 0,
                candidates: candidates.to_vec(),
            },
        };
        self.store.put_vote(&record)?;
        debug!(voter = %voter, count = candidates.len(), "direct votes cast");
        Ok(record)
    }

    /// Delegate `voter`'s weight to `proxy`, clearing any direct votes.
    pub fn delegate_to_proxy(
        &self,
        voter: &AccountName,
        proxy: &AccountName,
    ) -> Result<VoteRecord, CustodianError> {
        if voter == proxy {
            return Err(CustodianError::SelfDelegation);
        }
        if let Some(target) = self.store.get_vote(proxy)? {
            if let Some(onward) = target.proxy {
                return Err(CustodianError::ChainedProxy(format!(
                    "{proxy} already delegates to {onward}"
                )));
            }
        }
        if let Some(delegator) = self
            .store
            .iter_delegators_of(voter)?
            .into_iter()
            .next()
        {
            return Err(CustodianError::ChainedProxy(format!(
                "{voter} is the proxy of {}",
                delegator.voter
            )));
        }

        let record = match self.store.get_vote(voter)? {
            Some(mut existing) => {
                existing.candidates.clear();
                existing.proxy = Some(proxy.clone());
                existing
            }
            None => VoteRecord {
                voter: voter.clone(),
                proxy: Some(proxy.clone()),
                weight: 0,
                candidates: Vec::new(),
            },
        };
        self.store.put_vote(&record)?;
        debug!(voter = %voter, proxy = %proxy, "vote delegated");
        Ok(record)
    }

    /// Voters that delegate to `proxy`.
    pub fn delegators_of(&self, proxy: &AccountName) -> Result<Vec<AccountName>, CustodianError> {
        Ok(self
            .store
            .iter_delegators_of(proxy)?
            .into_iter()
            .map(|v| v.voter)
            .collect())
    }
}
