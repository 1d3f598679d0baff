//! Nullable store: thread-safe in-memory tables for testing.

use dac_store::{
    Candidate, CandidateStore, ConfigStore, PendingPayStore, PendingPayment, StoreError,
    VoteRecord, VoteStore,
};
use dac_types::{AccountName, CustodianConfig, Symbol};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory implementation of every custodian table.
///
/// Tables are `BTreeMap`s so primary-order iteration is deterministic.
pub struct NullStore {
    config: Mutex<Option<CustodianConfig>>,
    candidates: Mutex<BTreeMap<AccountName, Candidate>>,
    votes: Mutex<BTreeMap<AccountName, VoteRecord>>,
    pending: Mutex<BTreeMap<(AccountName, Symbol), PendingPayment>>,
}

/// Point-in-time copy of every table, for reports and assertions.
#[derive(Clone, Debug, Serialize)]
pub struct StoreSnapshot {
    pub config: Option<CustodianConfig>,
    pub candidates: Vec<Candidate>,
    pub votes: Vec<VoteRecord>,
    pub pending: Vec<PendingPayment>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(None),
            candidates: Mutex::new(BTreeMap::new()),
            votes: Mutex::new(BTreeMap::new()),
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create a store with the config singleton already written.
    pub fn with_config(config: CustodianConfig) -> Self {
        let store = Self::new();
        *store.config.lock().unwrap() = Some(config);
        store
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            config: self.config.lock().unwrap().clone(),
            candidates: self.candidates.lock().unwrap().values().cloned().collect(),
            votes: self.votes.lock().unwrap().values().cloned().collect(),
            pending: self.pending.lock().unwrap().values().cloned().collect(),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for NullStore {
    fn get_config(&self) -> Result<Option<CustodianConfig>, StoreError> {
        Ok(self.config.lock().unwrap().clone())
    }

    fn put_config(&self, config: &CustodianConfig) -> Result<(), StoreError> {
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

impl CandidateStore for NullStore {
    fn get_candidate(&self, name: &AccountName) -> Result<Option<Candidate>, StoreError> {
        Ok(self.candidates.lock().unwrap().get(name).cloned())
    }

    fn put_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        self.candidates
            .lock()
            .unwrap()
            .insert(candidate.name.clone(), candidate.clone());
        Ok(())
    }

    fn delete_candidate(&self, name: &AccountName) -> Result<(), StoreError> {
        self.candidates
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.candidates.lock().unwrap().values().cloned().collect())
    }
}

impl VoteStore for NullStore {
    fn get_vote(&self, voter: &AccountName) -> Result<Option<VoteRecord>, StoreError> {
        Ok(self.votes.lock().unwrap().get(voter).cloned())
    }

    fn put_vote(&self, vote: &VoteRecord) -> Result<(), StoreError> {
        self.votes
            .lock()
            .unwrap()
            .insert(vote.voter.clone(), vote.clone());
        Ok(())
    }

    fn iter_votes(&self) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self.votes.lock().unwrap().values().cloned().collect())
    }
}

impl PendingPayStore for NullStore {
    fn get_pending(
        &self,
        receiver: &AccountName,
        symbol: &Symbol,
    ) -> Result<Option<PendingPayment>, StoreError> {
        Ok(self
            .pending
            .lock()
            .unwrap()
            .get(&(receiver.clone(), symbol.clone()))
            .cloned())
    }

    fn put_pending(&self, payment: &PendingPayment) -> Result<(), StoreError> {
        self.pending.lock().unwrap().insert(
            (payment.receiver.clone(), payment.quantity.symbol().clone()),
            payment.clone(),
        );
        Ok(())
    }

    fn delete_pending(&self, receiver: &AccountName, symbol: &Symbol) -> Result<(), StoreError> {
        self.pending
            .lock()
            .unwrap()
            .remove(&(receiver.clone(), symbol.clone()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("{receiver} {symbol}")))
    }

    fn iter_pending(&self) -> Result<Vec<PendingPayment>, StoreError> {
        Ok(self.pending.lock().unwrap().values().cloned().collect())
    }
}
