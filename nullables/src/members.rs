//! Nullable member registry.

use dac_store::{MemberStore, StoreError};
use dac_types::AccountName;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory member registry: account → agreed terms version.
#[derive(Default)]
pub struct NullMembers {
    members: Mutex<BTreeMap<AccountName, u64>>,
}

impl NullMembers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` as having agreed to `terms`.
    pub fn register(&self, account: &AccountName, terms: u64) {
        self.members.lock().unwrap().insert(account.clone(), terms);
    }

    pub fn remove(&self, account: &AccountName) {
        self.members.lock().unwrap().remove(account);
    }
}

impl MemberStore for NullMembers {
    fn agreed_terms(&self, account: &AccountName) -> Result<Option<u64>, StoreError> {
        Ok(self.members.lock().unwrap().get(account).copied())
    }
}
