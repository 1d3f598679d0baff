//! Nullable token ledger: balances in memory, transfers recorded.

use dac_store::{StoreError, TokenLedger};
use dac_types::{AccountName, Asset, Symbol};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// A transfer executed by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub from: AccountName,
    pub to: AccountName,
    pub quantity: Asset,
    pub memo: String,
}

/// An in-memory token ledger for testing.
///
/// Accounts without a balance record return `None` from
/// [`TokenLedger::balance`], which differs from holding zero tokens.
#[derive(Default)]
pub struct NullTokenLedger {
    balances: Mutex<BTreeMap<(AccountName, Symbol), u128>>,
    transfers: Mutex<Vec<TransferRecord>>,
    /// Receivers whose incoming transfers are rejected.
    blocked: Mutex<BTreeSet<AccountName>>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an account's balance, creating its balance record.
    pub fn set_balance(&self, account: &AccountName, balance: &Asset) {
        self.balances.lock().unwrap().insert(
            (account.clone(), balance.symbol().clone()),
            balance.amount(),
        );
    }

    /// Reject every future transfer to `account`.
    pub fn block_receiver(&self, account: &AccountName) {
        self.blocked.lock().unwrap().insert(account.clone());
    }

    /// Every balance record, ordered by account then symbol.
    pub fn balances(&self) -> Vec<(AccountName, Asset)> {
        self.balances
            .lock()
            .unwrap()
            .iter()
            .map(|((account, symbol), amount)| (account.clone(), Asset::new(*amount, symbol.clone())))
            .collect()
    }

    /// All transfers executed so far, oldest first.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.lock().unwrap().clone()
    }
}

impl TokenLedger for NullTokenLedger {
    fn balance(&self, account: &AccountName, symbol: &Symbol) -> Result<Option<Asset>, StoreError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(account.clone(), symbol.clone()))
            .map(|amount| Asset::new(*amount, symbol.clone())))
    }

    fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), StoreError> {
        if self.blocked.lock().unwrap().contains(to) {
            return Err(StoreError::Transfer(format!("{to} does not accept transfers")));
        }
        let mut balances = self.balances.lock().unwrap();
        let from_key = (from.clone(), quantity.symbol().clone());
        let available = balances.get(&from_key).copied().unwrap_or(0);
        let remaining = available.checked_sub(quantity.amount()).ok_or_else(|| {
            StoreError::Transfer(format!(
                "{from} has insufficient balance for {quantity}"
            ))
        })?;
        let to_key = (to.clone(), quantity.symbol().clone());
        let credited = balances
            .get(&to_key)
            .copied()
            .unwrap_or(0)
            .checked_add(quantity.amount())
            .ok_or_else(|| StoreError::Transfer(format!("{to} balance overflow")))?;
        balances.insert(from_key, remaining);
        balances.insert(to_key, credited);
        self.transfers.lock().unwrap().push(TransferRecord {
            from: from.clone(),
            to: to.clone(),
            quantity: quantity.clone(),
            memo: memo.to_string(),
        });
        Ok(())
    }
}
