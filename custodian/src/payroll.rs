//! Payroll ledger: amounts owed per payee, accumulated until disbursed.
//!
//! Custodian pay follows the median rule: every sitting custodian is owed the
//! same amount, the median of the custodians' requested rates.

use crate::error::CustodianError;
use dac_store::{PendingPayStore, PendingPayment, TokenLedger};
use dac_types::{AccountName, Asset};
use tracing::{debug, info};

/// Memo attached to custodian pay entries.
pub const CUSTODIAN_PAY_MEMO: &str = "Custodian pay. Thank you.";

/// Memo attached to stake refunds on deregistration.
pub const STAKE_REFUND_MEMO: &str = "Returning locked up stake. Thank you.";

/// Median of the requested pay amounts.
///
/// Takes the element at index `len / 2` of the ascending order: the middle
/// value for odd counts, the upper of the two middle values for even counts.
/// Never an average. Returns `None` for an empty set.
pub fn median_pay(mut pays: Vec<u128>) -> Option<u128> {
    if pays.is_empty() {
        return None;
    }
    let mid = pays.len() / 2;
    let (_, median, _) = pays.select_nth_unstable(mid);
    Some(*median)
}

/// Accrues and disburses pending payments.
pub struct PayrollLedger<'a, P> {
    store: &'a P,
}

impl<'a, P: PendingPayStore> PayrollLedger<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }

    /// Compute the entry `payee` would hold after accruing `amount`, without writing it.
    ///
    /// An existing entry of the same symbol is incremented and keeps its memo.
    pub fn plan_accrual(
        &self,
        payee: &AccountName,
        amount: &Asset,
        memo: &str,
    ) -> Result<PendingPayment, CustodianError> {
        match self.store.get_pending(payee, amount.symbol())? {
            Some(mut entry) => {
                entry.quantity = entry.quantity.checked_add(amount)?;
                Ok(entry)
            }
            None => Ok(PendingPayment {
                receiver: payee.clone(),
                quantity: amount.clone(),
                memo: memo.to_string(),
            }),
        }
    }

    /// Add `amount` to the payee's pending entry for its symbol, creating it if needed.
    pub fn accrue(
        &self,
        payee: &AccountName,
        amount: &Asset,
        memo: &str,
    ) -> Result<PendingPayment, CustodianError> {
        let entry = self.plan_accrual(payee, amount, memo)?;
        self.store.put_pending(&entry)?;
        debug!(payee = %payee, amount = %amount, total = %entry.quantity, "accrued pending payment");
        Ok(entry)
    }

    /// All outstanding entries.
    pub fn pending(&self) -> Result<Vec<PendingPayment>, CustodianError> {
        Ok(self.store.iter_pending()?)
    }

    /// Pay out every pending entry from `from` and remove it.
    ///
    /// Each entry is removed only after its transfer succeeded. A rejected
    /// transfer stops the pass: entries already paid stay removed, the rest
    /// stay pending. Zero entries are removed without a transfer.
    pub fn disburse<L: TokenLedger>(
        &self,
        ledger: &L,
        from: &AccountName,
    ) -> Result<Vec<PendingPayment>, CustodianError> {
        let mut paid = Vec::new();
        for entry in self.store.iter_pending()? {
            if !entry.quantity.is_zero() {
                ledger.transfer(from, &entry.receiver, &entry.quantity, &entry.memo)?;
            }
            self.store
                .delete_pending(&entry.receiver, entry.quantity.symbol())?;
            debug!(receiver = %entry.receiver, quantity = %entry.quantity, "disbursed pending payment");
            paid.push(entry);
        }
        info!(count = paid.len(), "pending payments disbursed");
        Ok(paid)
    }
}
