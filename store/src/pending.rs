//! Pending payment storage trait.

use crate::StoreError;
use dac_types::{AccountName, Asset, Symbol};
use serde::{Deserialize, Serialize};

/// An amount owed to a payee, waiting for disbursement.
///
/// Keys are `(receiver, symbol)`: a payee has at most one outstanding entry
/// per asset symbol, and accruals add to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub receiver: AccountName,
    pub quantity: Asset,
    pub memo: String,
}

/// Trait for the pending payments table.
pub trait PendingPayStore {
    fn get_pending(
        &self,
        receiver: &AccountName,
        symbol: &Symbol,
    ) -> Result<Option<PendingPayment>, StoreError>;

    /// Insert or replace the entry for `(payment.receiver, payment.quantity.symbol())`.
    fn put_pending(&self, payment: &PendingPayment) -> Result<(), StoreError>;

    /// Delete a pending payment (once it has been paid out).
    fn delete_pending(&self, receiver: &AccountName, symbol: &Symbol) -> Result<(), StoreError>;

    /// All pending payments ordered by receiver, then symbol.
    fn iter_pending(&self) -> Result<Vec<PendingPayment>, StoreError>;
}
