//! Token ledger collaborator.

use crate::StoreError;
use dac_types::{AccountName, Asset, Symbol};

/// Balance lookups and transfers on the external token ledger.
///
/// The engine never computes settlement itself: it only moves amounts it has
/// already decided on.
pub trait TokenLedger {
    /// Balance of `account` in `symbol`, or `None` if the account holds no
    /// balance record for that symbol.
    fn balance(&self, account: &AccountName, symbol: &Symbol) -> Result<Option<Asset>, StoreError>;

    /// Move `quantity` from `from` to `to`.
    ///
    /// Fails with [`StoreError::Transfer`] if the ledger rejects the transfer.
    fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), StoreError>;
}
