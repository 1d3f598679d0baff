//! Member registry lookup.

use crate::StoreError;
use dac_types::AccountName;

/// Read access to the external member registry.
///
/// Membership is maintained by the token contract; the engine only asks
/// which version of the member terms an account has agreed to.
pub trait MemberStore {
    /// Terms version the account agreed to, or `None` if it is not registered.
    fn agreed_terms(&self, account: &AccountName) -> Result<Option<u64>, StoreError>;
}
