//! Candidate registry: registration, deregistration and profile updates.

use crate::error::CustodianError;
use crate::payroll::{PayrollLedger, STAKE_REFUND_MEMO};
use dac_store::{Candidate, CandidateStore, PendingPayStore, PendingPayment, TokenLedger};
use dac_types::{AccountName, Asset, CustodianConfig};
use tracing::info;

/// Memo on the stake transfer made at registration.
pub const LOCKUP_MEMO: &str = "Candidate lockup amount";

/// Manages the candidates table.
///
/// Authentication is the caller's concern (see [`crate::DacCustodian`]); the
/// registry only enforces table invariants.
pub struct CandidateRegistry<'a, S> {
    store: &'a S,
}

impl<'a, S: CandidateStore + PendingPayStore> CandidateRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Look up a candidate, failing with `NotFound`.
    pub fn get(&self, name: &AccountName) -> Result<Candidate, CustodianError> {
        self.store
            .get_candidate(name)?
            .ok_or_else(|| CustodianError::NotFound(format!("candidate {name}")))
    }

    /// Register a new candidate.
    ///
    /// Transfers the configured lockup from the candidate to `contract` and
    /// records it as the candidate's locked stake. Nothing is written if the
    /// name is taken, the pay symbol is wrong, or the transfer is rejected.
    pub fn register<L: TokenLedger>(
        &self,
        config: &CustodianConfig,
        ledger: &L,
        contract: &AccountName,
        name: &AccountName,
        bio: &str,
        requested_pay: &Asset,
    ) -> Result<Candidate, CustodianError> {
        if self.store.get_candidate(name)?.is_some() {
            return Err(CustodianError::AlreadyRegistered(name.to_string()));
        }
        requested_pay.ensure_symbol(config.pay_symbol())?;

        ledger.transfer(name, contract, &config.lockup_asset, LOCKUP_MEMO)?;

        let candidate = Candidate {
            name: name.clone(),
            bio: bio.to_string(),
            requested_pay: requested_pay.clone(),
            pending_requested_pay: Asset::zero(config.pay_symbol().clone()),
            is_custodian: false,
            locked_stake: config.lockup_asset.clone(),
            total_votes: 0,
        };
        self.store.put_candidate(&candidate)?;
        info!(candidate = %name, stake = %candidate.locked_stake, "candidate registered");
        Ok(candidate)
    }

    /// Remove a candidate and enqueue the refund of their locked stake.
    ///
    /// Returns the refund itself: the locked stake under the refund memo. If
    /// the candidate already has pay pending in the same symbol, the stake is
    /// merged into that entry and the entry takes the refund memo.
    pub fn deregister(&self, name: &AccountName) -> Result<PendingPayment, CustodianError> {
        let candidate = self.get(name)?;
        let payroll = PayrollLedger::new(self.store);
        let mut entry = payroll.plan_accrual(name, &candidate.locked_stake, STAKE_REFUND_MEMO)?;
        entry.memo = STAKE_REFUND_MEMO.to_string();

        self.store.delete_candidate(name)?;
        self.store.put_pending(&entry)?;
        info!(
            candidate = %name,
            refund = %candidate.locked_stake,
            pending = %entry.quantity,
            "candidate deregistered"
        );
        Ok(PendingPayment {
            receiver: name.clone(),
            quantity: candidate.locked_stake,
            memo: STAKE_REFUND_MEMO.to_string(),
        })
    }

    pub fn update_bio(&self, name: &AccountName, bio: &str) -> Result<Candidate, CustodianError> {
        let mut candidate = self.get(name)?;
        candidate.bio = bio.to_string();
        self.store.put_candidate(&candidate)?;
        Ok(candidate)
    }

    /// Set the pay rate that takes effect at the next rollover.
    ///
    /// The active `requested_pay` is untouched until then.
    pub fn update_requested_pay(
        &self,
        config: &CustodianConfig,
        name: &AccountName,
        requested_pay: &Asset,
    ) -> Result<Candidate, CustodianError> {
        let mut candidate = self.get(name)?;
        requested_pay.ensure_symbol(config.pay_symbol())?;
        candidate.pending_requested_pay = requested_pay.clone();
        self.store.put_candidate(&candidate)?;
        Ok(candidate)
    }

    /// Candidates by `(is_custodian, requested_pay)` descending.
    pub fn by_custodian_and_pay(&self) -> Result<Vec<Candidate>, CustodianError> {
        Ok(self.store.iter_by_custodian_and_pay()?)
    }

    /// Candidates by `total_votes` descending, ties by name ascending.
    pub fn by_votes(&self) -> Result<Vec<Candidate>, CustodianError> {
        Ok(self.store.iter_by_votes()?)
    }
}
