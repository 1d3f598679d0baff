//! Externally invocable entry points.
//!
//! Every entry point takes the authenticated caller, checks it against the
//! account the operation requires, loads the configuration once and threads
//! it through the component calls. The host ledger runs each call as one
//! transaction; the components validate before their first write.

use crate::error::CustodianError;
use crate::payroll::PayrollLedger;
use crate::registry::CandidateRegistry;
use crate::rollover::{PeriodRolloverEngine, RolloverReport};
use crate::votes::VoteBook;
use dac_store::{
    Candidate, CandidateStore, ConfigStore, MemberStore, PendingPayStore, PendingPayment,
    TokenLedger, VoteRecord, VoteStore,
};
use dac_types::{AccountName, Asset, CustodianConfig};
use tracing::info;

/// The custodian contract: tables, token ledger and member registry behind
/// the contract's own account, which is also the governing authority.
pub struct DacCustodian<S, L, M> {
    contract: AccountName,
    store: S,
    ledger: L,
    members: M,
}

impl<S, L, M> DacCustodian<S, L, M>
where
    S: CandidateStore + VoteStore + PendingPayStore + ConfigStore,
    L: TokenLedger,
    M: MemberStore,
{
    pub fn new(contract: AccountName, store: S, ledger: L, members: M) -> Self {
        Self {
            contract,
            store,
            ledger,
            members,
        }
    }

    /// The contract account: governing authority, lockup holder and payer.
    pub fn contract(&self) -> &AccountName {
        &self.contract
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn members(&self) -> &M {
        &self.members
    }

    /// Current configuration, initialised to defaults on first read.
    pub fn config(&self) -> Result<CustodianConfig, CustodianError> {
        Ok(self.store.load_or_init_config()?)
    }

    /// Whether `account` has agreed to the current member terms.
    pub fn is_verified_member(
        &self,
        config: &CustodianConfig,
        account: &AccountName,
    ) -> Result<bool, CustodianError> {
        match self.check_member(config, account) {
            Ok(()) => Ok(true),
            Err(CustodianError::NotMember(_) | CustodianError::OutdatedTerms { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Governing authority ─────────────────────────────────────────────

    /// Replace the configuration. The lockup symbol can never change.
    pub fn update_config(
        &self,
        caller: &AccountName,
        lockup_asset: Asset,
        max_votes: u8,
        num_elected: u32,
        latest_terms: u64,
    ) -> Result<CustodianConfig, CustodianError> {
        require_auth(caller, &self.contract)?;
        let current = self.config()?;
        lockup_asset.ensure_symbol(current.lockup_asset.symbol())?;

        let config = CustodianConfig {
            lockup_asset,
            max_votes,
            num_elected,
            latest_terms,
        };
        self.store.put_config(&config)?;
        info!(
            lockup = %config.lockup_asset,
            max_votes,
            num_elected,
            latest_terms,
            "config updated"
        );
        Ok(config)
    }

    /// Close the current period: payroll, vote tally and election.
    pub fn run_period_rollover(
        &self,
        caller: &AccountName,
    ) -> Result<RolloverReport, CustodianError> {
        require_auth(caller, &self.contract)?;
        let config = self.config()?;
        PeriodRolloverEngine::new(&self.store, &self.ledger).run(&config)
    }

    /// Pay out every pending payment from the contract account.
    pub fn disburse_pending_payments(
        &self,
        caller: &AccountName,
    ) -> Result<Vec<PendingPayment>, CustodianError> {
        require_auth(caller, &self.contract)?;
        PayrollLedger::new(&self.store).disburse(&self.ledger, &self.contract)
    }

    // ── Candidates ──────────────────────────────────────────────────────

    pub fn register_candidate(
        &self,
        caller: &AccountName,
        candidate: &AccountName,
        bio: &str,
        requested_pay: &Asset,
    ) -> Result<Candidate, CustodianError> {
        require_auth(caller, candidate)?;
        let config = self.config()?;
        self.check_member(&config, candidate)?;
        CandidateRegistry::new(&self.store).register(
            &config,
            &self.ledger,
            &self.contract,
            candidate,
            bio,
            requested_pay,
        )
    }

    pub fn deregister_candidate(
        &self,
        caller: &AccountName,
        candidate: &AccountName,
    ) -> Result<PendingPayment, CustodianError> {
        require_auth(caller, candidate)?;
        CandidateRegistry::new(&self.store).deregister(candidate)
    }

    pub fn update_bio(
        &self,
        caller: &AccountName,
        candidate: &AccountName,
        bio: &str,
    ) -> Result<Candidate, CustodianError> {
        require_auth(caller, candidate)?;
        CandidateRegistry::new(&self.store).update_bio(candidate, bio)
    }

    pub fn update_requested_pay(
        &self,
        caller: &AccountName,
        candidate: &AccountName,
        requested_pay: &Asset,
    ) -> Result<Candidate, CustodianError> {
        require_auth(caller, candidate)?;
        let config = self.config()?;
        CandidateRegistry::new(&self.store).update_requested_pay(&config, candidate, requested_pay)
    }

    // ── Voting ──────────────────────────────────────────────────────────

    pub fn cast_votes(
        &self,
        caller: &AccountName,
        voter: &AccountName,
        candidates: &[AccountName],
    ) -> Result<VoteRecord, CustodianError> {
        require_auth(caller, voter)?;
        let config = self.config()?;
        self.check_member(&config, voter)?;
        VoteBook::new(&self.store).cast_direct_votes(&config, voter, candidates)
    }

    pub fn delegate_vote(
        &self,
        caller: &AccountName,
        voter: &AccountName,
        proxy: &AccountName,
    ) -> Result<VoteRecord, CustodianError> {
        require_auth(caller, voter)?;
        let config = self.config()?;
        self.check_member(&config, voter)?;
        VoteBook::new(&self.store).delegate_to_proxy(voter, proxy)
    }

    /// A verified member is registered and has agreed to exactly the latest terms.
    fn check_member(
        &self,
        config: &CustodianConfig,
        account: &AccountName,
    ) -> Result<(), CustodianError> {
        match self.members.agreed_terms(account)? {
            None | Some(0) => Err(CustodianError::NotMember(account.to_string())),
            Some(agreed) if agreed != config.latest_terms => Err(CustodianError::OutdatedTerms {
                account: account.to_string(),
                agreed,
                latest: config.latest_terms,
            }),
            Some(_) => Ok(()),
        }
    }
}

fn require_auth(caller: &AccountName, expected: &AccountName) -> Result<(), CustodianError> {
    if caller != expected {
        return Err(CustodianError::NotAuthorized {
            expected: expected.to_string(),
            caller: caller.to_string(),
        });
    }
    Ok(())
}
