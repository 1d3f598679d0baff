//! Period rollover: payroll, vote reset, weighted tally, election.
//!
//! A rollover runs four phases strictly in order over an in-memory working
//! set of the candidates and votes tables:
//!
//! - **A. Payroll**: every sitting custodian accrues the median of the
//!   custodians' requested pay. No custodians, no payroll.
//! - **B. Reset**: all voter weights and candidate totals go to zero.
//! - **C. Tally**: delegators are processed before direct voters. Each
//!   voter's token balance is added to their own weight; a delegator's balance
//!   is also added to their proxy's weight. A direct voter then adds their
//!   accumulated weight to every candidate on their list.
//! - **D. Election**: the top `num_elected` candidates by votes become
//!   custodians (ties by name) and pending pay rates take effect.
//!
//! The working set is written back only after all four phases succeed, so a
//! failed rollover leaves every table as it was.

use crate::error::CustodianError;
use crate::payroll::{median_pay, PayrollLedger, CUSTODIAN_PAY_MEMO};
use crate::registry::CandidateRegistry;
use dac_store::{
    Candidate, CandidateStore, PendingPayStore, PendingPayment, TokenLedger, VoteRecord, VoteStore,
};
use dac_types::{AccountName, Asset, CustodianConfig, Symbol};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Outcome of one rollover.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    /// Flat pay accrued to each outgoing custodian (`None` when there were none).
    pub median_pay: Option<Asset>,
    /// Outgoing custodians that were paid.
    pub paid: Vec<AccountName>,
    /// Incoming custodians, highest votes first.
    pub elected: Vec<AccountName>,
    /// Sum of all candidates' vote totals after the tally.
    pub total_votes: u128,
    /// Voters without a balance record; they contributed no weight of their own.
    pub missing_balances: Vec<AccountName>,
    /// Vote list entries naming candidates that no longer exist.
    pub skipped_candidate_refs: usize,
    /// Delegators whose weight reached no candidate: the proxy has no direct
    /// vote, or none of the candidates it names are registered.
    pub unused_delegations: Vec<AccountName>,
}

/// Candidates and votes loaded for one rollover, plus the payroll it produces.
struct WorkingSet {
    candidates: BTreeMap<AccountName, Candidate>,
    votes: BTreeMap<AccountName, VoteRecord>,
    payroll: Vec<PendingPayment>,
}

/// Runs the period rollover against the tables and the token ledger.
pub struct PeriodRolloverEngine<'a, S, L> {
    store: &'a S,
    ledger: &'a L,
}

impl<'a, S, L> PeriodRolloverEngine<'a, S, L>
where
    S: CandidateStore + VoteStore + PendingPayStore,
    L: TokenLedger,
{
    pub fn new(store: &'a S, ledger: &'a L) -> Self {
        Self { store, ledger }
    }

    /// Run phases A–D and commit the result.
    pub fn run(&self, config: &CustodianConfig) -> Result<RolloverReport, CustodianError> {
        let mut report = RolloverReport::default();
        let mut work = WorkingSet {
            candidates: self
                .store
                .iter_candidates()?
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
            votes: self
                .store
                .iter_votes()?
                .into_iter()
                .map(|v| (v.voter.clone(), v))
                .collect(),
            payroll: Vec::new(),
        };

        self.accrue_payroll(config, &mut work, &mut report)?;
        reset_weights(&mut work);
        self.tally_votes(config.pay_symbol(), &mut work, &mut report)?;
        elect(config, &mut work, &mut report);

        self.commit(&work)?;
        info!(
            elected = report.elected.len(),
            paid = report.paid.len(),
            median = ?report.median_pay.as_ref().map(ToString::to_string),
            total_votes = report.total_votes,
            "period rollover complete"
        );
        Ok(report)
    }

    /// Phase A: accrue the median requested pay to every sitting custodian.
    fn accrue_payroll(
        &self,
        config: &CustodianConfig,
        work: &mut WorkingSet,
        report: &mut RolloverReport,
    ) -> Result<(), CustodianError> {
        let custodians: Vec<Candidate> = CandidateRegistry::new(self.store)
            .by_custodian_and_pay()?
            .into_iter()
            .take_while(|c| c.is_custodian)
            .collect();

        let pays = custodians.iter().map(|c| c.requested_pay.amount()).collect();
        let Some(median) = median_pay(pays) else {
            debug!("no sitting custodians, payroll skipped");
            return Ok(());
        };
        let median = Asset::new(median, config.pay_symbol().clone());

        let payroll = PayrollLedger::new(self.store);
        for custodian in &custodians {
            let entry = payroll.plan_accrual(&custodian.name, &median, CUSTODIAN_PAY_MEMO)?;
            work.payroll.push(entry);
            report.paid.push(custodian.name.clone());
        }
        debug!(median = %median, custodians = custodians.len(), "payroll accrued");
        report.median_pay = Some(median);
        Ok(())
    }

    /// Phase C: fold balances into voter weights, then voter weights into candidates.
    fn tally_votes(
        &self,
        symbol: &Symbol,
        work: &mut WorkingSet,
        report: &mut RolloverReport,
    ) -> Result<(), CustodianError> {
        let (delegators, direct): (Vec<&VoteRecord>, Vec<&VoteRecord>) =
            work.votes.values().partition(|v| v.is_delegation());
        let delegators: Vec<AccountName> = delegators.into_iter().map(|v| v.voter.clone()).collect();
        let direct: Vec<AccountName> = direct.into_iter().map(|v| v.voter.clone()).collect();

        // Delegators first, so every proxy holds its delegated weight
        // before its own candidate list is counted.
        for voter in &delegators {
            let balance = self.balance_of(voter, symbol, report)?;
            let Some(record) = work.votes.get_mut(voter) else {
                continue;
            };
            record.weight = checked_add(record.weight, balance)?;
            let Some(proxy) = record.proxy.clone() else {
                continue;
            };
            match work.votes.get_mut(&proxy) {
                Some(target) => {
                    target.weight = checked_add(target.weight, balance)?;
                    let reaches_candidate = target
                        .candidates
                        .iter()
                        .any(|name| work.candidates.contains_key(name));
                    if target.proxy.is_some() || !reaches_candidate {
                        debug!(voter = %voter, proxy = %proxy, "proxy votes for no registered candidate, delegation unused");
                        report.unused_delegations.push(voter.clone());
                    }
                }
                None => {
                    debug!(voter = %voter, proxy = %proxy, "proxy has no vote record, delegation unused");
                    report.unused_delegations.push(voter.clone());
                }
            }
        }

        for voter in &direct {
            let balance = self.balance_of(voter, symbol, report)?;
            let Some(record) = work.votes.get_mut(voter) else {
                continue;
            };
            record.weight = checked_add(record.weight, balance)?;
            let weight = record.weight;
            for name in &record.candidates {
                match work.candidates.get_mut(name) {
                    Some(candidate) => {
                        candidate.total_votes = checked_add(candidate.total_votes, weight)?;
                    }
                    None => {
                        debug!(voter = %voter, candidate = %name, "vote for unregistered candidate skipped");
                        report.skipped_candidate_refs += 1;
                    }
                }
            }
        }

        report.total_votes = work
            .candidates
            .values()
            .try_fold(0u128, |sum, c| checked_add(sum, c.total_votes))?;
        Ok(())
    }

    /// Token balance used as vote weight; a missing balance record counts as zero.
    fn balance_of(
        &self,
        voter: &AccountName,
        symbol: &Symbol,
        report: &mut RolloverReport,
    ) -> Result<u128, CustodianError> {
        match self.ledger.balance(voter, symbol)? {
            Some(balance) => Ok(balance.amount()),
            None => {
                warn!(voter = %voter, symbol = %symbol, "voter has no balance, contributes no weight");
                report.missing_balances.push(voter.clone());
                Ok(0)
            }
        }
    }

    /// Write the working set back.
    fn commit(&self, work: &WorkingSet) -> Result<(), CustodianError> {
        for entry in &work.payroll {
            self.store.put_pending(entry)?;
        }
        for vote in work.votes.values() {
            self.store.put_vote(vote)?;
        }
        for candidate in work.candidates.values() {
            self.store.put_candidate(candidate)?;
        }
        Ok(())
    }
}

/// Phase B: zero every voter weight and candidate total.
fn reset_weights(work: &mut WorkingSet) {
    for vote in work.votes.values_mut() {
        vote.weight = 0;
    }
    for candidate in work.candidates.values_mut() {
        candidate.total_votes = 0;
    }
}

/// Phase D: seat the top candidates and apply pending pay rates.
fn elect(config: &CustodianConfig, work: &mut WorkingSet, report: &mut RolloverReport) {
    let mut ranking: Vec<&mut Candidate> = work.candidates.values_mut().collect();
    ranking.sort_by(|a, b| a.vote_rank().cmp(&b.vote_rank()));

    let seats = usize::try_from(config.num_elected).unwrap_or(usize::MAX);
    for (rank, candidate) in ranking.into_iter().enumerate() {
        candidate.is_custodian = rank < seats;
        if candidate.is_custodian {
            report.elected.push(candidate.name.clone());
        }
        if !candidate.pending_requested_pay.is_zero() {
            candidate.requested_pay = candidate.pending_requested_pay.clone();
            candidate.pending_requested_pay =
                Asset::zero(candidate.pending_requested_pay.symbol().clone());
        }
    }
}

fn checked_add(a: u128, b: u128) -> Result<u128, CustodianError> {
    a.checked_add(b).ok_or(CustodianError::Overflow)
}
