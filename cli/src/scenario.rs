//! Scenario files: seed balances and members, then replay contract calls in order.
//!
//! ```toml
//! contract = "daccustodian"
//!
//! [config]
//! lockup_asset = "10.0000 EOSDAC"
//! latest_terms = 1
//!
//! [[balances]]
//! account = "alice"
//! balance = "50.0000 EOSDAC"
//!
//! [[members]]
//! account = "alice"
//! terms = 1
//!
//! [[actions]]
//! call = "register_candidate"
//! candidate = "alice"
//! requested_pay = "5.0000 EOSDAC"
//! ```
//!
//! Calls default to the account they act for as caller (the contract for
//! governing calls); set `caller` to replay an unauthorized call.

use anyhow::{Context, Result};
use dac_custodian::{CustodianError, DacCustodian, RolloverReport};
use dac_nullables::{NullMembers, NullStore, NullTokenLedger, StoreSnapshot, TransferRecord};
use dac_store::{Candidate, PendingPayment, VoteRecord};
use dac_types::{AccountName, Asset, CustodianConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

fn default_contract() -> AccountName {
    AccountName::new("daccustodian")
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Contract account: governing authority, lockup holder and payer.
    #[serde(default = "default_contract")]
    pub contract: AccountName,

    /// Initial configuration. Absent means defaults on first read.
    #[serde(default)]
    pub config: Option<CustodianConfig>,

    /// Keep replaying after a failed call instead of stopping.
    #[serde(default)]
    pub continue_on_error: bool,

    #[serde(default)]
    pub balances: Vec<BalanceEntry>,

    #[serde(default)]
    pub members: Vec<MemberEntry>,

    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: AccountName,
    pub balance: Asset,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MemberEntry {
    pub account: AccountName,
    pub terms: u64,
}

/// One contract call.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Action {
    UpdateConfig {
        caller: Option<AccountName>,
        lockup_asset: Asset,
        max_votes: u8,
        num_elected: u32,
        latest_terms: u64,
    },
    RegisterCandidate {
        caller: Option<AccountName>,
        candidate: AccountName,
        #[serde(default)]
        bio: String,
        requested_pay: Asset,
    },
    DeregisterCandidate {
        caller: Option<AccountName>,
        candidate: AccountName,
    },
    UpdateBio {
        caller: Option<AccountName>,
        candidate: AccountName,
        bio: String,
    },
    UpdateRequestedPay {
        caller: Option<AccountName>,
        candidate: AccountName,
        requested_pay: Asset,
    },
    CastVotes {
        caller: Option<AccountName>,
        voter: AccountName,
        #[serde(default)]
        candidates: Vec<AccountName>,
    },
    DelegateVote {
        caller: Option<AccountName>,
        voter: AccountName,
        proxy: AccountName,
    },
    RunPeriodRollover {
        caller: Option<AccountName>,
    },
    DisbursePendingPayments {
        caller: Option<AccountName>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateConfig { .. } => "update_config",
            Self::RegisterCandidate { .. } => "register_candidate",
            Self::DeregisterCandidate { .. } => "deregister_candidate",
            Self::UpdateBio { .. } => "update_bio",
            Self::UpdateRequestedPay { .. } => "update_requested_pay",
            Self::CastVotes { .. } => "cast_votes",
            Self::DelegateVote { .. } => "delegate_vote",
            Self::RunPeriodRollover { .. } => "run_period_rollover",
            Self::DisbursePendingPayments { .. } => "disburse_pending_payments",
        }
    }

    /// The explicit caller, or the account the call acts for.
    pub fn caller(&self, contract: &AccountName) -> AccountName {
        let (explicit, acting) = match self {
            Self::UpdateConfig { caller, .. }
            | Self::RunPeriodRollover { caller }
            | Self::DisbursePendingPayments { caller } => (caller, contract),
            Self::RegisterCandidate { caller, candidate, .. }
            | Self::DeregisterCandidate { caller, candidate }
            | Self::UpdateBio { caller, candidate, .. }
            | Self::UpdateRequestedPay { caller, candidate, .. } => (caller, candidate),
            Self::CastVotes { caller, voter, .. } | Self::DelegateVote { caller, voter, .. } => {
                (caller, voter)
            }
        };
        explicit.clone().unwrap_or_else(|| acting.clone())
    }
}

/// What a successful call returned.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CallResult {
    Config(CustodianConfig),
    Candidate(Candidate),
    Refund(PendingPayment),
    Vote(VoteRecord),
    Rollover(RolloverReport),
    Disbursed(Vec<PendingPayment>),
}

#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub call: &'static str,
    pub caller: AccountName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CallResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a replay produced, serialized as the command output.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub contract: AccountName,
    pub steps: Vec<StepOutcome>,
    /// First failed step when the replay stopped early.
    pub stopped_at: Option<usize>,
    pub tables: StoreSnapshot,
    pub balances: Vec<BalanceEntry>,
    pub transfers: Vec<TransferRecord>,
}

impl ScenarioReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }
}

type Contract = DacCustodian<NullStore, NullTokenLedger, NullMembers>;

impl Scenario {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Replay the scenario. `config` replaces the scenario's own configuration.
    pub fn run(self, config: Option<CustodianConfig>) -> ScenarioReport {
        let store = match config.or(self.config) {
            Some(config) => NullStore::with_config(config),
            None => NullStore::new(),
        };
        let ledger = NullTokenLedger::new();
        for entry in &self.balances {
            ledger.set_balance(&entry.account, &entry.balance);
        }
        let members = NullMembers::new();
        for entry in &self.members {
            members.register(&entry.account, entry.terms);
        }
        let contract = DacCustodian::new(self.contract.clone(), store, ledger, members);

        let mut steps = Vec::with_capacity(self.actions.len());
        let mut stopped_at = None;
        for (step, action) in self.actions.iter().enumerate() {
            let caller = action.caller(&self.contract);
            let outcome = match apply(&contract, &caller, action) {
                Ok(result) => {
                    debug!(step, call = action.name(), caller = %caller, "call succeeded");
                    StepOutcome {
                        step,
                        call: action.name(),
                        caller,
                        result: Some(result),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(step, call = action.name(), caller = %caller, error = %e, "call failed");
                    StepOutcome {
                        step,
                        call: action.name(),
                        caller,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            let failed = outcome.error.is_some();
            steps.push(outcome);
            if failed && !self.continue_on_error {
                stopped_at = Some(step);
                break;
            }
        }

        info!(steps = steps.len(), stopped_at = ?stopped_at, "scenario replayed");
        ScenarioReport {
            contract: self.contract,
            steps,
            stopped_at,
            tables: contract.store().snapshot(),
            balances: contract
                .ledger()
                .balances()
                .into_iter()
                .map(|(account, balance)| BalanceEntry { account, balance })
                .collect(),
            transfers: contract.ledger().transfers(),
        }
    }
}

fn apply(
    contract: &Contract,
    caller: &AccountName,
    action: &Action,
) -> Result<CallResult, CustodianError> {
    let result = match action {
        Action::UpdateConfig {
            lockup_asset,
            max_votes,
            num_elected,
            latest_terms,
            ..
        } => CallResult::Config(contract.update_config(
            caller,
            lockup_asset.clone(),
            *max_votes,
            *num_elected,
            *latest_terms,
        )?),
        Action::RegisterCandidate {
            candidate,
            bio,
            requested_pay,
            ..
        } => CallResult::Candidate(contract.register_candidate(
            caller,
            candidate,
            bio,
            requested_pay,
        )?),
        Action::DeregisterCandidate { candidate, .. } => {
            CallResult::Refund(contract.deregister_candidate(caller, candidate)?)
        }
        Action::UpdateBio { candidate, bio, .. } => {
            CallResult::Candidate(contract.update_bio(caller, candidate, bio)?)
        }
        Action::UpdateRequestedPay {
            candidate,
            requested_pay,
            ..
        } => CallResult::Candidate(contract.update_requested_pay(caller, candidate, requested_pay)?),
        Action::CastVotes {
            voter, candidates, ..
        } => CallResult::Vote(contract.cast_votes(caller, voter, candidates)?),
        Action::DelegateVote { voter, proxy, .. } => {
            CallResult::Vote(contract.delegate_vote(caller, voter, proxy)?)
        }
        Action::RunPeriodRollover { .. } => {
            CallResult::Rollover(contract.run_period_rollover(caller)?)
        }
        Action::DisbursePendingPayments { .. } => {
            CallResult::Disbursed(contract.disburse_pending_payments(caller)?)
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = include_str!("../scenarios/basic.toml");

    fn account(name: &str) -> AccountName {
        AccountName::new(name)
    }

    #[test]
    fn test_basic_scenario_replays_cleanly() {
        let report = Scenario::from_toml_str(BASIC).unwrap().run(None);
        assert_eq!(report.failed_steps(), 0, "{:#?}", report.steps);
        assert_eq!(report.stopped_at, None);

        let custodians: Vec<&AccountName> = report
            .tables
            .candidates
            .iter()
            .filter(|c| c.is_custodian)
            .map(|c| &c.name)
            .collect();
        assert_eq!(custodians.len(), 2);
        assert!(report.tables.pending.is_empty());
        assert!(report
            .transfers
            .iter()
            .any(|t| t.from == report.contract && t.memo == "Custodian pay. Thank you."));
    }

    #[test]
    fn test_failed_call_stops_replay() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[actions]]
            call = "run_period_rollover"
            caller = "mallory"

            [[actions]]
            call = "run_period_rollover"
            "#,
        )
        .unwrap();
        let report = scenario.run(None);
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.stopped_at, Some(0));
        assert!(report.steps[0].error.as_deref().unwrap().contains("not authorized"));
    }

    #[test]
    fn test_continue_on_error_replays_everything() {
        let scenario = Scenario::from_toml_str(
            r#"
            continue_on_error = true

            [[actions]]
            call = "cast_votes"
            voter = "alice"
            candidates = ["bob"]

            [[actions]]
            call = "run_period_rollover"
            "#,
        )
        .unwrap();
        let report = scenario.run(None);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.failed_steps(), 1);
        assert_eq!(report.stopped_at, None);
        assert!(report.steps[1].result.is_some());
    }

    #[test]
    fn test_config_override_replaces_scenario_config() {
        let scenario = Scenario::from_toml_str(
            r#"
            [config]
            num_elected = 7
            "#,
        )
        .unwrap();
        let config = CustodianConfig {
            num_elected: 1,
            ..CustodianConfig::default()
        };
        let report = scenario.run(Some(config.clone()));
        assert_eq!(report.tables.config, Some(config));
    }

    #[test]
    fn test_caller_defaults_to_acting_account() {
        let contract = account("daccustodian");
        let vote = Action::CastVotes {
            caller: None,
            voter: account("alice"),
            candidates: vec![],
        };
        assert_eq!(vote.caller(&contract), account("alice"));

        let rollover = Action::RunPeriodRollover {
            caller: Some(account("bob")),
        };
        assert_eq!(rollover.caller(&contract), account("bob"));
        assert_eq!(
            Action::DisbursePendingPayments { caller: None }.caller(&contract),
            contract
        );
    }

    #[test]
    fn test_unknown_call_is_a_parse_error() {
        let err = Scenario::from_toml_str(
            r#"
            [[actions]]
            call = "seize_treasury"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("seize_treasury"));
    }

    #[test]
    fn test_malformed_account_name_is_a_parse_error() {
        let err = Scenario::from_toml_str(
            r#"
            [[actions]]
            call = "delegate_vote"
            voter = "alice"
            proxy = "Not A Valid Name!!"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Not A Valid Name!!"), "{err}");

        assert!(Scenario::from_toml_str(r#"contract = "UPPERCASE""#).is_err());
        assert!(Scenario::from_toml_str(
            r#"
            [[members]]
            account = "waytoolongname"
            terms = 1
            "#
        )
        .is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        std::fs::write(&path, BASIC).unwrap();
        let scenario = Scenario::from_toml_file(&path).unwrap();
        assert_eq!(scenario.contract, account("daccustodian"));
        assert!(!scenario.actions.is_empty());

        assert!(Scenario::from_toml_file(dir.path().join("missing.toml")).is_err());
    }
}
