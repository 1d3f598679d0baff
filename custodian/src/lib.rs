//! Custodian governance for a decentralized autonomous community.
//!
//! Candidates register by locking stake, members vote for up to `max_votes`
//! candidates directly or hand their weight to a proxy (one level only), and
//! each period rollover:
//!
//! 1. accrues pay to the sitting custodians at the median of their requested rates,
//! 2. resets all vote weights,
//! 3. tallies token-weighted votes, folding delegated weight into proxies first,
//! 4. elects the top `num_elected` candidates and applies pending pay-rate changes.
//!
//! Key principle: vote weight is token balance, recomputed from scratch every period.

pub mod contract;
pub mod error;
pub mod payroll;
pub mod registry;
pub mod rollover;
pub mod votes;

pub use contract::DacCustodian;
pub use error::CustodianError;
pub use payroll::{median_pay, PayrollLedger};
pub use registry::CandidateRegistry;
pub use rollover::{PeriodRolloverEngine, RolloverReport};
pub use votes::VoteBook;
