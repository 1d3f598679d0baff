//! Abstract storage traits for the DAC custodian engine.
//!
//! The host ledger owns the tables; the engine depends only on these traits.
//! Every backend (the host's keyed tables, in-memory for testing) implements
//! them. Two collaborators that are not tables in the engine's own scope,
//! token balances/transfers and the member registry, are abstracted here too.

pub mod candidate;
pub mod config;
pub mod error;
pub mod ledger;
pub mod members;
pub mod pending;
pub mod vote;

pub use candidate::{Candidate, CandidateStore};
pub use config::ConfigStore;
pub use error::StoreError;
pub use ledger::TokenLedger;
pub use members::MemberStore;
pub use pending::{PendingPayStore, PendingPayment};
pub use vote::{VoteRecord, VoteStore};
