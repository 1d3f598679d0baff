//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the custodian engine (tables, token ledger, member
//! registry) is abstracted behind a trait in `dac-store`. This crate provides
//! in-memory implementations that:
//! - Keep deterministic (sorted) iteration order
//! - Can be seeded and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap the host's implementations for nullables in tests and in the
//! scenario runner.

pub mod ledger;
pub mod members;
pub mod store;

pub use ledger::{NullTokenLedger, TransferRecord};
pub use members::NullMembers;
pub use store::{NullStore, StoreSnapshot};
