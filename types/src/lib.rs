//! Fundamental types for the DAC custodian engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account names, asset symbols, fixed-point asset amounts and the custodian
//! configuration.

pub mod account;
pub mod asset;
pub mod config;
pub mod error;

pub use account::AccountName;
pub use asset::{Asset, Symbol};
pub use config::CustodianConfig;
pub use error::TypesError;
