//! Error type for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account name: {0}")]
    InvalidAccountName(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    #[error("asset symbol mismatch: expected {expected}, found {found}")]
    SymbolMismatch { expected: String, found: String },

    #[error("asset amount overflow")]
    Overflow,

    #[error("config error: {0}")]
    Config(String),
}
