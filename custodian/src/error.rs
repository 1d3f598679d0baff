use dac_store::StoreError;
use dac_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustodianError {
    #[error("caller {caller} is not authorized, {expected} required")]
    NotAuthorized { expected: String, caller: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("candidate {0} is already registered")]
    AlreadyRegistered(String),

    #[error("too many votes: {cast} > {max}")]
    TooManyVotes { cast: usize, max: u8 },

    #[error("candidate {0} appears more than once in the vote")]
    DuplicateVote(String),

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("proxy chain rejected: {0}")]
    ChainedProxy(String),

    #[error("asset symbol mismatch: expected {expected}, found {found}")]
    SymbolMismatch { expected: String, found: String },

    #[error("account {0} is not a registered member")]
    NotMember(String),

    #[error("account {account} agreed to terms {agreed}, current terms are {latest}")]
    OutdatedTerms {
        account: String,
        agreed: u64,
        latest: u64,
    },

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("{0}")]
    Other(String),
}

impl From<StoreError> for CustodianError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Transfer(reason) => Self::Transfer(reason),
            other => Self::Store(other),
        }
    }
}

impl From<TypesError> for CustodianError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::SymbolMismatch { expected, found } => {
                Self::SymbolMismatch { expected, found }
            }
            TypesError::Overflow => Self::Overflow,
            other => Self::Other(other.to_string()),
        }
    }
}
