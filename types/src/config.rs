//! Custodian configuration with TOML file support.

use crate::{Asset, Symbol, TypesError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of the custodian engine.
///
/// Loaded once per operation from the config store and passed explicitly to
/// every engine call. Can also be read from a TOML file via
/// [`CustodianConfig::from_toml_file`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodianConfig {
    /// Stake a candidate must lock to register. Its symbol is also the symbol
    /// used for vote-weight balances and custodian pay.
    #[serde(default = "default_lockup_asset")]
    pub lockup_asset: Asset,

    /// Maximum number of candidates a member may vote for.
    #[serde(default = "default_max_votes")]
    pub max_votes: u8,

    /// Number of custodian seats filled at each period rollover.
    #[serde(default = "default_num_elected")]
    pub num_elected: u32,

    /// Version of the member terms that voters and candidates must have agreed to.
    #[serde(default)]
    pub latest_terms: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_lockup_asset() -> Asset {
    Asset::new(100_000, default_symbol())
}

fn default_symbol() -> Symbol {
    Symbol::new(4, "EOSDAC").expect("EOSDAC is a valid symbol")
}

fn default_max_votes() -> u8 {
    5
}

fn default_num_elected() -> u32 {
    3
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CustodianConfig {
    /// Symbol of vote-weight balances and custodian pay.
    pub fn pay_symbol(&self) -> &Symbol {
        self.lockup_asset.symbol()
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TypesError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TypesError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TypesError> {
        toml::from_str(s).map_err(|e| TypesError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TypesError> {
        toml::to_string_pretty(self).map_err(|e| TypesError::Config(e.to_string()))
    }
}

impl Default for CustodianConfig {
    fn default() -> Self {
        Self {
            lockup_asset: default_lockup_asset(),
            max_votes: default_max_votes(),
            num_elected: default_num_elected(),
            latest_terms: 0,
        }
    }
}
