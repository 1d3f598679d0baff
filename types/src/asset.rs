//! Fixed-point asset amounts.
//!
//! An [`Asset`] is an unsigned integer amount of raw units paired with a
//! [`Symbol`] that names the token and fixes its decimal precision. There is
//! no floating-point arithmetic anywhere: `10.0000 EOSDAC` is stored as
//! `100000` raw units with precision 4.
//!
//! Amounts of different symbols are never combined; every arithmetic helper
//! checks the symbol first.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token symbol: decimal precision plus an upper-case code (`4,EOSDAC`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    precision: u8,
    code: String,
}

impl Symbol {
    /// Maximum number of decimal places.
    pub const MAX_PRECISION: u8 = 18;
    /// Maximum length of a symbol code.
    pub const MAX_CODE_LEN: usize = 7;

    pub fn new(precision: u8, code: impl Into<String>) -> Result<Self, TypesError> {
        let code = code.into();
        let code_ok = !code.is_empty()
            && code.len() <= Self::MAX_CODE_LEN
            && code.chars().all(|c| c.is_ascii_uppercase());
        if !code_ok || precision > Self::MAX_PRECISION {
            return Err(TypesError::InvalidSymbol(format!("{precision},{code}")));
        }
        Ok(Self { precision, code })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Raw units per whole token (`10^precision`).
    pub fn unit(&self) -> u128 {
        10u128.pow(u32::from(self.precision))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| TypesError::InvalidSymbol(s.to_string()))?;
        let precision = precision
            .trim()
            .parse::<u8>()
            .map_err(|_| TypesError::InvalidSymbol(s.to_string()))?;
        Self::new(precision, code.trim())
    }
}

impl TryFrom<String> for Symbol {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

/// An amount of raw units of a given symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    amount: u128,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: u128, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    /// Raw amount in the smallest unit.
    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Fail with [`TypesError::SymbolMismatch`] unless this asset uses `expected`.
    pub fn ensure_symbol(&self, expected: &Symbol) -> Result<(), TypesError> {
        if &self.symbol != expected {
            return Err(TypesError::SymbolMismatch {
                expected: expected.to_string(),
                found: self.symbol.to_string(),
            });
        }
        Ok(())
    }

    /// Add two assets of the same symbol.
    pub fn checked_add(&self, other: &Asset) -> Result<Asset, TypesError> {
        self.ensure_symbol(&other.symbol)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    /// Subtract an asset of the same symbol; `None` on underflow.
    pub fn checked_sub(&self, other: &Asset) -> Result<Option<Asset>, TypesError> {
        self.ensure_symbol(&other.symbol)?;
        Ok(self
            .amount
            .checked_sub(other.amount)
            .map(|amount| Asset::new(amount, self.symbol.clone())))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision);
        if precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol.code);
        }
        let unit = self.symbol.unit();
        write!(
            f,
            "{}.{:0>width$} {}",
            self.amount / unit,
            self.amount % unit,
            self.symbol.code,
            width = precision
        )
    }
}

impl FromStr for Asset {
    type Err = TypesError;

    /// Parse `"<amount> <CODE>"`, e.g. `"10.0000 EOSDAC"`. The number of
    /// decimal places determines the symbol precision.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidAsset(s.to_string());
        let mut parts = s.split_whitespace();
        let (number, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(number), Some(code), None) => (number, code),
            _ => return Err(invalid()),
        };

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) || (number.contains('.') && frac.is_empty())
        {
            return Err(invalid());
        }
        let precision = u8::try_from(frac.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(precision, code)?;

        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let frac: u128 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        let amount = whole
            .checked_mul(symbol.unit())
            .and_then(|w| w.checked_add(frac))
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, symbol))
    }
}

impl TryFrom<String> for Asset {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}
