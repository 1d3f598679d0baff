//! Account names.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ledger account name, e.g. `alice` or `dacauthority`.
///
/// Names follow the host ledger's rules: 1 to 12 characters drawn from
/// `a-z`, `1-5` and `.`, not ending with a dot. Deserialization validates.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Maximum length of an account name.
    pub const MAX_LEN: usize = 12;

    /// Create an account name without validating it.
    ///
    /// Use [`AccountName::from_str`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name is well-formed.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= Self::MAX_LEN
            && !self.0.ends_with('.')
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_lowercase() || ('1'..='5').contains(&c) || c == '.')
    }
}

impl FromStr for AccountName {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = Self::new(s);
        if name.is_valid() {
            Ok(name)
        } else {
            Err(TypesError::InvalidAccountName(s.to_string()))
        }
    }
}

impl TryFrom<String> for AccountName {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ledger_names() {
        assert!("alice".parse::<AccountName>().is_ok());
        assert!("dac.auth1234".parse::<AccountName>().is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        assert!("".parse::<AccountName>().is_err());
        assert!("Alice".parse::<AccountName>().is_err());
        assert!("bob6".parse::<AccountName>().is_err());
        assert!("trailing.".parse::<AccountName>().is_err());
        assert!("waytoolongname".parse::<AccountName>().is_err());
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Row {
        name: AccountName,
    }

    #[test]
    fn deserialization_validates() {
        let row: Row = toml::from_str(r#"name = "dac.auth1234""#).unwrap();
        assert_eq!(row.name.as_str(), "dac.auth1234");
        assert!(toml::from_str::<Row>(r#"name = "Not A Valid Name!!""#).is_err());
        assert!(toml::from_str::<Row>(r#"name = """#).is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let out = toml::to_string(&Row {
            name: AccountName::new("alice"),
        })
        .unwrap();
        assert_eq!(out.trim(), r#"name = "alice""#);
    }

    #[test]
    fn ordering_is_lexical() {
        let mut names = vec![AccountName::new("carol"), AccountName::new("alice")];
        names.sort();
        assert_eq!(names[0].as_str(), "alice");
    }
}
