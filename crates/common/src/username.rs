//! Validated account identifier
//!
//! Usernames are the unique, immutable key for accounts and double as the
//! salt for the first KDF stage, so both client and server agree on one
//! format: 4-32 characters, alphanumeric plus underscore.

use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{4,32}$").expect("valid username regex"));

/// Errors that can occur when parsing a username
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error(
        "username must be 4-32 characters long and can only contain letters, numbers, and underscores"
    )]
    InvalidFormat,
}

/// A validated account identifier
///
/// Construction goes through [`Username::parse`], so holding a `Username`
/// is proof the identifier already passed format validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        if USERNAME_REGEX.is_match(raw) {
            Ok(Username(raw.to_string()))
        } else {
            Err(UsernameError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Username {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;
    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Username::parse(&raw)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_usernames() {
        let max_len = "x".repeat(32);
        for raw in ["alice", "bob_1999", "ABCD", "a_b_", max_len.as_str()] {
            assert!(Username::parse(raw).is_ok(), "expected valid: {raw}");
        }
    }

    #[test]
    fn test_rejects_invalid_usernames() {
        let too_long = "x".repeat(33);
        for raw in ["", "abc", too_long.as_str(), "has space", "dash-ed", "Ünïcode"] {
            assert_eq!(
                Username::parse(raw),
                Err(UsernameError::InvalidFormat),
                "expected invalid: {raw}"
            );
        }
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let username: Username = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(username.as_str(), "alice");

        let err = serde_json::from_str::<Username>("\"ab\"");
        assert!(err.is_err());
    }
}
