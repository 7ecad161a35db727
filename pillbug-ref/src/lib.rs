use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use thiserror::Error as ThisError;

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
}

/// Server-assigned identifier of a status.
///
/// Mastodon uses numeric snowflakes, other servers use alphanumeric flake
/// ids, so the only thing assumed here is that the id is safe to put in a
/// url path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusId(String);

impl StatusId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Status",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(string: &str) -> bool {
        id_regex().is_match(string)
    }

    // relative to the instance base url
    pub fn to_api_path(&self) -> String {
        format!("api/v1/statuses/{}", self.0)
    }

    pub fn to_context_path(&self) -> String {
        format!("api/v1/statuses/{}/context", self.0)
    }
}

impl TryFrom<String> for StatusId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StatusId::from_string(value)
    }
}

impl FromStr for StatusId {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusId::from_string(s.to_string())
    }
}

impl From<StatusId> for String {
    fn from(value: StatusId) -> String {
        value.0
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Account",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(string: &str) -> bool {
        id_regex().is_match(string)
    }
}

impl TryFrom<String> for AccountId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccountId::from_string(value)
    }
}

impl FromStr for AccountId {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId::from_string(s.to_string())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> String {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn id_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new("^[0-9A-Za-z_-]+$").expect("id regex is valid");
    }
    &RE
}
