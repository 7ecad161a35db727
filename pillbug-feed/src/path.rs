// https://www.rfc-editor.org/rfc/rfc6901

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::FeedError;

/// Pointer to a (possibly nested) field of a post, like `/application/name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    pub fn from_string(string: String) -> Result<Self, FeedError> {
        if string.is_empty() || string.starts_with('/') {
            Ok(Self(string))
        } else {
            Err(FeedError::BadFieldPath(string))
        }
    }

    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(path.is_empty() || path.starts_with('/'));
        Self(path.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn resolve<'v>(&self, fields: &'v Value) -> Option<&'v Value> {
        fields.pointer(&self.0)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::from_string(value)
    }
}

impl FromStr for FieldPath {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::from_string(s.to_string())
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> String {
        value.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
