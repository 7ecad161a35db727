use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FieldPath;

/// A named condition and what to do with posts matching it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FeedRule {
    pub name: String,
    pub condition: Condition,
    pub action: Action,
}

impl FeedRule {
    pub fn new(name: impl Into<String>, condition: Condition, action: Action) -> Self {
        Self {
            name: name.into(),
            condition,
            action,
        }
    }
}

/// Predicate over the fields of a post.
///
/// A field that does not exist compares as `null`, so `equal` against
/// `null` and `absent` agree with each other.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Equal { path: FieldPath, value: Value },
    NotEqual { path: FieldPath, value: Value },
    Present { path: FieldPath },
    Absent { path: FieldPath },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn matches(&self, fields: &Value) -> bool {
        match self {
            Condition::Equal { path, value } => resolve(path, fields) == value,
            Condition::NotEqual { path, value } => resolve(path, fields) != value,
            Condition::Present { path } => !resolve(path, fields).is_null(),
            Condition::Absent { path } => resolve(path, fields).is_null(),
            Condition::All { conditions } => conditions.iter().all(|c| c.matches(fields)),
            Condition::Any { conditions } => conditions.iter().any(|c| c.matches(fields)),
            Condition::Not { condition } => !condition.matches(fields),
        }
    }
}

static NULL: Value = Value::Null;

fn resolve<'v>(path: &FieldPath, fields: &'v Value) -> &'v Value {
    path.resolve(fields).unwrap_or(&NULL)
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    HidePost,
    /// Ask for the post this one links to (the one it replies to) to be
    /// fetched and shown alongside it.
    AttachLinked,
    ApplyLabel { label: String },
}
