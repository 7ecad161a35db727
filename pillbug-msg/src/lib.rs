// https://docs.joinmastodon.org/entities/Status/

use pillbug_ref::{AccountId, StatusId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnError};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Status {
    pub id: StatusId,
    #[serde(default)]
    pub uri: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    pub account: Account,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub in_reply_to_id: Option<StatusId>,
    #[serde(default)]
    pub in_reply_to_account_id: Option<AccountId>,
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub application: Option<Application>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub sensitive: bool,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub spoiler_text: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub visibility: Visibility,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub replies_count: u64,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub reblogs_count: u64,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub favourites_count: u64,
    // everything else the server sent, kept so rules can match on it
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Status {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }

    pub fn is_reblog(&self) -> bool {
        self.reblog.is_some()
    }

    /// The status whose conversation should be shown for this one.
    ///
    /// A reblog carries no conversation of its own, so its context lives on
    /// the reblogged original.
    pub fn context_id(&self) -> &StatusId {
        match &self.reblog {
            Some(original) => &original.id,
            None => &self.id,
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Account {
    pub id: AccountId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub acct: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub bot: bool,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Application {
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
}

/// Ancestors and descendants of a status, as the context endpoint returns them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Context {
    #[serde(default)]
    pub ancestors: Vec<Status>,
    #[serde(default)]
    pub descendants: Vec<Status>,
}
