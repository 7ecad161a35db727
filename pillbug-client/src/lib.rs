use async_trait::async_trait;
use pillbug_feed::FeedConfig;
use pillbug_msg::{Context, Status};
use pillbug_ref::StatusId;
use pillbug_threads::ThreadError;
use thiserror::Error as ThisError;

mod feed;
mod mastodon;
mod memory;
mod thread;

pub use feed::{load_feed, resolve_linked, Feed};
pub use mastodon::MastodonClient;
pub use memory::MemorySource;
pub use thread::load_thread;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Failed to send request, cause: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Server responded with {status}: {body}")]
    Server { status: u16, body: String },
    #[error("Failed to parse response, cause: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid url, cause: {0}")]
    Url(#[from] url::ParseError),
    #[error("Status {0} not found")]
    NotFound(StatusId),
    #[error("Status store lock was poisoned")]
    Poisoned,
    #[error("Failed to build thread, cause: {0}")]
    Thread(#[from] ThreadError),
}

/// Which slice of a timeline to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineParams {
    pub limit: u32,
    pub since_id: Option<StatusId>,
    pub max_id: Option<StatusId>,
}

impl From<&FeedConfig> for TimelineParams {
    fn from(config: &FeedConfig) -> Self {
        Self {
            limit: config.limit,
            since_id: config.since_id.clone(),
            max_id: config.max_id.clone(),
        }
    }
}

/// Where statuses come from: an authenticated server, or something that
/// pretends to be one.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn get_status(&self, id: &StatusId) -> Result<Status, Error>;

    /// Ancestors and descendants of the status, in whatever order the
    /// server hands them out.
    async fn get_status_context(&self, id: &StatusId) -> Result<Context, Error>;

    async fn get_home_timeline(&self, params: &TimelineParams) -> Result<Vec<Status>, Error>;
}

#[async_trait]
impl<A> StatusSource for A
where
    A: AsRef<dyn StatusSource> + Send + Sync,
{
    async fn get_status(&self, id: &StatusId) -> Result<Status, Error> {
        self.as_ref().get_status(id).await
    }

    async fn get_status_context(&self, id: &StatusId) -> Result<Context, Error> {
        self.as_ref().get_status_context(id).await
    }

    async fn get_home_timeline(&self, params: &TimelineParams) -> Result<Vec<Status>, Error> {
        self.as_ref().get_home_timeline(params).await
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use pillbug_msg::Status;
    use serde_json::json;

    pub fn status(id: &str, in_reply_to_id: Option<&str>) -> Status {
        serde_json::from_value(json!({
            "id": id,
            "account": { "id": "1", "username": "alice", "acct": "alice" },
            "content": format!("<p>post {}</p>", id),
            "in_reply_to_id": in_reply_to_id,
        }))
        .unwrap()
    }

    pub fn reblog(id: &str, original: Status) -> Status {
        serde_json::from_value(json!({
            "id": id,
            "account": { "id": "2", "username": "bob", "acct": "bob" },
            "reblog": original,
        }))
        .unwrap()
    }
}
