// https://docs.joinmastodon.org/methods/statuses/
// https://docs.joinmastodon.org/methods/timelines/

use async_trait::async_trait;
use log::debug;
use pillbug_msg::{Context, Status};
use pillbug_ref::StatusId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{Error, StatusSource, TimelineParams};

pub struct MastodonClient {
    base_url: Url,
    token: Option<String>,
    http: Client,
}

impl MastodonClient {
    /// `base_url` may carry a path prefix; endpoints are joined below it.
    pub fn new(mut base_url: Url, token: Option<String>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            token,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let mut request = self.http.get(url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(Error::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn timeline_query(params: &TimelineParams) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", params.limit.to_string())];
    if let Some(since_id) = &params.since_id {
        query.push(("since_id", since_id.to_string()));
    }
    if let Some(max_id) = &params.max_id {
        query.push(("max_id", max_id.to_string()));
    }
    query
}

#[async_trait]
impl StatusSource for MastodonClient {
    async fn get_status(&self, id: &StatusId) -> Result<Status, Error> {
        self.get(&id.to_api_path(), &[]).await
    }

    async fn get_status_context(&self, id: &StatusId) -> Result<Context, Error> {
        self.get(&id.to_context_path(), &[]).await
    }

    async fn get_home_timeline(&self, params: &TimelineParams) -> Result<Vec<Status>, Error> {
        self.get("api/v1/timelines/home", &timeline_query(params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint() {
        let client = MastodonClient::new("https://example.social".parse().unwrap(), None);
        let id: StatusId = "109".parse().unwrap();

        assert_eq!(
            client.endpoint(&id.to_context_path()).unwrap().as_str(),
            "https://example.social/api/v1/statuses/109/context"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let id: StatusId = "109".parse().unwrap();

        for base in ["https://example.org/mastodon", "https://example.org/mastodon/"] {
            let client = MastodonClient::new(base.parse().unwrap(), None);
            assert_eq!(
                client.endpoint(&id.to_api_path()).unwrap().as_str(),
                "https://example.org/mastodon/api/v1/statuses/109"
            );
        }
    }

    #[test]
    fn test_timeline_query() {
        let params = TimelineParams {
            limit: 40,
            since_id: Some("100".parse().unwrap()),
            max_id: None,
        };

        assert_eq!(
            timeline_query(&params),
            vec![
                ("limit", "40".to_string()),
                ("since_id", "100".to_string())
            ]
        );
    }
}
