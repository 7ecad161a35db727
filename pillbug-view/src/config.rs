use pillbug_feed::FeedConfig;
use serde::Deserialize;
use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to open config: {0}")]
    Open(#[source] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[source] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base url of the server, e.g. `https://example.social`.
    pub instance: Url,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(ConfigError::Open)?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(ConfigError::Parse)
    }
}
