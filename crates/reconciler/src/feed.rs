use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::WarehouseFeed;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed endpoint returned HTTP {0}")]
    Status(u16),
    #[error("feed payload is not a valid warehouse document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read feed file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<WarehouseFeed, FeedError>;
}

pub struct HttpFeedSource {
    http: Client,
    url: Url,
}

impl HttpFeedSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<WarehouseFeed, FeedError> {
        let res = self.http.get(self.url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Reads a feed document from disk on every fetch.
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<WarehouseFeed, FeedError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
