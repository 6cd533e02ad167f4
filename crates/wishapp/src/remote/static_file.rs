use super::http::network_failure;
use super::{RemoteDocument, RemoteFailure, RemoteMode, RemoteResult, RemoteStore};
use crate::error::{Result, WishError};
use crate::model::Wish;
use crate::token::SyncToken;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct StaticDocument {
    wishes: Vec<Wish>,
}

/// A published `{"wishes": [...]}` file, fetched with a cache-busting `v`
/// query parameter. Read-only: the list is edited elsewhere and republished.
pub struct StaticFileRemote {
    client: reqwest::Client,
    url: String,
}

impl StaticFileRemote {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WishError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl RemoteStore for StaticFileRemote {
    fn mode(&self) -> RemoteMode {
        RemoteMode::ReadOnlyMirror
    }

    async fn fetch(&self, _token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        let version = Utc::now().timestamp_millis();
        debug!(url = %self.url, version, "fetching published list");

        let response = self
            .client
            .get(&self.url)
            .query(&[("v", version)])
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::from_status(status.as_u16()));
        }

        let body = response.text().await.map_err(network_failure)?;
        let document: StaticDocument =
            serde_json::from_str(&body).map_err(|e| RemoteFailure::Malformed(e.to_string()))?;
        Ok(document.wishes)
    }

    async fn push(&self, _token: &SyncToken, _document: &RemoteDocument) -> RemoteResult<()> {
        Err(RemoteFailure::ReadOnly)
    }
}
