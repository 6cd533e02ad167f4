use super::{RemoteDocument, RemoteFailure, RemoteMode, RemoteResult, RemoteStore};
use crate::error::{Result, WishError};
use crate::model::Wish;
use crate::token::SyncToken;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "X-Master-Key";

#[derive(Deserialize)]
struct LatestEnvelope {
    record: LatestRecord,
}

#[derive(Deserialize)]
struct LatestRecord {
    wishes: Vec<Wish>,
}

/// Client for a JSON-document API keyed by sync code.
///
/// - `GET {base}/{token}/latest` returns `{"record": {"wishes": [...]}}`
/// - `PUT {base}/{token}` stores `{"wishes": [...], "lastUpdated": "..."}`
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WishError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn document_url(&self, token: &SyncToken) -> String {
        format!("{}/{}", self.base_url, token)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

pub(crate) fn network_failure(err: reqwest::Error) -> RemoteFailure {
    RemoteFailure::Network(err.to_string())
}

#[async_trait]
impl RemoteStore for HttpRemote {
    fn mode(&self) -> RemoteMode {
        RemoteMode::Shared
    }

    async fn fetch(&self, token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        let token = token.ok_or(RemoteFailure::Unbound)?;
        let url = format!("{}/latest", self.document_url(token));
        debug!(%url, "fetching shared document");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::from_status(status.as_u16()));
        }

        let body = response.text().await.map_err(network_failure)?;
        let envelope: LatestEnvelope =
            serde_json::from_str(&body).map_err(|e| RemoteFailure::Malformed(e.to_string()))?;
        Ok(envelope.record.wishes)
    }

    async fn push(&self, token: &SyncToken, document: &RemoteDocument) -> RemoteResult<()> {
        let url = self.document_url(token);
        debug!(%url, wishes = document.wishes.len(), "pushing shared document");

        let response = self
            .authorize(self.client.put(&url))
            .json(document)
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::from_status(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_url_strips_trailing_slash() {
        let remote = HttpRemote::new("https://sync.example.com/b/", Duration::from_secs(5)).unwrap();
        let token = SyncToken::parse("ab12cd").unwrap();
        assert_eq!(
            remote.document_url(&token),
            "https://sync.example.com/b/AB12CD"
        );
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let remote = HttpRemote::new("http://localhost", Duration::from_secs(5))
            .unwrap()
            .with_api_key(Some("  ".to_string()));
        assert!(remote.api_key.is_none());
    }

    #[tokio::test]
    async fn fetch_without_token_is_unbound() {
        let remote = HttpRemote::new("http://localhost", Duration::from_secs(5)).unwrap();
        assert_eq!(remote.fetch(None).await, Err(RemoteFailure::Unbound));
    }
}
