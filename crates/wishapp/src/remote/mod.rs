//! # Remote Shared Store
//!
//! The remote side of sync is an opaque document store reached over HTTP. One
//! document exists per [`SyncToken`]; it holds the whole list and is replaced
//! wholesale on every write. There is no per-item patching, no version check and
//! no merge: whoever writes last wins at the document level.
//!
//! ## Modes
//!
//! | Mode | Implementation | Read | Write |
//! |------|----------------|------|-------|
//! | [`RemoteMode::Disabled`] | [`NoRemote`] | never | never |
//! | [`RemoteMode::Shared`] | [`http::HttpRemote`] | `GET {base}/{token}/latest` | `PUT {base}/{token}` |
//! | [`RemoteMode::ReadOnlyMirror`] | [`static_file::StaticFileRemote`] | `GET {url}?v=...` | never |
//!
//! [`memory::MemRemote`] is the in-memory fake used by tests.
//!
//! ## Failure Model
//!
//! Every problem on the read path (network error, non-2xx status, missing
//! document, malformed body) is reported as a [`RemoteFailure`]; the store treats
//! all of them the same way and falls back to the local cache.

use crate::model::Wish;
use crate::token::SyncToken;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub mod http;
pub mod memory;
pub mod static_file;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("document not found")]
    NotFound,

    #[error("permission denied (HTTP {0})")]
    PermissionDenied(u16),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("no sync code set")]
    Unbound,

    #[error("remote store is read-only")]
    ReadOnly,

    #[error("no remote store configured")]
    Disabled,
}

impl RemoteFailure {
    pub fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => RemoteFailure::PermissionDenied(code),
            404 => RemoteFailure::NotFound,
            _ => RemoteFailure::Status(code),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMode {
    /// Local-only: no remote reads or writes.
    Disabled,
    /// A token-keyed document that every client reads and overwrites.
    Shared,
    /// A published file that is polled but never written; tokens are ignored.
    ReadOnlyMirror,
}

/// The body written on every push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub wishes: Vec<Wish>,
    pub last_updated: DateTime<Utc>,
}

impl RemoteDocument {
    pub fn new(wishes: Vec<Wish>) -> Self {
        Self {
            wishes,
            last_updated: Utc::now(),
        }
    }
}

/// Abstract contract for the remote shared store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn mode(&self) -> RemoteMode;

    /// Fetch the current list. `token` is required in [`RemoteMode::Shared`].
    async fn fetch(&self, token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>>;

    /// Replace the document at `token` wholesale, creating it if needed.
    async fn push(&self, token: &SyncToken, document: &RemoteDocument) -> RemoteResult<()>;
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for Box<R> {
    fn mode(&self) -> RemoteMode {
        (**self).mode()
    }

    async fn fetch(&self, token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        (**self).fetch(token).await
    }

    async fn push(&self, token: &SyncToken, document: &RemoteDocument) -> RemoteResult<()> {
        (**self).push(token, document).await
    }
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn mode(&self) -> RemoteMode {
        (**self).mode()
    }

    async fn fetch(&self, token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        (**self).fetch(token).await
    }

    async fn push(&self, token: &SyncToken, document: &RemoteDocument) -> RemoteResult<()> {
        (**self).push(token, document).await
    }
}

/// The local-only variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRemote;

#[async_trait]
impl RemoteStore for NoRemote {
    fn mode(&self) -> RemoteMode {
        RemoteMode::Disabled
    }

    async fn fetch(&self, _token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        Err(RemoteFailure::Disabled)
    }

    async fn push(&self, _token: &SyncToken, _document: &RemoteDocument) -> RemoteResult<()> {
        Err(RemoteFailure::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_classified() {
        assert_eq!(
            RemoteFailure::from_status(403),
            RemoteFailure::PermissionDenied(403)
        );
        assert_eq!(
            RemoteFailure::from_status(401),
            RemoteFailure::PermissionDenied(401)
        );
        assert_eq!(RemoteFailure::from_status(404), RemoteFailure::NotFound);
        assert_eq!(RemoteFailure::from_status(500), RemoteFailure::Status(500));
    }

    #[test]
    fn document_serializes_last_updated_in_camel_case() {
        let doc = RemoteDocument::new(Vec::new());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["wishes"].as_array().unwrap().is_empty());
        assert!(value["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn no_remote_never_reads_or_writes() {
        let remote = NoRemote;
        assert_eq!(remote.mode(), RemoteMode::Disabled);
        assert_eq!(remote.fetch(None).await, Err(RemoteFailure::Disabled));
        let token = SyncToken::parse("ABC123").unwrap();
        assert_eq!(
            remote.push(&token, &RemoteDocument::new(Vec::new())).await,
            Err(RemoteFailure::Disabled)
        );
    }
}
