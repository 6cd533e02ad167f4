use super::{RemoteDocument, RemoteFailure, RemoteMode, RemoteResult, RemoteStore};
use crate::model::Wish;
use crate::token::SyncToken;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// In-memory shared document store for testing.
///
/// Share one instance between several stores (wrap it in an `Arc`) to model
/// several devices bound to the same sync code.
#[derive(Default)]
pub struct MemRemote {
    documents: Mutex<HashMap<SyncToken, RemoteDocument>>,
    write_delays: Mutex<VecDeque<Duration>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fetches: AtomicUsize,
    pushes: AtomicUsize,
}

impl MemRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document as if another client had pushed it.
    pub fn insert(&self, token: &SyncToken, wishes: Vec<Wish>) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), RemoteDocument::new(wishes));
    }

    pub fn document(&self, token: &SyncToken) -> Option<RemoteDocument> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Queue a delay for the next push; each push consumes one entry.
    pub fn delay_next_write(&self, delay: Duration) {
        self.write_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(delay);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MemRemote {
    fn mode(&self) -> RemoteMode {
        RemoteMode::Shared
    }

    async fn fetch(&self, token: Option<&SyncToken>) -> RemoteResult<Vec<Wish>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let token = token.ok_or(RemoteFailure::Unbound)?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RemoteFailure::Network("Simulated read error".to_string()));
        }
        self.document(token)
            .map(|doc| doc.wishes)
            .ok_or(RemoteFailure::NotFound)
    }

    async fn push(&self, token: &SyncToken, document: &RemoteDocument) -> RemoteResult<()> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .write_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RemoteFailure::Network("Simulated write error".to_string()));
        }
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), document.clone());
        Ok(())
    }
}
