use super::cache::{CacheKeys, LocalCache};
use super::issue::SyncIssue;
use super::poller::Poller;
use crate::error::{Result, WishError};
use crate::model::{FilterCounts, Wish, WishFilter, WishId, WishPatch};
use crate::reconcile::{retain_unique_ids, LastWriteWins, ReconcilePolicy};
use crate::remote::{RemoteDocument, RemoteFailure, RemoteMode, RemoteStore};
use crate::token::SyncToken;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of a read/reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The remote snapshot replaced the local list.
    Replaced { count: usize },
    /// The remote was unavailable; the list fell back to the local cache.
    Offline,
    /// Nothing to pull from: no remote configured, or no sync code bound.
    LocalOnly,
}

pub struct StoreOptions {
    pub keys: CacheKeys,
    pub policy: Box<dyn ReconcilePolicy>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            keys: CacheKeys::default(),
            policy: Box::new(LastWriteWins),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    wishes: Vec<Wish>,
    sync_token: Option<SyncToken>,
    last_error: Option<SyncIssue>,
}

/// State shared between the store handle and its background tasks.
struct Shared<C: LocalCache, R: RemoteStore> {
    state: Mutex<StoreState>,
    cache: C,
    remote: R,
    policy: Box<dyn ReconcilePolicy>,
    keys: CacheKeys,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
    busy: AtomicUsize,
}

struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<C: LocalCache, R: RemoteStore> Shared<C, R> {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_wishes(&self, wishes: &[Wish]) {
        let result = serde_json::to_string(wishes)
            .map_err(WishError::Serialization)
            .and_then(|json| self.cache.set(&self.keys.wishes, &json));
        match result {
            Ok(()) => debug!(count = wishes.len(), "wrote list to local cache"),
            Err(e) => warn!(error = %e, "failed to write list to local cache"),
        }
    }

    fn persist_token(&self, token: Option<&SyncToken>) {
        let result = match token {
            Some(token) => self.cache.set(&self.keys.sync_token, token.as_str()),
            None => self.cache.remove(&self.keys.sync_token),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to write sync code to local cache");
        }
    }

    /// The last list written to the cache, or `None` if absent or unreadable.
    fn cached_wishes(&self) -> Option<Vec<Wish>> {
        let raw = match self.cache.get(&self.keys.wishes) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read local cache");
                return None;
            }
        };
        match serde_json::from_str::<Vec<Wish>>(&raw) {
            Ok(wishes) => Some(retain_unique_ids(wishes)),
            Err(e) => {
                // The next write replaces the list key, so keep the raw text.
                let aside = self.keys.unreadable();
                warn!(error = %e, key = %aside, "cached list is unreadable; setting it aside");
                if let Err(e) = self.cache.set(&aside, &raw) {
                    warn!(error = %e, "failed to set aside unreadable list");
                }
                None
            }
        }
    }

    fn cached_token(&self) -> Option<SyncToken> {
        let raw = match self.cache.get(&self.keys.sync_token) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read cached sync code");
                return None;
            }
        };
        match SyncToken::parse(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "cached sync code is invalid; ignoring it");
                None
            }
        }
    }

    async fn push_snapshot(
        &self,
        token: SyncToken,
        wishes: Vec<Wish>,
    ) -> std::result::Result<(), RemoteFailure> {
        let _busy = BusyGuard::enter(&self.busy);
        let document = RemoteDocument::new(wishes);
        let result = self.remote.push(&token, &document).await;

        let mut state = self.state();
        match &result {
            Ok(()) => {
                debug!(%token, count = document.wishes.len(), "pushed list to remote");
                state.last_error = None;
            }
            Err(failure) => {
                warn!(%token, error = %failure, "remote push failed; local copy kept");
                state.last_error = Some(SyncIssue::RemoteWriteFailed {
                    token,
                    failure: failure.clone(),
                });
            }
        }
        result
    }

    async fn pull(&self) -> PullOutcome {
        let token = self.state().sync_token.clone();
        match self.remote.mode() {
            RemoteMode::Disabled => return PullOutcome::LocalOnly,
            RemoteMode::Shared if token.is_none() => return PullOutcome::LocalOnly,
            _ => {}
        }

        let _busy = BusyGuard::enter(&self.busy);
        match self.remote.fetch(token.as_ref()).await {
            Ok(remote) => {
                let count = {
                    let mut state = self.state();
                    state.wishes = retain_unique_ids(self.policy.reconcile(&state.wishes, remote));
                    state.last_error = None;
                    self.persist_wishes(&state.wishes);
                    state.wishes.len()
                };
                info!(count, "replaced local list with remote snapshot");
                PullOutcome::Replaced { count }
            }
            Err(failure) => {
                warn!(error = %failure, "remote fetch failed; using local cache");
                let cached = self.cached_wishes();
                let mut state = self.state();
                if let Some(cached) = cached {
                    state.wishes = cached;
                }
                state.last_error = Some(SyncIssue::RemoteUnavailable { token, failure });
                PullOutcome::Offline
            }
        }
    }
}

/// The in-memory wish list plus its persistence and sync policy.
///
/// Every mutation updates memory first, then rewrites the whole list to the
/// local cache, then (when a sync code is bound) spawns a whole-document push
/// to the remote store. Pushes are fire-and-forget: a failure only sets
/// [`WishStore::last_error`]. Pushes are not ordered relative to each other.
///
/// Mutations that need a push must run inside a tokio runtime; outside one the
/// push is skipped and only the local cache is written.
pub struct WishStore<C: LocalCache, R: RemoteStore> {
    shared: Arc<Shared<C, R>>,
    poller: Option<Poller>,
}

impl<C, R> WishStore<C, R>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    pub fn new(cache: C, remote: R) -> Self {
        Self::with_options(cache, remote, StoreOptions::default())
    }

    pub fn with_options(cache: C, remote: R, options: StoreOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState::default()),
                cache,
                remote,
                policy: options.policy,
                keys: options.keys,
                in_flight: Mutex::new(Vec::new()),
                busy: AtomicUsize::new(0),
            }),
            poller: None,
        }
    }

    // --- Read Side ---

    pub fn snapshot(&self) -> Vec<Wish> {
        self.shared.state().wishes.clone()
    }

    pub fn get(&self, id: &WishId) -> Option<Wish> {
        self.shared
            .state()
            .wishes
            .iter()
            .find(|w| &w.id == id)
            .cloned()
    }

    /// Recomputed on every call; never cached.
    pub fn filtered_view(&self, filter: WishFilter) -> Vec<Wish> {
        let state = self.shared.state();
        filter.apply(&state.wishes).cloned().collect()
    }

    pub fn category_summary(&self) -> BTreeMap<String, usize> {
        let state = self.shared.state();
        let mut summary = BTreeMap::new();
        for wish in &state.wishes {
            *summary.entry(wish.category.clone()).or_insert(0) += 1;
        }
        summary
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts::of(&self.shared.state().wishes)
    }

    pub fn sync_token(&self) -> Option<SyncToken> {
        self.shared.state().sync_token.clone()
    }

    pub fn last_error(&self) -> Option<SyncIssue> {
        self.shared.state().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.shared.state().last_error = None;
    }

    /// True while a remote read or write is in flight.
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst) > 0
    }

    pub fn remote_mode(&self) -> RemoteMode {
        self.shared.remote.mode()
    }

    // --- Mutations ---

    /// Prepends a new wish (newest first).
    pub fn add(&self, text: &str, category: Option<&str>) -> Result<Wish> {
        let wish = Wish::new(text, category)?;
        self.mutate(|wishes| {
            wishes.insert(0, wish.clone());
            Ok(wish)
        })
    }

    pub fn toggle_completed(&self, id: &WishId) -> Result<Wish> {
        self.mutate(|wishes| {
            let wish = find_mut(wishes, id)?;
            wish.apply(WishPatch::completed(!wish.completed));
            Ok(wish.clone())
        })
    }

    pub fn toggle_priority(&self, id: &WishId) -> Result<Wish> {
        self.mutate(|wishes| {
            let wish = find_mut(wishes, id)?;
            wish.apply(WishPatch::priority(!wish.priority));
            Ok(wish.clone())
        })
    }

    pub fn set_flags(&self, id: &WishId, patch: WishPatch) -> Result<Wish> {
        self.mutate(|wishes| {
            let wish = find_mut(wishes, id)?;
            wish.apply(patch);
            Ok(wish.clone())
        })
    }

    pub fn remove(&self, id: &WishId) -> Result<Wish> {
        self.mutate(|wishes| {
            let pos = wishes
                .iter()
                .position(|w| &w.id == id)
                .ok_or_else(|| WishError::WishNotFound(id.clone()))?;
            Ok(wishes.remove(pos))
        })
    }

    /// Applies `f` to the list, then runs the write path. A failing `f` leaves
    /// the list untouched and writes nothing.
    ///
    /// The cache is written under the state lock so cache writes land in the
    /// same order as the changes they record.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Wish>) -> Result<T>) -> Result<T> {
        let (out, snapshot, token) = {
            let mut state = self.shared.state();
            let out = f(&mut state.wishes)?;
            self.shared.persist_wishes(&state.wishes);
            (out, state.wishes.clone(), state.sync_token.clone())
        };

        if let Some(token) = token {
            self.schedule_push(token, snapshot);
        }
        Ok(out)
    }

    fn schedule_push(&self, token: SyncToken, snapshot: Vec<Wish>) {
        if self.shared.remote.mode() != RemoteMode::Shared {
            return;
        }
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(%token, "no async runtime; remote push skipped");
                return;
            }
        };

        let shared = Arc::clone(&self.shared);
        let task = handle.spawn(async move {
            let _ = shared.push_snapshot(token, snapshot).await;
        });

        let mut in_flight = self.shared.in_flight();
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(task);
    }

    // --- Sync ---

    /// Startup: restore the cached list and sync code, then pull if bound.
    pub async fn load(&self) -> PullOutcome {
        self.load_local();
        self.shared.pull().await
    }

    /// Restore the cached list and sync code without touching the remote.
    pub fn load_local(&self) {
        let cached = self.shared.cached_wishes().unwrap_or_default();
        let token = self.shared.cached_token();
        let mut state = self.shared.state();
        state.wishes = cached;
        state.sync_token = token;
    }

    /// Fetch the remote list and replace the local one wholesale.
    pub async fn pull(&self) -> PullOutcome {
        self.shared.pull().await
    }

    /// Push the current list now and wait for the result.
    pub async fn push_now(&self) -> Result<()> {
        self.require_shared()?;
        let (token, snapshot) = {
            let state = self.shared.state();
            (state.sync_token.clone(), state.wishes.clone())
        };
        let token = token.ok_or(WishError::NotBound)?;
        self.shared
            .push_snapshot(token, snapshot)
            .await
            .map_err(WishError::RemoteWriteFailed)
    }

    /// Generate a new sync code, bind to it and push the current list there.
    ///
    /// A failed push is recorded in `last_error`; the code is still returned so
    /// the next successful write creates the document.
    pub async fn create_sync_token(&self) -> Result<SyncToken> {
        self.require_shared()?;
        let token = SyncToken::generate();
        self.bind(&token);
        info!(%token, "created sync code");

        let snapshot = self.snapshot();
        let _ = self.shared.push_snapshot(token.clone(), snapshot).await;
        Ok(token)
    }

    /// Bind to an existing sync code and pull, replacing local state.
    pub async fn join_with_sync_token(&self, code: &str) -> Result<PullOutcome> {
        let token = SyncToken::parse(code)?;
        self.require_shared()?;
        self.bind(&token);
        info!(%token, "joined sync code");
        Ok(self.shared.pull().await)
    }

    /// Forget the sync code; local data is kept.
    pub fn unbind(&self) {
        let previous = {
            let mut state = self.shared.state();
            state.last_error = None;
            self.shared.persist_token(None);
            state.sync_token.take()
        };
        if let Some(token) = previous {
            info!(%token, "left sync code");
        }
    }

    fn bind(&self, token: &SyncToken) {
        let mut state = self.shared.state();
        state.sync_token = Some(token.clone());
        self.shared.persist_token(Some(token));
    }

    fn require_shared(&self) -> Result<()> {
        match self.shared.remote.mode() {
            RemoteMode::Shared => Ok(()),
            RemoteMode::Disabled => Err(WishError::RemoteUnavailable(RemoteFailure::Disabled)),
            RemoteMode::ReadOnlyMirror => {
                Err(WishError::RemoteWriteFailed(RemoteFailure::ReadOnly))
            }
        }
    }

    /// Wait for every in-flight push, including ones scheduled while waiting.
    pub async fn flush(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.shared.in_flight());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(error = %e, "remote push task did not complete");
                }
            }
        }
    }

    // --- Polling ---

    /// Pull every `period` until [`WishStore::stop_polling`] or drop.
    /// Restarting replaces the previous poller.
    pub fn start_polling(&mut self, period: Duration) -> Result<()> {
        if self.shared.remote.mode() == RemoteMode::Disabled {
            debug!("no remote configured; polling not started");
            return Ok(());
        }
        Handle::try_current().map_err(|_| WishError::NoRuntime)?;

        let shared = Arc::clone(&self.shared);
        self.poller = Some(Poller::spawn(period, move || {
            let shared = Arc::clone(&shared);
            async move {
                shared.pull().await;
            }
        }));
        debug!(?period, "polling started");
        Ok(())
    }

    pub fn stop_polling(&mut self) {
        if self.poller.take().is_some() {
            debug!("polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }
}

fn find_mut<'a>(wishes: &'a mut [Wish], id: &WishId) -> Result<&'a mut Wish> {
    wishes
        .iter_mut()
        .find(|w| &w.id == id)
        .ok_or_else(|| WishError::WishNotFound(id.clone()))
}
