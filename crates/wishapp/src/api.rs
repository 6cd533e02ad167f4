//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for display layers (the CLI today).
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Exposes the display contract**: `wishes(filter)`, `loading()`,
//!   `last_error()`, `sync_token()`
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no logic of its own; that belongs in `commands/*.rs` and `store/`.
//!
//! ## Generic Over Cache and Remote
//!
//! `WishApi<C, R>` is generic over the local cache and the remote store:
//! - Production: `WishApi<FsCache, Box<dyn RemoteStore>>`
//! - Testing: `WishApi<MemCache, NoRemote>` or `WishApi<MemCache, Arc<MemRemote>>`

use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::model::{WishFilter, WishPatch};
use crate::remote::RemoteStore;
use crate::store::{LocalCache, PullOutcome, SyncIssue, WishStore};
use crate::token::SyncToken;
use std::time::Duration;

pub struct WishApi<C: LocalCache, R: RemoteStore> {
    store: WishStore<C, R>,
}

impl<C, R> WishApi<C, R>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    pub fn new(store: WishStore<C, R>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &WishStore<C, R> {
        &self.store
    }

    /// Restore cached state and pull once if bound.
    pub async fn load(&self) -> PullOutcome {
        self.store.load().await
    }

    // --- Display contract ---

    pub fn wishes(&self, filter: WishFilter) -> Result<CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn loading(&self) -> bool {
        self.store.is_busy()
    }

    pub fn last_error(&self) -> Option<SyncIssue> {
        self.store.last_error()
    }

    pub fn sync_token(&self) -> Option<SyncToken> {
        self.store.sync_token()
    }

    pub fn clear_error(&self) {
        self.store.clear_error()
    }

    // --- Operations ---

    pub fn add_wish(&self, text: &str, category: Option<&str>) -> Result<CmdResult> {
        commands::create::run(&self.store, text, category)
    }

    pub fn toggle_completed(&self, selector: &str) -> Result<CmdResult> {
        commands::flags::toggle_completed(&self.store, selector)
    }

    pub fn toggle_priority(&self, selector: &str) -> Result<CmdResult> {
        commands::flags::toggle_priority(&self.store, selector)
    }

    pub fn set_flags(&self, selector: &str, patch: WishPatch) -> Result<CmdResult> {
        commands::flags::set(&self.store, selector, patch)
    }

    pub fn remove_wish(&self, selector: &str) -> Result<CmdResult> {
        commands::delete::run(&self.store, selector)
    }

    pub fn categories(&self) -> Result<CmdResult> {
        commands::categories::run(&self.store)
    }

    // --- Sync ---

    pub async fn create_sync_code(&self) -> Result<CmdResult> {
        commands::sync::create(&self.store).await
    }

    pub async fn join_sync_code(&self, code: &str) -> Result<CmdResult> {
        commands::sync::join(&self.store, code).await
    }

    pub async fn pull(&self) -> Result<CmdResult> {
        commands::sync::pull(&self.store).await
    }

    pub async fn push(&self) -> Result<CmdResult> {
        commands::sync::push(&self.store).await
    }

    pub fn sync_status(&self) -> Result<CmdResult> {
        commands::sync::status(&self.store)
    }

    pub fn leave_sync(&self) -> Result<CmdResult> {
        commands::sync::leave(&self.store)
    }

    pub fn start_polling(&mut self, period: Duration) -> Result<()> {
        self.store.start_polling(period)
    }

    pub fn stop_polling(&mut self) {
        self.store.stop_polling()
    }

    /// Wait for background pushes to settle. Call before exiting.
    pub async fn flush(&self) {
        self.store.flush().await
    }
}
