//! # Storage Layer
//!
//! A wish list lives in three places at once:
//! 1. **Memory**: the canonical list owned by [`WishStore`].
//! 2. **Local cache**: a durable copy on this device ([`LocalCache`]).
//! 3. **Remote document**: an optional copy shared between devices
//!    ([`crate::remote::RemoteStore`]), selected by a sync code.
//!
//! All three can diverge. The store does not try to prevent that; it applies one
//! fixed policy.
//!
//! ## Write Path
//!
//! Every mutation (add, toggle, set flags, remove):
//!
//! 1. Updates memory.
//! 2. Serializes the whole list into the cache under the list key.
//! 3. If a sync code is bound, spawns a whole-document push of the list as it
//!    was at mutation time.
//!
//! Cache write failures are logged and ignored. Push failures set
//! `last_error` and keep local state.
//!
//! ## Read Path
//!
//! On `load`, `pull`, join, and every poll tick:
//!
//! - **Fetch succeeds** → the [`crate::reconcile::ReconcilePolicy`] decides the
//!   new list (wholesale replace by default), which is then cached.
//! - **Fetch fails** → the list is reloaded from the cache (or kept as-is if the
//!   cache is empty) and `last_error` is set.
//!
//! ## Cache Layout
//!
//! ```text
//! <data_dir>/
//! ├── wishlist.json        # Serialized list (newest first)
//! └── wishlist_sync.json   # Bound sync code, if any
//! ```
//!
//! The base key is configurable (see [`CacheKeys`]).
//!
//! ## Implementations
//!
//! - [`fs_cache::FsCache`]: one file per key, atomic writes.
//! - [`mem_cache::MemCache`]: in-memory, for tests.

pub mod cache;
pub mod fs_cache;
pub mod issue;
pub mod mem_cache;
mod poller;
pub mod wish_store;

pub use cache::{CacheKeys, LocalCache};
pub use issue::SyncIssue;
pub use wish_store::{PullOutcome, StoreOptions, WishStore};
