use crate::model::{Wish, WishId};
use crate::remote::memory::MemRemote;
use crate::remote::NoRemote;
use crate::store::mem_cache::MemCache;
use crate::store::WishStore;
use std::sync::Arc;

pub type LocalTestStore = WishStore<MemCache, NoRemote>;
pub type SyncedTestStore = WishStore<MemCache, Arc<MemRemote>>;

pub fn local_store() -> LocalTestStore {
    WishStore::new(MemCache::new(), NoRemote)
}

/// A local-only store whose list is `texts`, in display order.
pub fn local_store_with(texts: &[&str]) -> LocalTestStore {
    let wishes: Vec<Wish> = texts
        .iter()
        .map(|t| Wish::new(t, None).expect("test wish text must not be blank"))
        .collect();
    seeded(wishes)
}

/// Like [`local_store_with`] but with fixed ids.
pub fn local_store_with_ids(entries: &[(&str, &str)]) -> LocalTestStore {
    let wishes = entries
        .iter()
        .map(|(id, text)| wish_with_id(id, text))
        .collect();
    seeded(wishes)
}

pub fn wish_with_id(id: &str, text: &str) -> Wish {
    let mut wish = Wish::new(text, None).expect("test wish text must not be blank");
    wish.id = WishId::from(id);
    wish
}

/// A store backed by an in-memory shared remote. Not bound to a sync code.
pub fn synced_store() -> (SyncedTestStore, Arc<MemRemote>) {
    let remote = Arc::new(MemRemote::new());
    (WishStore::new(MemCache::new(), Arc::clone(&remote)), remote)
}

/// Two stores sharing one remote, like two devices.
pub fn two_devices() -> (SyncedTestStore, SyncedTestStore, Arc<MemRemote>) {
    let remote = Arc::new(MemRemote::new());
    let a = WishStore::new(MemCache::new(), Arc::clone(&remote));
    let b = WishStore::new(MemCache::new(), Arc::clone(&remote));
    (a, b, remote)
}

fn seeded(wishes: Vec<Wish>) -> LocalTestStore {
    let json = serde_json::to_string(&wishes).expect("wishes serialize");
    let store = WishStore::new(MemCache::new().with_entry("wishlist", &json), NoRemote);
    store.load_local();
    store
}
