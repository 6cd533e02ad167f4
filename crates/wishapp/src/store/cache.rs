use crate::error::Result;

/// Abstract interface for the on-device key-value cache.
///
/// This trait handles the "how" of local durability (filesystem vs memory),
/// while `WishStore` handles the "what" (which keys, when to write, how to
/// reconcile with the remote copy).
///
/// Methods take `&self`: implementations provide their own interior mutability
/// so the cache can be shared with background sync tasks.
pub trait LocalCache: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    /// MUST be atomic so a crash never leaves a half-written list behind.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Keys double as file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The two cache keys a store uses: the serialized list and the bound sync code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    pub wishes: String,
    pub sync_token: String,
}

impl CacheKeys {
    pub fn new(base: &str) -> Self {
        Self {
            wishes: base.to_string(),
            sync_token: format!("{}_sync", base),
        }
    }

    /// Where an unreadable list is set aside before it can be overwritten.
    pub fn unreadable(&self) -> String {
        format!("{}_unreadable", self.wishes)
    }
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new("wishlist")
    }
}
