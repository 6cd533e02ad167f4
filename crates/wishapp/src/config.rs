//! # Configuration
//!
//! Wish configuration is managed by [`confique`], layered from environment
//! variables, a TOML file, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `WISH_DATA_DIR`, `WISH_REMOTE_URL`, etc.
//! 2. **Config file**: `wish.toml` in the data directory.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `WISH_DATA_DIR` | OS data dir | Where the local cache lives |
//! | `storage_key` | `WISH_STORAGE_KEY` | `wishlist` | Cache key for the list (`<key>_sync` holds the code) |
//! | `remote_url` | `WISH_REMOTE_URL` | none | Base URL of the shared document API |
//! | `api_key` | `WISH_API_KEY` | none | Sent as `X-Master-Key` |
//! | `static_url` | `WISH_STATIC_URL` | none | Read-only mirror URL |
//! | `poll_interval_secs` | `WISH_POLL_INTERVAL_SECS` | `30` | Polling period for `wish watch` |
//! | `request_timeout_secs` | `WISH_REQUEST_TIMEOUT_SECS` | `10` | HTTP timeout |
//!
//! `remote_url` wins over `static_url` when both are set.

use crate::error::{Result, WishError};
use crate::store::cache::is_valid_key;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "wish.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WishConfig {
    /// Directory holding the local cache. Defaults to the OS data directory.
    #[config(env = "WISH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base cache key for the list.
    #[config(env = "WISH_STORAGE_KEY", default = "wishlist")]
    pub storage_key: String,

    /// Base URL of the shared JSON document API.
    #[config(env = "WISH_REMOTE_URL")]
    pub remote_url: Option<String>,

    #[config(env = "WISH_API_KEY")]
    pub api_key: Option<String>,

    /// URL of a static JSON file to mirror read-only.
    #[config(env = "WISH_STATIC_URL")]
    pub static_url: Option<String>,

    #[config(env = "WISH_POLL_INTERVAL_SECS", default = 30)]
    pub poll_interval_secs: u64,

    #[config(env = "WISH_REQUEST_TIMEOUT_SECS", default = 10)]
    pub request_timeout_secs: u64,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: "wishlist".to_string(),
            remote_url: None,
            api_key: None,
            static_url: None,
            poll_interval_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

/// Where the list is shared, derived from the URLs that are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    None,
    Shared {
        base_url: String,
        api_key: Option<String>,
    },
    Mirror {
        url: String,
    },
}

impl WishConfig {
    /// Load from the environment and `<dir>/wish.toml` (if present).
    pub fn load(dir: &Path) -> Result<Self> {
        let config = Self::builder()
            .env()
            .file(dir.join(CONFIG_FILE_NAME))
            .load()
            .map_err(|e| WishError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the store could not honor, such as a storage key that
    /// is not usable as a file name.
    pub fn validate(&self) -> Result<()> {
        let key = self.storage_key();
        if !is_valid_key(key) {
            return Err(WishError::Config(format!(
                "storage_key {:?} may only contain letters, digits, '-' and '_'",
                key
            )));
        }
        Ok(())
    }

    pub fn remote_target(&self) -> RemoteTarget {
        if let Some(base_url) = non_blank(&self.remote_url) {
            RemoteTarget::Shared {
                base_url,
                api_key: non_blank(&self.api_key),
            }
        } else if let Some(url) = non_blank(&self.static_url) {
            RemoteTarget::Mirror { url }
        } else {
            RemoteTarget::None
        }
    }

    /// Polling period, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn storage_key(&self) -> &str {
        let key = self.storage_key.trim();
        if key.is_empty() {
            "wishlist"
        } else {
            key
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WishConfig::default();
        assert_eq!(config.storage_key(), "wishlist");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.remote_target(), RemoteTarget::None);
    }

    #[test]
    fn test_remote_url_wins_over_static_url() {
        let config = WishConfig {
            remote_url: Some("https://api.example.com/b/".to_string()),
            api_key: Some("  ".to_string()),
            static_url: Some("https://example.com/wishes.json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.remote_target(),
            RemoteTarget::Shared {
                base_url: "https://api.example.com/b/".to_string(),
                api_key: None,
            }
        );
    }

    #[test]
    fn test_static_url_selects_mirror() {
        let config = WishConfig {
            remote_url: Some("".to_string()),
            static_url: Some("https://example.com/wishes.json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.remote_target(),
            RemoteTarget::Mirror {
                url: "https://example.com/wishes.json".to_string()
            }
        );
    }

    #[test]
    fn test_blank_storage_key_falls_back() {
        let config = WishConfig {
            storage_key: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.storage_key(), "wishlist");
    }

    #[test]
    fn test_storage_key_must_be_a_file_name() {
        for key in ["my.list", "../wishes", "a b", "list/one"] {
            let config = WishConfig {
                storage_key: key.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(WishError::Config(_))),
                "{key:?} should be rejected"
            );
        }
        let ok = WishConfig {
            storage_key: " shared-list_2 ".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_invalid_storage_key_in_file_fails_load() {
        if std::env::var_os("WISH_STORAGE_KEY").is_some() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "storage_key = \"my.list\"\n").unwrap();

        let err = WishConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, WishError::Config(msg) if msg.contains("my.list")));
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config = WishConfig {
            poll_interval_secs: 0,
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "storage_key = \"our-list\"\npoll_interval_secs = 5\n",
        )
        .unwrap();

        let config = WishConfig::load(dir.path()).unwrap();
        assert_eq!(config.poll_interval_secs, 5);
        // WISH_STORAGE_KEY may be set by the environment running the tests.
        if std::env::var_os("WISH_STORAGE_KEY").is_none() {
            assert_eq!(config.storage_key(), "our-list");
        }
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = WishConfig {
            remote_url: Some("https://api.example.com".to_string()),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: WishConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
