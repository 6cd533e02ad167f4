//! # Context Initialization
//!
//! Builds a ready-to-use [`WishContext`] from configuration:
//!
//! 1. Pick the data directory: explicit override, else `WISH_DATA_DIR`, else
//!    the OS data directory (via the `directories` crate).
//! 2. Load [`WishConfig`] from the environment and `<data_dir>/wish.toml`.
//! 3. Select the remote store from the configured URLs (see
//!    [`WishConfig::remote_target`]).
//! 4. Wire an [`FsCache`] and the remote into a [`WishStore`] behind a
//!    [`WishApi`].
//!
//! Initialization does not touch the network; call [`WishApi::load`] for that.

use crate::api::WishApi;
use crate::config::{RemoteTarget, WishConfig};
use crate::error::{Result, WishError};
use crate::remote::http::HttpRemote;
use crate::remote::static_file::StaticFileRemote;
use crate::remote::{NoRemote, RemoteStore};
use crate::store::fs_cache::FsCache;
use crate::store::{CacheKeys, StoreOptions, WishStore};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub type AppApi = WishApi<FsCache, Box<dyn RemoteStore>>;

pub struct WishContext {
    pub api: AppApi,
    pub config: WishConfig,
    pub data_dir: PathBuf,
}

/// The OS-appropriate data directory for wish.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "wish", "wish")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| WishError::Config("Could not determine a data directory".to_string()))
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<WishContext> {
    let config_dir = match data_override.clone() {
        Some(dir) => dir,
        None => match std::env::var_os("WISH_DATA_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        },
    };

    let config = WishConfig::load(&config_dir)?;
    // An explicit override beats whatever the config says.
    let data_dir = match data_override {
        Some(dir) => dir,
        None => config.data_dir.clone().unwrap_or(config_dir),
    };

    let remote = build_remote(&config)?;
    debug!(data_dir = %data_dir.display(), mode = ?remote.mode(), "initialized wish context");

    let options = StoreOptions {
        keys: CacheKeys::new(config.storage_key()),
        ..Default::default()
    };
    let store = WishStore::with_options(FsCache::new(data_dir.clone()), remote, options);

    Ok(WishContext {
        api: WishApi::new(store),
        config,
        data_dir,
    })
}

pub fn build_remote(config: &WishConfig) -> Result<Box<dyn RemoteStore>> {
    let timeout = config.request_timeout();
    Ok(match config.remote_target() {
        RemoteTarget::None => Box::new(NoRemote),
        RemoteTarget::Shared { base_url, api_key } => {
            Box::new(HttpRemote::new(&base_url, timeout)?.with_api_key(api_key))
        }
        RemoteTarget::Mirror { url } => Box::new(StaticFileRemote::new(&url, timeout)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteMode;

    #[test]
    fn test_build_remote_follows_config() {
        let local = build_remote(&WishConfig::default()).unwrap();
        assert_eq!(local.mode(), RemoteMode::Disabled);

        let shared = build_remote(&WishConfig {
            remote_url: Some("https://api.example.com/b".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(shared.mode(), RemoteMode::Shared);

        let mirror = build_remote(&WishConfig {
            static_url: Some("https://example.com/wishes.json".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(mirror.mode(), RemoteMode::ReadOnlyMirror);
    }

    #[test]
    fn test_initialize_with_override_uses_that_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = initialize(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(ctx.data_dir, dir.path());

        ctx.api.add_wish("On disk", None).unwrap();
        assert!(dir
            .path()
            .join(format!("{}.json", ctx.config.storage_key()))
            .exists());
    }

    #[test]
    fn test_initialize_refuses_unusable_storage_key() {
        if std::env::var_os("WISH_STORAGE_KEY").is_some() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::config::CONFIG_FILE_NAME),
            "storage_key = \"my.list\"\n",
        )
        .unwrap();

        assert!(matches!(
            initialize(Some(dir.path().to_path_buf())),
            Err(WishError::Config(_))
        ));
    }
}
