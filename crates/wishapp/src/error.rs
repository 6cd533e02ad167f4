use crate::model::WishId;
use crate::remote::RemoteFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WishError {
    #[error("Wish text is empty")]
    EmptyText,

    #[error("Wish not found: {0}")]
    WishNotFound(WishId),

    #[error("Selector {0:?} matches more than one wish")]
    AmbiguousSelector(String),

    #[error("Invalid sync code: {0:?}")]
    InvalidSyncToken(String),

    #[error("No sync code is set")]
    NotBound,

    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(RemoteFailure),

    #[error("Remote write failed: {0}")]
    RemoteWriteFailed(RemoteFailure),

    #[error("No async runtime available for background sync")]
    NoRuntime,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WishError>;
