//! Sync code management and manual pull/push.
//!
//! Remote failures are not returned as errors: the store records them as its
//! advisory and every result carries that advisory as a warning.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, WishError};
use crate::remote::{RemoteFailure, RemoteMode, RemoteStore};
use crate::store::{LocalCache, PullOutcome, WishStore};

const NO_REMOTE: &str = "No remote store is configured. Set WISH_REMOTE_URL to share your list.";
const READ_ONLY: &str = "The configured remote is a read-only mirror; sync codes need a shared remote.";

pub async fn create<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default();
    match store.create_sync_token().await {
        Ok(token) => {
            result.add_message(CmdMessage::success(format!(
                "Sync code created: {}. Use it on another device to share this list.",
                token
            )));
            result.sync_token = Some(token);
        }
        Err(e) => result.add_message(unsupported(e)?),
    }
    Ok(result.with_advisory(store))
}

pub async fn join<C, R>(store: &WishStore<C, R>, code: &str) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default();
    match store.join_with_sync_token(code).await {
        Ok(outcome) => {
            let token = store.sync_token();
            let label = token.as_ref().map(|t| t.as_str()).unwrap_or_default();
            let message = match outcome {
                PullOutcome::Replaced { count } => CmdMessage::success(format!(
                    "Joined {}: {} wish{} loaded",
                    label,
                    count,
                    plural(count)
                )),
                _ => CmdMessage::info(format!("Joined {}", label)),
            };
            result.add_message(message);
            result.sync_token = token;
        }
        Err(WishError::InvalidSyncToken(input)) => {
            result.add_message(CmdMessage::error(format!(
                "\"{}\" is not a valid sync code (letters and digits only)",
                input.trim()
            )));
        }
        Err(e) => result.add_message(unsupported(e)?),
    }
    Ok(result.with_advisory(store))
}

pub async fn pull<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default().with_sync_token(store.sync_token());
    match store.pull().await {
        PullOutcome::Replaced { count } => result.add_message(CmdMessage::success(format!(
            "Pulled {} wish{} from the remote",
            count,
            plural(count)
        ))),
        PullOutcome::Offline => {}
        PullOutcome::LocalOnly => result.add_message(CmdMessage::info(local_only_reason(store))),
    }
    Ok(result.with_advisory(store))
}

pub async fn push<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default().with_sync_token(store.sync_token());
    match store.push_now().await {
        Ok(()) => {
            let count = store.snapshot().len();
            result.add_message(CmdMessage::success(format!(
                "Pushed {} wish{} to the remote",
                count,
                plural(count)
            )));
        }
        Err(WishError::NotBound) => {
            result.add_message(CmdMessage::info(
                "No sync code is set. Create one with `wish sync create`.",
            ));
        }
        // Recorded by the store; surfaced through the advisory.
        Err(WishError::RemoteWriteFailed(failure))
            if failure != RemoteFailure::ReadOnly && failure != RemoteFailure::Disabled => {}
        Err(e) => result.add_message(unsupported(e)?),
    }
    Ok(result.with_advisory(store))
}

pub fn status<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let token = store.sync_token();
    let mut result = CmdResult::default().with_sync_token(token.clone());
    let mode = match store.remote_mode() {
        RemoteMode::Disabled => "local only",
        RemoteMode::Shared => "shared remote",
        RemoteMode::ReadOnlyMirror => "read-only mirror",
    };
    result.add_message(CmdMessage::info(format!("Remote: {}", mode)));
    match token {
        Some(token) => result.add_message(CmdMessage::info(format!("Sync code: {}", token))),
        None if store.remote_mode() == RemoteMode::Shared => {
            result.add_message(CmdMessage::info("Sync code: none"))
        }
        None => {}
    }
    Ok(result.with_advisory(store))
}

pub fn leave<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default();
    match store.sync_token() {
        Some(token) => {
            store.unbind();
            result.add_message(CmdMessage::success(format!(
                "Stopped syncing with {}. Your wishes stay on this device.",
                token
            )));
        }
        None => result.add_message(CmdMessage::info("No sync code is set.")),
    }
    Ok(result.with_advisory(store))
}

/// Maps "wrong kind of remote" errors to a message; anything else propagates.
fn unsupported(error: WishError) -> Result<CmdMessage> {
    match error {
        WishError::RemoteUnavailable(RemoteFailure::Disabled)
        | WishError::RemoteWriteFailed(RemoteFailure::Disabled) => {
            Ok(CmdMessage::error(NO_REMOTE))
        }
        WishError::RemoteWriteFailed(RemoteFailure::ReadOnly) => Ok(CmdMessage::error(READ_ONLY)),
        other => Err(other),
    }
}

fn local_only_reason<C, R>(store: &WishStore<C, R>) -> &'static str
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    match store.remote_mode() {
        RemoteMode::Disabled => NO_REMOTE,
        _ => "No sync code is set. Create one with `wish sync create` or join with `wish sync join <code>`.",
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "es"
    }
}
