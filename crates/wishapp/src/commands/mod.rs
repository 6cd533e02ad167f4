//! # Command Layer
//!
//! Each command lives in its own submodule and is a plain function over a
//! [`WishStore`]. Commands return a structured [`CmdResult`]; they never print,
//! prompt, or decide exit codes.
//!
//! ## Structured Returns
//!
//! [`CmdResult`] carries:
//! - `wishes`: wishes to show, each paired with its display position
//! - `categories`: category → count (for `categories`)
//! - `counts`: per-filter counts (for `list`)
//! - `sync_token`: the bound sync code, when relevant
//! - `messages`: leveled messages (info, success, warning, error)
//!
//! Every command ends by appending the store's current sync advisory (if any) as
//! a warning, so a display layer only has to render messages to surface it.
//!
//! ## No-op Inputs
//!
//! Blank wish text and selectors that match nothing are not errors here: the
//! command returns an unchanged result with an info message.
//!
//! ## Selectors
//!
//! A wish is selected either by its 1-based position in the full (newest
//! first) list or by a unique prefix of its id. See [`resolve`].
//!
//! ## Command Modules
//!
//! - [`create`]: Add a wish
//! - [`list`]: Filtered listing with counts
//! - [`flags`]: Toggle or set the completed/priority flags
//! - [`delete`]: Remove a wish
//! - [`categories`]: Category summary
//! - [`sync`]: Sync code management, manual pull/push

use crate::error::{Result, WishError};
use crate::model::{FilterCounts, Wish, WishId};
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};
use crate::token::SyncToken;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod categories;
pub mod create;
pub mod delete;
pub mod flags;
pub mod list;
pub mod sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A wish paired with its 1-based position in the full list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayWish {
    pub index: usize,
    pub wish: Wish,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub wishes: Vec<DisplayWish>,
    pub categories: BTreeMap<String, usize>,
    pub counts: Option<FilterCounts>,
    pub sync_token: Option<SyncToken>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_wishes(mut self, wishes: Vec<DisplayWish>) -> Self {
        self.wishes = wishes;
        self
    }

    pub fn with_sync_token(mut self, token: Option<SyncToken>) -> Self {
        self.sync_token = token;
        self
    }

    /// Appends the store's sync advisory, if one is set.
    pub(crate) fn with_advisory<C, R>(mut self, store: &WishStore<C, R>) -> Self
    where
        C: LocalCache + 'static,
        R: RemoteStore + 'static,
    {
        if let Some(issue) = store.last_error() {
            self.add_message(CmdMessage::warning(issue.advisory()));
        }
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

/// Resolves a selector against the current list.
///
/// - `N` (1-based) selects the Nth wish of the full list.
/// - Anything else is matched as an id prefix, which must be unique.
pub fn resolve<C, R>(store: &WishStore<C, R>, selector: &str) -> Result<DisplayWish>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let selector = selector.trim();
    let wishes = store.snapshot();

    if let Ok(n) = selector.parse::<usize>() {
        if (1..=wishes.len()).contains(&n) {
            return Ok(DisplayWish {
                index: n,
                wish: wishes[n - 1].clone(),
            });
        }
    }

    if selector.is_empty() {
        return Err(WishError::WishNotFound(WishId::from(selector)));
    }

    let mut matches = wishes
        .into_iter()
        .enumerate()
        .filter(|(_, w)| w.id.as_str().starts_with(selector));
    match (matches.next(), matches.next()) {
        (Some((i, wish)), None) => Ok(DisplayWish {
            index: i + 1,
            wish,
        }),
        (Some(_), Some(_)) => Err(WishError::AmbiguousSelector(selector.to_string())),
        (None, _) => Err(WishError::WishNotFound(WishId::from(selector))),
    }
}

/// Index of `id` in the current list, as a display position.
pub(crate) fn display_index<C, R>(store: &WishStore<C, R>, id: &WishId) -> Option<usize>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    store
        .snapshot()
        .iter()
        .position(|w| &w.id == id)
        .map(|i| i + 1)
}

/// Shared handling for selector-based commands: not-found and ambiguous
/// selectors become info/error messages instead of failures.
pub(crate) fn with_selected<C, R, F>(
    store: &WishStore<C, R>,
    selector: &str,
    action: F,
) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
    F: FnOnce(DisplayWish) -> Result<CmdResult>,
{
    let result = match resolve(store, selector) {
        Ok(selected) => match action(selected) {
            Err(WishError::WishNotFound(_)) => no_match(selector),
            other => other?,
        },
        Err(WishError::WishNotFound(_)) => no_match(selector),
        Err(WishError::AmbiguousSelector(s)) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(format!(
                "\"{}\" matches more than one wish; use more characters",
                s
            )));
            result
        }
        Err(e) => return Err(e),
    };
    Ok(result.with_advisory(store))
}

fn no_match(selector: &str) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("No wish matches \"{}\"", selector)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{local_store_with, local_store_with_ids};

    #[test]
    fn resolves_by_position() {
        let store = local_store_with(&["A", "B", "C"]);
        let selected = resolve(&store, "2").unwrap();
        assert_eq!(selected.index, 2);
        assert_eq!(selected.wish.text, "B");
    }

    #[test]
    fn resolves_by_id_prefix() {
        let store = local_store_with(&["A", "B"]);
        let b = store.snapshot()[1].clone();
        let selected = resolve(&store, &b.id.as_str()[..8]).unwrap();
        assert_eq!(selected.index, 2);
        assert_eq!(selected.wish.id, b.id);
    }

    #[test]
    fn out_of_range_position_is_not_found() {
        let store = local_store_with(&["A"]);
        assert!(matches!(
            resolve(&store, "5"),
            Err(WishError::WishNotFound(_))
        ));
        assert!(matches!(
            resolve(&store, "  "),
            Err(WishError::WishNotFound(_))
        ));
    }

    #[test]
    fn shared_prefix_is_ambiguous() {
        let store = local_store_with(&["A", "B"]);
        let err = resolve(&store, "").unwrap_err();
        assert!(matches!(err, WishError::WishNotFound(_)));

        let store = local_store_with_ids(&[("abc-1", "A"), ("abc-2", "B")]);
        assert!(matches!(
            resolve(&store, "abc"),
            Err(WishError::AmbiguousSelector(_))
        ));
        assert_eq!(resolve(&store, "abc-2").unwrap().wish.text, "B");
    }
}
