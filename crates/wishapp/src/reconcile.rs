//! Reconciliation of the local list with a fetched remote snapshot.
//!
//! The store asks a [`ReconcilePolicy`] what the list should become after a
//! successful fetch. The shipped policy, [`LastWriteWins`], discards local state
//! and adopts the remote snapshot as-is. Consequences worth knowing:
//!
//! - edits made locally since the last successful push are lost on pull,
//! - two devices editing under one sync code overwrite each other,
//! - an older in-flight push can land after a newer one.
//!
//! A merging policy can be injected through [`crate::store::StoreOptions`]
//! without touching the rest of the store.

use crate::model::{Wish, WishId};
use std::collections::HashSet;
use tracing::warn;

pub trait ReconcilePolicy: Send + Sync {
    fn reconcile(&self, local: &[Wish], remote: Vec<Wish>) -> Vec<Wish>;
}

/// Wholesale replace: the remote snapshot wins, local state is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastWriteWins;

impl ReconcilePolicy for LastWriteWins {
    fn reconcile(&self, _local: &[Wish], remote: Vec<Wish>) -> Vec<Wish> {
        remote
    }
}

/// Drops later entries whose id already appeared, keeping list order.
pub fn retain_unique_ids(wishes: Vec<Wish>) -> Vec<Wish> {
    let mut seen: HashSet<WishId> = HashSet::with_capacity(wishes.len());
    let before = wishes.len();
    let unique: Vec<Wish> = wishes
        .into_iter()
        .filter(|w| seen.insert(w.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(
            dropped = before - unique.len(),
            "snapshot contained duplicate wish ids"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_adopts_remote() {
        let local = vec![
            Wish::new("A", None).unwrap(),
            Wish::new("B", None).unwrap(),
        ];
        let remote = vec![Wish::new("C", None).unwrap()];
        let result = LastWriteWins.reconcile(&local, remote.clone());
        assert_eq!(result, remote);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let first = Wish::new("first", None).unwrap();
        let mut dup = Wish::new("second", None).unwrap();
        dup.id = first.id.clone();
        let other = Wish::new("other", None).unwrap();

        let result = retain_unique_ids(vec![first.clone(), dup, other.clone()]);
        assert_eq!(result, vec![first, other]);
    }
}
