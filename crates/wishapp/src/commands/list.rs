use crate::commands::{CmdMessage, CmdResult, DisplayWish};
use crate::error::Result;
use crate::model::{FilterCounts, WishFilter};
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};

/// Lists wishes matching `filter`. Positions always refer to the full list so
/// a selector read off a filtered listing stays valid.
pub fn run<C, R>(store: &WishStore<C, R>, filter: WishFilter) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let wishes = store.snapshot();
    let listed: Vec<DisplayWish> = wishes
        .iter()
        .enumerate()
        .filter(|(_, w)| filter.matches(w))
        .map(|(i, w)| DisplayWish {
            index: i + 1,
            wish: w.clone(),
        })
        .collect();

    let mut result = CmdResult::default()
        .with_wishes(listed)
        .with_sync_token(store.sync_token());
    result.counts = Some(FilterCounts::of(&wishes));

    if result.wishes.is_empty() {
        let message = match filter {
            WishFilter::All => "No wishes yet. Add one with `wish add`.",
            WishFilter::Pending => "Nothing pending.",
            WishFilter::Completed => "Nothing completed yet.",
            WishFilter::Priority => "No priority wishes.",
        };
        result.add_message(CmdMessage::info(message));
    }

    Ok(result.with_advisory(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::local_store_with;

    #[test]
    fn lists_everything_with_counts() {
        let store = local_store_with(&["A", "B", "C"]);
        let b = store.snapshot()[1].id.clone();
        store.toggle_completed(&b).unwrap();

        let result = run(&store, WishFilter::All).unwrap();
        assert_eq!(result.wishes.len(), 3);
        let counts = result.counts.unwrap();
        assert_eq!(counts.all, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.priority, 0);
    }

    #[test]
    fn filtered_listing_keeps_full_list_positions() {
        let store = local_store_with(&["A", "B", "C"]);
        let c = store.snapshot()[2].id.clone();
        store.toggle_priority(&c).unwrap();

        let result = run(&store, WishFilter::Priority).unwrap();
        assert_eq!(result.wishes.len(), 1);
        assert_eq!(result.wishes[0].index, 3);
        assert_eq!(result.wishes[0].wish.text, "C");
    }

    #[test]
    fn empty_view_explains_itself() {
        let store = local_store_with(&["A"]);
        let result = run(&store, WishFilter::Completed).unwrap();
        assert!(result.wishes.is_empty());
        assert_eq!(result.messages[0].content, "Nothing completed yet.");
    }
}
