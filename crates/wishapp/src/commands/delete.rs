use crate::commands::{with_selected, CmdMessage, CmdResult};
use crate::error::Result;
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};

pub fn run<C, R>(store: &WishStore<C, R>, selector: &str) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    with_selected(store, selector, |selected| {
        let removed = store.remove(&selected.wish.id)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Removed: {}", removed.text)));
        // Keep the pre-removal position so the display layer can reference it.
        result.wishes.push(selected);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::test_utils::local_store_with;

    #[test]
    fn removes_selected_wish() {
        let store = local_store_with(&["A", "B", "C"]);
        let result = run(&store, "2").unwrap();

        assert_eq!(result.wishes[0].index, 2);
        assert_eq!(result.wishes[0].wish.text, "B");
        let remaining: Vec<String> = store.snapshot().into_iter().map(|w| w.text).collect();
        assert_eq!(remaining, vec!["A", "C"]);
    }

    #[test]
    fn missing_selector_removes_nothing() {
        let store = local_store_with(&["A"]);
        let result = run(&store, "does-not-exist").unwrap();
        assert!(result.wishes.is_empty());
        assert!(result.has_level(MessageLevel::Info));
        assert_eq!(store.snapshot().len(), 1);
    }
}
