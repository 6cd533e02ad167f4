use crate::commands::{display_index, with_selected, CmdMessage, CmdResult, DisplayWish};
use crate::error::Result;
use crate::model::{Wish, WishPatch};
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};

pub fn toggle_completed<C, R>(store: &WishStore<C, R>, selector: &str) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    with_selected(store, selector, |selected| {
        let wish = store.toggle_completed(&selected.wish.id)?;
        let verb = if wish.completed {
            "Completed"
        } else {
            "Reopened"
        };
        Ok(affected(store, wish, verb))
    })
}

pub fn toggle_priority<C, R>(store: &WishStore<C, R>, selector: &str) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    with_selected(store, selector, |selected| {
        let wish = store.toggle_priority(&selected.wish.id)?;
        let verb = if wish.priority {
            "Starred"
        } else {
            "Unstarred"
        };
        Ok(affected(store, wish, verb))
    })
}

/// Sets flags explicitly. An empty patch changes nothing and writes nothing.
pub fn set<C, R>(store: &WishStore<C, R>, selector: &str, patch: WishPatch) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    with_selected(store, selector, |selected| {
        if patch.is_empty() {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info("Nothing to change"));
            result.wishes.push(selected);
            return Ok(result);
        }
        let wish = store.set_flags(&selected.wish.id, patch)?;
        Ok(affected(store, wish, "Updated"))
    })
}

fn affected<C, R>(store: &WishStore<C, R>, wish: Wish, verb: &str) -> CmdResult
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("{}: {}", verb, wish.text)));
    if let Some(index) = display_index(store, &wish.id) {
        result.wishes.push(DisplayWish { index, wish });
    }
    result
}
