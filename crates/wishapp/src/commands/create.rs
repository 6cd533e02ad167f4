use crate::commands::{CmdMessage, CmdResult, DisplayWish};
use crate::error::{Result, WishError};
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};

pub fn run<C, R>(store: &WishStore<C, R>, text: &str, category: Option<&str>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult::default();
    match store.add(text, category) {
        Ok(wish) => {
            result.add_message(CmdMessage::success(format!(
                "Wish added: {} [{}]",
                wish.text, wish.category
            )));
            // New wishes are prepended, so always position 1
            result.wishes.push(DisplayWish { index: 1, wish });
        }
        Err(WishError::EmptyText) => {
            result.add_message(CmdMessage::info("Nothing to add: wish text is empty"));
        }
        Err(e) => return Err(e),
    }
    Ok(result.with_advisory(store))
}
