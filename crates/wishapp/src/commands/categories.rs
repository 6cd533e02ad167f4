use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::remote::RemoteStore;
use crate::store::{LocalCache, WishStore};

pub fn run<C, R>(store: &WishStore<C, R>) -> Result<CmdResult>
where
    C: LocalCache + 'static,
    R: RemoteStore + 'static,
{
    let mut result = CmdResult {
        categories: store.category_summary(),
        ..Default::default()
    };
    if result.categories.is_empty() {
        result.add_message(CmdMessage::info("No categories yet."));
    }
    Ok(result.with_advisory(store))
}
