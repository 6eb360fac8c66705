use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Order, Target};
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, target: &Target, order: Order) -> Result<CmdResult> {
    let (header, notes) = store.list_notes(target, order)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(match header.size {
        1 => "1 note".to_string(),
        n => format!("{} notes", n),
    }));

    Ok(result.with_listed_notes(notes).with_header(header))
}
