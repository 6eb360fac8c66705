use crate::commands::{unique_ids, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Target;
use crate::store::DataStore;

/// Tombstones every id in `ids`. All ids are checked before anything is
/// written, so one bad id leaves the store untouched.
pub fn run<S: DataStore>(store: &mut S, target: &Target, ids: &[i64]) -> Result<CmdResult> {
    let ids = unique_ids(ids);
    let notes = ids
        .iter()
        .map(|id| store.read_note(target, *id))
        .collect::<Result<Vec<_>>>()?;

    let mut result = CmdResult::default();
    for note in notes {
        let header = store.delete_note(target, note.id)?;
        result.add_message(CmdMessage::success(format!(
            "Note {} deleted from {}",
            note.id, target
        )));
        result.affected_notes.push(note);
        result.header = Some(header);
    }

    Ok(result)
}
