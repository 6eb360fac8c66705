use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Target;
use crate::store::DataStore;

/// Appends one note per entry of `texts`, in order.
pub fn run<S: DataStore>(store: &mut S, target: &Target, texts: &[String]) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for text in texts {
        let (note, header) = store.create_note(target, text)?;
        if note.text.len() < text.len() {
            result.add_message(CmdMessage::warning(format!(
                "Note {} was cut to {} bytes",
                note.id,
                note.text.len()
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "Note {} saved to {}",
            note.id, target
        )));
        result.affected_notes.push(note);
        result.header = Some(header);
    }

    Ok(result)
}
