use crate::commands::{unique_ids, CmdResult};
use crate::error::Result;
use crate::model::Target;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, target: &Target, ids: &[i64]) -> Result<CmdResult> {
    let notes = unique_ids(ids)
        .into_iter()
        .map(|id| store.read_note(target, id))
        .collect::<Result<Vec<_>>>()?;

    Ok(CmdResult::default().with_listed_notes(notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeepError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn reads_requested_notes_in_order() {
        let fixture = StoreFixture::new().with_notes(3, &Target::Default);

        let result = run(&fixture.store, &Target::Default, &[3, 1, 3]).unwrap();

        let texts: Vec<_> = result.listed_notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["Note 3", "Note 1"]);
    }

    #[test]
    fn unknown_id_is_invalid() {
        let fixture = StoreFixture::new().with_notes(1, &Target::Default);
        assert!(matches!(
            run(&fixture.store, &Target::Default, &[1, 2]),
            Err(KeepError::InvalidId(_))
        ));
    }
}
