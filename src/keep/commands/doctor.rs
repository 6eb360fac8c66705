use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Target;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &mut S, target: &Target) -> Result<CmdResult> {
    let report = store.doctor(target)?;
    let mut result = CmdResult::default();

    if report.repaired {
        result.add_message(CmdMessage::warning(format!(
            "Header of {} was out of date and has been fixed:",
            target
        )));
        result.add_message(CmdMessage::info(format!(
            "  - {} live note(s), {} ever created",
            report.header.size, report.header.size_all_time
        )));
    } else {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    }
    if report.scan.trailing_bytes > 0 {
        result.add_message(CmdMessage::warning(format!(
            "  - {} stray byte(s) after the last full note",
            report.scan.trailing_bytes
        )));
    }

    Ok(result.with_header(report.header.clone()).with_doctor(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn healthy_store_reports_nothing() {
        let mut store = StoreFixture::new().with_notes(2, &Target::Default).store;

        let result = run(&mut store, &Target::Default).unwrap();

        let report = result.doctor.unwrap();
        assert!(!report.repaired);
        assert_eq!(report.scan.slots, 2);
        assert_eq!(report.scan.live, 2);
        assert!(matches!(result.messages[0].level, MessageLevel::Success));
    }

    #[test]
    fn works_on_groups() {
        let work = Target::Group("work".into());
        let mut store = StoreFixture::new()
            .with_group("work")
            .with_notes(1, &work)
            .store;

        let result = run(&mut store, &work).unwrap();
        assert_eq!(result.header.unwrap().title, "work");
    }
}
