use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

pub fn create<S: DataStore>(store: &mut S, name: &str, description: &str) -> Result<CmdResult> {
    let header = store.create_group(name, description)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Group '{}' created", name)));
    Ok(result.with_header(header))
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    let groups = store.list_groups()?;
    let mut result = CmdResult::default();
    if groups.is_empty() {
        result.add_message(CmdMessage::info("No groups yet."));
    }
    Ok(result.with_groups(groups))
}

pub fn describe<S: DataStore>(store: &S, name: &str) -> Result<CmdResult> {
    let header = store.describe_group(name)?;
    Ok(CmdResult::default().with_header(header))
}

pub fn delete<S: DataStore>(store: &mut S, name: &str) -> Result<CmdResult> {
    store.delete_group(name)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Group '{}' removed", name)));
    Ok(result)
}
