use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use std::fs;
use std::path::Path;

pub fn run(dir: &Path) -> Result<CmdResult> {
    fs::create_dir_all(dir)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Initialized keep store"));
    result.store_root = Some(dir.to_path_buf());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_directory() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("a").join(".keep");

        let result = run(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(result.store_root.as_deref(), Some(dir.as_path()));
        // Running again is harmless
        assert!(run(&dir).is_ok());
    }
}
