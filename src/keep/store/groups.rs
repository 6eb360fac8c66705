//! # Group Directory
//!
//! A group is any store file in the base directory other than the default
//! store. Listing reads only headers, and a file whose header cannot be
//! parsed is logged and skipped so one bad file does not hide the rest.

use log::{info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{group_not_found, StoreLayout};
use crate::error::{KeepError, Result};
use crate::header;
use crate::model::{now_millis, FileHeader, Group, Target};

/// Headers of every group under `root`, sorted by name.
pub fn list_groups(root: &Path, layout: &StoreLayout) -> Result<Vec<Group>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(KeepError::Io(e)),
    };

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(|n| layout.group_name(n)) else {
            continue;
        };

        let seed = layout.seed_header(&Target::Group(name.to_string()), now_millis());
        match header::read_only(&entry.path(), seed) {
            Ok(header) => groups.push(Group {
                name: name.to_string(),
                header,
            }),
            Err(e) => warn!(
                "event=group_skip module=groups status=error file={} error={}",
                entry.path().display(),
                e
            ),
        }
    }

    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

/// Creates `<name>.<ext>` with an empty header. An existing group is never
/// reinitialized: the call fails with `AlreadyExists` instead.
pub fn create_group(
    root: &Path,
    layout: &StoreLayout,
    name: &str,
    description: &str,
    now: i64,
) -> Result<FileHeader> {
    layout.validate_group_name(name)?;
    let path = root.join(layout.file_name(&Target::Group(name.to_string())));
    let header = FileHeader::new(name, description, now);

    header::create_new(&path, &header).map_err(|e| match e {
        KeepError::AlreadyExists(_) => {
            KeepError::AlreadyExists(format!("group '{}' already exists", name))
        }
        other => other,
    })?;

    info!("event=group_create module=groups status=ok name={}", name);
    Ok(header)
}

pub fn describe_group(root: &Path, layout: &StoreLayout, name: &str) -> Result<FileHeader> {
    layout.validate_group_name(name)?;
    let target = Target::Group(name.to_string());
    let path = root.join(layout.file_name(&target));
    header::read_only(&path, layout.seed_header(&target, now_millis()))
        .map_err(group_not_found(name))
}

/// Removes the group file. Its notes go with it.
pub fn delete_group(root: &Path, layout: &StoreLayout, name: &str) -> Result<()> {
    layout.validate_group_name(name)?;
    let path = root.join(layout.file_name(&Target::Group(name.to_string())));

    fs::remove_file(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            KeepError::NotFound(format!("no group named '{}'", name))
        } else {
            KeepError::Io(e)
        }
    })?;

    info!("event=group_delete module=groups status=ok name={}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HEADER_SIZE;
    use tempfile::TempDir;

    fn setup() -> (TempDir, StoreLayout) {
        (TempDir::new().unwrap(), StoreLayout::default())
    }

    #[test]
    fn lists_groups_but_not_the_default_store() {
        let (dir, layout) = setup();
        create_group(dir.path(), &layout, "work", "office", 1).unwrap();
        create_group(dir.path(), &layout, "home", "house", 2).unwrap();
        header::open(
            &dir.path().join("keeps.kps"),
            FileHeader::default_store(3),
        )
        .unwrap();

        let groups = list_groups(dir.path(), &layout).unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["home", "work"]);
        assert_eq!(groups[1].header.description, "office");
    }

    #[test]
    fn listing_skips_unreadable_and_foreign_files() {
        let (dir, layout) = setup();
        create_group(dir.path(), &layout, "work", "", 1).unwrap();
        fs::write(dir.path().join("broken.kps"), vec![0u8; HEADER_SIZE - 1]).unwrap();
        fs::write(dir.path().join("config.json"), b"{}").unwrap();
        fs::create_dir(dir.path().join("folder.kps")).unwrap();

        let groups = list_groups(dir.path(), &layout).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "work");
    }

    #[test]
    fn empty_group_file_reads_as_fresh_group() {
        let (dir, layout) = setup();
        fs::write(dir.path().join("work.kps"), b"").unwrap();

        let header = describe_group(dir.path(), &layout, "work").unwrap();
        assert_eq!(header.title, "work");
        assert_eq!((header.size, header.size_all_time), (0, 0));

        let groups = list_groups(dir.path(), &layout).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "work");
        assert_eq!(groups[0].header.size, 0);
    }

    #[test]
    fn listing_missing_directory_is_empty() {
        let (dir, layout) = setup();
        let missing = dir.path().join("nope");
        assert!(list_groups(&missing, &layout).unwrap().is_empty());
    }

    #[test]
    fn create_existing_group_fails_and_keeps_header() {
        let (dir, layout) = setup();
        create_group(dir.path(), &layout, "work", "first", 1).unwrap();

        let err = create_group(dir.path(), &layout, "work", "second", 2).unwrap_err();
        assert!(matches!(err, KeepError::AlreadyExists(_)));

        let header = describe_group(dir.path(), &layout, "work").unwrap();
        assert_eq!(header.description, "first");
        assert_eq!(header.created_at, 1);
    }

    #[test]
    fn create_rejects_bad_names() {
        let (dir, layout) = setup();
        assert!(matches!(
            create_group(dir.path(), &layout, "keeps", "", 1),
            Err(KeepError::InvalidName(_))
        ));
        assert!(matches!(
            create_group(dir.path(), &layout, "../up", "", 1),
            Err(KeepError::InvalidName(_))
        ));
    }

    #[test]
    fn describe_and_delete_missing_group() {
        let (dir, layout) = setup();
        assert!(matches!(
            describe_group(dir.path(), &layout, "ghost"),
            Err(KeepError::NotFound(_))
        ));
        assert!(matches!(
            delete_group(dir.path(), &layout, "ghost"),
            Err(KeepError::NotFound(_))
        ));
    }

    #[test]
    fn delete_removes_the_file() {
        let (dir, layout) = setup();
        create_group(dir.path(), &layout, "work", "", 1).unwrap();
        delete_group(dir.path(), &layout, "work").unwrap();

        assert!(!dir.path().join("work.kps").exists());
        assert!(list_groups(dir.path(), &layout).unwrap().is_empty());
    }
}
