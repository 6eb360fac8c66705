//! # Storage Layer
//!
//! This module defines the storage abstraction for keep. The [`DataStore`]
//! trait is what the command layer talks to; it never sees files or offsets.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one binary file per group
//! - [`memory::InMemoryStore`]: byte buffers in a map, for testing
//!
//! Both run the exact same record code ([`records`], [`crate::header`],
//! [`crate::codec`]) over different handles: a `File` for the former and a
//! `Cursor<Vec<u8>>` for the latter.
//!
//! ## Storage Format
//!
//! ```text
//! ~/.keep/
//! ├── keeps.kps       # default store, notes with no group
//! ├── work.kps        # group "work"
//! ├── home.kps        # group "home"
//! ├── config.json
//! └── logs/
//! ```
//!
//! Each `.kps` file is one header followed by fixed-size note slots; see
//! [`crate::codec`] for the byte layout and [`records`] for the offset math.
//!
//! ## Targets
//!
//! Note operations take a [`Target`]: the default store, which is created on
//! first use, or a named group, which must already exist.

use crate::error::{KeepError, Result};
use crate::model::{FileHeader, Group, Note, Order, Target};

pub mod fs;
pub mod groups;
pub mod memory;
pub mod records;

pub use records::SlotScan;

pub const DEFAULT_FILE_EXT: &str = "kps";
pub const DEFAULT_STORE_NAME: &str = "keeps";

/// Report from the `doctor` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub header: FileHeader,
    pub scan: SlotScan,
    /// The header counts were rewritten to match the slots.
    pub repaired: bool,
}

/// Abstract interface for note storage.
///
/// Every call re-reads the header of the file it touches; nothing is cached
/// between calls.
pub trait DataStore {
    /// Append a note, returning it with the updated header
    fn create_note(&mut self, target: &Target, text: &str) -> Result<(Note, FileHeader)>;

    /// Get a live note by id
    fn read_note(&self, target: &Target, id: i64) -> Result<Note>;

    /// List the live notes of a file, with its header
    fn list_notes(&self, target: &Target, order: Order) -> Result<(FileHeader, Vec<Note>)>;

    /// Tombstone a note, returning the updated header
    fn delete_note(&mut self, target: &Target, id: i64) -> Result<FileHeader>;

    /// Create an empty group. Fails if it already exists.
    fn create_group(&mut self, name: &str, description: &str) -> Result<FileHeader>;

    /// Header of a single group
    fn describe_group(&self, name: &str) -> Result<FileHeader>;

    /// All groups, by name, without the default store
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Remove a group file entirely
    fn delete_group(&mut self, name: &str) -> Result<()>;

    /// Compare a file's header against its slots and fix the counts
    fn doctor(&mut self, target: &Target) -> Result<DoctorReport>;
}

/// Naming rules shared by every store: which file a target lives in and
/// which files count as groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    file_ext: String,
    default_name: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_EXT, DEFAULT_STORE_NAME)
    }
}

impl StoreLayout {
    pub fn new(file_ext: &str, default_name: &str) -> Self {
        Self {
            file_ext: file_ext.trim_start_matches('.').to_string(),
            default_name: default_name.to_string(),
        }
    }

    pub fn file_name(&self, target: &Target) -> String {
        match target {
            Target::Default => format!("{}.{}", self.default_name, self.file_ext),
            Target::Group(name) => format!("{}.{}", name, self.file_ext),
        }
    }

    /// The group a file name belongs to, or `None` for the default store and
    /// anything without the store extension.
    pub fn group_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        if ext != self.file_ext || stem.is_empty() || stem == self.default_name {
            return None;
        }
        Some(stem)
    }

    /// Group names become file names, so they are checked rather than clipped.
    pub fn validate_group_name(&self, name: &str) -> Result<()> {
        let reason = if name.trim().is_empty() {
            Some("name cannot be empty")
        } else if name.chars().count() > crate::codec::TITLE_CAPACITY {
            Some("name is longer than 20 characters")
        } else if name.starts_with('.') || name.contains(['/', '\\', '\0']) {
            Some("name cannot start with a dot or contain path separators")
        } else if name == self.default_name {
            Some("name is reserved for the default store")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(KeepError::InvalidName(format!("'{}': {}", name, reason))),
            None => Ok(()),
        }
    }

    /// Seed header for a file that turns out to be empty when opened.
    pub fn seed_header(&self, target: &Target, now: i64) -> FileHeader {
        match target {
            Target::Default => FileHeader::default_store(now),
            Target::Group(name) => FileHeader::new(name, "", now),
        }
    }
}

/// Rewrites header counts that disagree with the slots they describe.
///
/// `size` must equal the live count, and `size_all_time` can never be below
/// the number of slots (every slot was once an issued id) or the highest
/// live id. Returns whether anything changed.
pub(crate) fn reconcile(header: &mut FileHeader, scan: &SlotScan, now: i64) -> bool {
    let mut changed = false;
    if header.size != scan.live {
        header.size = scan.live;
        changed = true;
    }
    let issued = scan.slots.max(scan.highest_id.max(0) as u64);
    let issued = u32::try_from(issued).unwrap_or(u32::MAX);
    if header.size_all_time < issued {
        header.size_all_time = issued;
        changed = true;
    }
    if changed {
        header.updated_at = now;
    }
    changed
}

/// Maps a missing-file error onto the group the caller asked for.
pub(crate) fn group_not_found(name: &str) -> impl FnOnce(KeepError) -> KeepError + '_ {
    move |e| match e {
        KeepError::NotFound(_) => KeepError::NotFound(format!("no group named '{}'", name)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_target() {
        let layout = StoreLayout::new(".kps", "keeps");
        assert_eq!(layout.file_name(&Target::Default), "keeps.kps");
        assert_eq!(layout.file_name(&Target::Group("work".into())), "work.kps");
    }

    #[test]
    fn group_name_skips_default_and_foreign_files() {
        let layout = StoreLayout::default();
        assert_eq!(layout.group_name("work.kps"), Some("work"));
        assert_eq!(layout.group_name("keeps.kps"), None);
        assert_eq!(layout.group_name("config.json"), None);
        assert_eq!(layout.group_name("kps"), None);
        assert_eq!(layout.group_name(".kps"), None);
    }

    #[test]
    fn validates_group_names() {
        let layout = StoreLayout::default();
        assert!(layout.validate_group_name("work").is_ok());
        assert!(layout.validate_group_name("café").is_ok());
        for bad in ["", "  ", "../etc", "a/b", ".hidden", "keeps", "abcdefghijklmnopqrstu"] {
            assert!(
                matches!(layout.validate_group_name(bad), Err(KeepError::InvalidName(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn reconcile_fixes_drifted_counts() {
        let mut header = FileHeader::new("work", "", 0);
        header.size = 5;
        header.size_all_time = 2;
        let scan = SlotScan {
            slots: 4,
            live: 3,
            highest_id: 4,
            trailing_bytes: 0,
        };

        assert!(reconcile(&mut header, &scan, 9));
        assert_eq!(header.size, 3);
        assert_eq!(header.size_all_time, 4);
        assert_eq!(header.updated_at, 9);
        assert!(!reconcile(&mut header, &scan, 10));
        assert_eq!(header.updated_at, 9);
    }
}
