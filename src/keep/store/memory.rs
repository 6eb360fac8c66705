use log::warn;
use std::collections::HashMap;
use std::io::Cursor;

use super::records;
use super::{group_not_found, reconcile, DataStore, DoctorReport, StoreLayout};
use crate::error::{KeepError, Result};
use crate::header;
use crate::model::{now_millis, random_color, FileHeader, Group, Note, Order, Target};

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Files are plain byte buffers keyed by file name, driven through the same
/// header and record functions as [`super::fs::FileStore`].
#[derive(Default)]
pub struct InMemoryStore {
    files: HashMap<String, Vec<u8>>,
    layout: StoreLayout,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn file_key(&self, target: &Target) -> Result<String> {
        if let Target::Group(name) = target {
            self.layout.validate_group_name(name)?;
        }
        Ok(self.layout.file_name(target))
    }

    /// Runs `op` against the file behind `target` with its header loaded.
    /// The default store springs into existence here; groups must exist.
    fn with_file<T>(
        &mut self,
        target: &Target,
        op: impl FnOnce(&mut Cursor<Vec<u8>>, &mut FileHeader) -> Result<T>,
    ) -> Result<T> {
        let key = self.file_key(target)?;
        let seed = self.layout.seed_header(target, now_millis());
        let bytes = match target {
            Target::Default => self.files.entry(key).or_default(),
            Target::Group(name) => self
                .files
                .get_mut(&key)
                .ok_or_else(|| group_not_found(name)(KeepError::NotFound(key.clone())))?,
        };

        let mut cursor = Cursor::new(std::mem::take(bytes));
        let result =
            header::load_or_init(&mut cursor, seed).and_then(|mut h| op(&mut cursor, &mut h));
        *bytes = cursor.into_inner();
        result
    }

    /// Read-only view of the file behind `target`. A default store that was
    /// never written reads as empty.
    fn read_file<T>(
        &self,
        target: &Target,
        op: impl FnOnce(&mut Cursor<&[u8]>, FileHeader) -> Result<T>,
    ) -> Result<T> {
        let key = self.file_key(target)?;
        let bytes: &[u8] = match (self.files.get(&key), target) {
            (Some(bytes), _) => bytes.as_slice(),
            (None, Target::Default) => &[],
            (None, Target::Group(name)) => {
                return Err(group_not_found(name)(KeepError::NotFound(key)));
            }
        };

        let mut cursor = Cursor::new(bytes);
        let header = match header::load(&mut cursor)? {
            Some(header) => header,
            None => self.layout.seed_header(target, now_millis()),
        };
        op(&mut cursor, header)
    }
}

impl DataStore for InMemoryStore {
    fn create_note(&mut self, target: &Target, text: &str) -> Result<(Note, FileHeader)> {
        self.with_file(target, |file, header| {
            let note = records::append(file, header, text, random_color(), now_millis())?;
            Ok((note, header.clone()))
        })
    }

    fn read_note(&self, target: &Target, id: i64) -> Result<Note> {
        self.read_file(target, |file, _| records::read_by_id(file, id))
    }

    fn list_notes(&self, target: &Target, order: Order) -> Result<(FileHeader, Vec<Note>)> {
        self.read_file(target, |file, header| {
            let notes = records::list(file, order)?;
            Ok((header, notes))
        })
    }

    fn delete_note(&mut self, target: &Target, id: i64) -> Result<FileHeader> {
        self.with_file(target, |file, header| {
            records::delete_by_id(file, header, id, now_millis())?;
            Ok(header.clone())
        })
    }

    fn create_group(&mut self, name: &str, description: &str) -> Result<FileHeader> {
        self.layout.validate_group_name(name)?;
        let key = self.layout.file_name(&Target::Group(name.to_string()));
        if self.files.contains_key(&key) {
            return Err(KeepError::AlreadyExists(format!(
                "group '{}' already exists",
                name
            )));
        }

        let header = FileHeader::new(name, description, now_millis());
        let mut cursor = Cursor::new(Vec::new());
        header::save(&mut cursor, &header)?;
        self.files.insert(key, cursor.into_inner());
        Ok(header)
    }

    fn describe_group(&self, name: &str) -> Result<FileHeader> {
        self.read_file(&Target::Group(name.to_string()), |_, header| Ok(header))
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        for (file_name, bytes) in &self.files {
            let Some(name) = self.layout.group_name(file_name) else {
                continue;
            };
            let header = match header::load(&mut Cursor::new(bytes.as_slice())) {
                Ok(Some(header)) => header,
                Ok(None) => self
                    .layout
                    .seed_header(&Target::Group(name.to_string()), now_millis()),
                Err(e) => {
                    warn!(
                        "event=group_skip module=memory status=error file={} error={}",
                        file_name, e
                    );
                    continue;
                }
            };
            groups.push(Group {
                name: name.to_string(),
                header,
            });
        }
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    fn delete_group(&mut self, name: &str) -> Result<()> {
        let key = self.file_key(&Target::Group(name.to_string()))?;
        self.files
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| KeepError::NotFound(format!("no group named '{}'", name)))
    }

    fn doctor(&mut self, target: &Target) -> Result<DoctorReport> {
        self.with_file(target, |file, header| {
            let scan = records::scan(file)?;
            let repaired = reconcile(header, &scan, now_millis());
            if repaired {
                header::save(file, header)?;
            }
            Ok(DoctorReport {
                header: header.clone(),
                scan,
                repaired,
            })
        })
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_group(mut self, name: &str) -> Self {
            self.store
                .create_group(name, &format!("{} notes", name))
                .unwrap();
            self
        }

        pub fn with_notes(mut self, count: usize, target: &Target) -> Self {
            for i in 0..count {
                self.store
                    .create_note(target, &format!("Note {}", i + 1))
                    .unwrap();
            }
            self
        }
    }
}
