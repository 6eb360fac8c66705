use log::{info, warn};
use std::fs::{self, File};
use std::path::PathBuf;

use super::groups;
use super::records;
use super::{group_not_found, reconcile, DataStore, DoctorReport, StoreLayout};
use crate::error::{KeepError, Result};
use crate::header;
use crate::model::{now_millis, random_color, FileHeader, Group, Note, Order, Target};

/// Production storage: one binary file per group under a base directory.
///
/// Each call opens its own handle and lets it drop on the way out, success
/// or not.
pub struct FileStore {
    root: PathBuf,
    layout: StoreLayout,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            layout: StoreLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: StoreLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn path_for(&self, target: &Target) -> PathBuf {
        self.root.join(self.layout.file_name(target))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(KeepError::Io)?;
        }
        Ok(())
    }

    /// Opens the file behind `target`. The default store is created on first
    /// use; a group has to exist already.
    fn open(&self, target: &Target) -> Result<(FileHeader, File)> {
        let path = self.path_for(target);
        let seed = self.layout.seed_header(target, now_millis());
        match target {
            Target::Default => {
                self.ensure_dir()?;
                header::open(&path, seed)
            }
            Target::Group(name) => {
                self.layout.validate_group_name(name)?;
                header::open_existing(&path, seed).map_err(group_not_found(name))
            }
        }
    }
}

impl DataStore for FileStore {
    fn create_note(&mut self, target: &Target, text: &str) -> Result<(Note, FileHeader)> {
        let (mut header, mut file) = self.open(target)?;
        let note = records::append(&mut file, &mut header, text, random_color(), now_millis())?;
        info!(
            "event=note_create module=store status=ok target={} id={}",
            target, note.id
        );
        Ok((note, header))
    }

    fn read_note(&self, target: &Target, id: i64) -> Result<Note> {
        let (_, mut file) = self.open(target)?;
        records::read_by_id(&mut file, id)
    }

    fn list_notes(&self, target: &Target, order: Order) -> Result<(FileHeader, Vec<Note>)> {
        let (header, mut file) = self.open(target)?;
        let notes = records::list(&mut file, order)?;
        Ok((header, notes))
    }

    fn delete_note(&mut self, target: &Target, id: i64) -> Result<FileHeader> {
        let (mut header, mut file) = self.open(target)?;
        records::delete_by_id(&mut file, &mut header, id, now_millis())?;
        info!(
            "event=note_delete module=store status=ok target={} id={}",
            target, id
        );
        Ok(header)
    }

    fn create_group(&mut self, name: &str, description: &str) -> Result<FileHeader> {
        self.ensure_dir()?;
        groups::create_group(&self.root, &self.layout, name, description, now_millis())
    }

    fn describe_group(&self, name: &str) -> Result<FileHeader> {
        groups::describe_group(&self.root, &self.layout, name)
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        groups::list_groups(&self.root, &self.layout)
    }

    fn delete_group(&mut self, name: &str) -> Result<()> {
        groups::delete_group(&self.root, &self.layout, name)
    }

    fn doctor(&mut self, target: &Target) -> Result<DoctorReport> {
        let (mut header, mut file) = self.open(target)?;
        let scan = records::scan(&mut file)?;
        if scan.trailing_bytes > 0 {
            warn!(
                "event=doctor module=store status=warn target={} trailing_bytes={}",
                target, scan.trailing_bytes
            );
        }

        let repaired = reconcile(&mut header, &scan, now_millis());
        if repaired {
            header::save(&mut file, &header)?;
            info!(
                "event=doctor module=store status=repaired target={} size={} size_all_time={}",
                target, header.size, header.size_all_time
            );
        }

        Ok(DoctorReport {
            header,
            scan,
            repaired,
        })
    }
}
