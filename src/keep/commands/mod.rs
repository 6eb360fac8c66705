use crate::config::KeepConfig;
use crate::model::{FileHeader, Group, Note};
use crate::store::DoctorReport;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod groups;
pub mod init;
pub mod list;
pub mod view;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_notes: Vec<Note>,
    pub listed_notes: Vec<Note>,
    pub groups: Vec<Group>,
    pub header: Option<FileHeader>,
    pub config: Option<KeepConfig>,
    pub doctor: Option<DoctorReport>,
    pub store_root: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_notes(mut self, notes: Vec<Note>) -> Self {
        self.listed_notes = notes;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_header(mut self, header: FileHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_config(mut self, config: KeepConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_doctor(mut self, report: DoctorReport) -> Self {
        self.doctor = Some(report);
        self
    }
}

/// Drops repeated ids, keeping first-seen order.
pub(crate) fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
