use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use crate::codec::{
    clip_bytes, clip_chars, DESCRIPTION_CAPACITY, NOTE_TEXT_CAPACITY, TITLE_CAPACITY,
};

/// Id written into a slot when its note is deleted. Live ids are always positive.
pub const TOMBSTONE_ID: i64 = -1;

pub const DEFAULT_STORE_TITLE: &str = "default";
pub const DEFAULT_STORE_DESCRIPTION: &str =
    "this is the default note group - notes with no group given will be stored here";

/// ANSI foreground codes a note may be tagged with.
pub const PALETTE: [i8; 5] = [36, 31, 32, 34, 33];

/// Which store file an operation addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Default,
    Group(String),
}

impl Target {
    pub fn from_group(group: Option<String>) -> Self {
        match group {
            Some(name) => Target::Group(name),
            None => Target::Default,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Default => write!(f, "{}", DEFAULT_STORE_TITLE),
            Target::Group(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub text: String,
    pub color: i8,
    /// Unix milliseconds
    pub created_at: i64,
}

impl Note {
    /// Builds a note, clipping `text` to what a record slot can hold.
    pub fn new(id: i64, text: &str, color: i8, created_at: i64) -> Self {
        Self {
            id,
            text: clip_bytes(text, NOTE_TEXT_CAPACITY).to_string(),
            color,
            created_at,
        }
    }

    pub fn tombstone() -> Self {
        Self {
            id: TOMBSTONE_ID,
            text: String::new(),
            color: 0,
            created_at: 0,
        }
    }

    pub fn is_live(&self) -> bool {
        self.id > 0
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub title: String,
    pub description: String,
    /// Live notes in the file
    pub size: u32,
    /// Notes ever appended; the next id is `size_all_time + 1`
    pub size_all_time: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FileHeader {
    pub fn new(title: &str, description: &str, now: i64) -> Self {
        Self {
            title: clip_chars(title, TITLE_CAPACITY).to_string(),
            description: clip_chars(description, DESCRIPTION_CAPACITY).to_string(),
            size: 0,
            size_all_time: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Header written the first time the ungrouped store is opened.
    pub fn default_store(now: i64) -> Self {
        Self::new(DEFAULT_STORE_TITLE, DEFAULT_STORE_DESCRIPTION, now)
    }

    pub fn next_id(&self) -> i64 {
        i64::from(self.size_all_time) + 1
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }
}

/// A group as shown in listings: the file stem plus its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub header: FileHeader,
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn random_color() -> i8 {
    PALETTE[rand::thread_rng().gen_range(0..PALETTE.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_clips_long_text() {
        let text = "x".repeat(NOTE_TEXT_CAPACITY + 20);
        let note = Note::new(1, &text, 31, 0);
        assert_eq!(note.text.len(), NOTE_TEXT_CAPACITY);
    }

    #[test]
    fn tombstone_is_not_live() {
        assert!(!Note::tombstone().is_live());
        assert!(Note::new(1, "a", 31, 0).is_live());
    }

    #[test]
    fn next_id_follows_all_time_count() {
        let mut header = FileHeader::new("work", "", 0);
        header.size_all_time = 4;
        header.size = 1;
        assert_eq!(header.next_id(), 5);
    }

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..50 {
            assert!(PALETTE.contains(&random_color()));
        }
    }

    #[test]
    fn target_from_group() {
        assert_eq!(Target::from_group(None), Target::Default);
        assert_eq!(
            Target::from_group(Some("work".into())),
            Target::Group("work".into())
        );
    }
}
