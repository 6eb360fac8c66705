use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short read: expected {expected} bytes, got {read}")]
    ShortRead { expected: usize, read: usize },

    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    #[error("Corrupt record at offset {offset}")]
    CorruptRecord { offset: u64 },

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid group name: {0}")]
    InvalidName(String),

    #[error("Malformed content: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KeepError>;
