//! # File Header Manager
//!
//! Every store file starts with one [`FileHeader`] at offset 0. This module
//! loads it (initializing empty files), and writes it back in place after a
//! mutation. The header is never cached: each operation reads it fresh and
//! callers thread the value through explicitly, saving it once per logical
//! operation.
//!
//! The generic functions work on any seekable handle so the in-memory store
//! shares them; the `open*` helpers wrap them for real files.

use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::codec::{decode_header, encode_header, read_record, ReadOutcome, HEADER_SIZE};
use crate::error::{KeepError, Result};
use crate::model::FileHeader;

/// Reads the header at offset 0.
///
/// Returns `Ok(None)` for an empty handle, which needs initializing rather
/// than being corrupt.
pub fn load<R: Read + Seek>(handle: &mut R) -> Result<Option<FileHeader>> {
    handle.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; HEADER_SIZE];
    match read_record(handle, &mut buf) {
        Ok(ReadOutcome::Eof) => Ok(None),
        Ok(ReadOutcome::Full) => decode_header(&buf).map(Some),
        Err(KeepError::ShortRead { expected, read }) => Err(KeepError::CorruptHeader(format!(
            "expected {} bytes, found {}",
            expected, read
        ))),
        Err(e) => Err(e),
    }
}

/// Overwrites the header at offset 0.
pub fn save<W: Write + Seek>(handle: &mut W, header: &FileHeader) -> Result<()> {
    handle.seek(SeekFrom::Start(0))?;
    handle.write_all(&encode_header(header))?;
    handle.flush()?;
    debug!(
        "event=header_save module=header status=ok size={} size_all_time={}",
        header.size, header.size_all_time
    );
    Ok(())
}

/// Loads the header, writing `seed` first if the handle is empty.
pub fn load_or_init<H: Read + Write + Seek>(
    handle: &mut H,
    seed: FileHeader,
) -> Result<FileHeader> {
    match load(handle)? {
        Some(header) => Ok(header),
        None => {
            save(handle, &seed)?;
            Ok(seed)
        }
    }
}

/// Opens `path` read/write, creating it with `seed` as its header if absent.
pub fn open(path: &Path, seed: FileHeader) -> Result<(FileHeader, File)> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    let header = load_or_init(&mut file, seed)?;
    Ok((header, file))
}

/// Opens an existing store file read/write. Fails with `NotFound` if absent.
pub fn open_existing(path: &Path, seed: FileHeader) -> Result<(FileHeader, File)> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| not_found_or_io(e, path))?;
    let header = load_or_init(&mut file, seed)?;
    Ok((header, file))
}

/// Creates a new store file holding only `header`. Fails with `AlreadyExists`
/// rather than touching a file that is already there.
pub fn create_new(path: &Path, header: &FileHeader) -> Result<File> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                KeepError::AlreadyExists(path.display().to_string())
            } else {
                KeepError::Io(e)
            }
        })?;
    save(&mut file, header)?;
    Ok(file)
}

/// Reads only the header of `path`, without opening it for writing. An
/// empty file reads as `seed`, the header it would get on first write.
pub fn read_only(path: &Path, seed: FileHeader) -> Result<FileHeader> {
    let mut file = File::open(path).map_err(|e| not_found_or_io(e, path))?;
    Ok(load(&mut file)?.unwrap_or(seed))
}

fn not_found_or_io(e: std::io::Error, path: &Path) -> KeepError {
    if e.kind() == ErrorKind::NotFound {
        KeepError::NotFound(path.display().to_string())
    } else {
        KeepError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn header(title: &str) -> FileHeader {
        FileHeader::new(title, "desc", 1_000)
    }

    #[test]
    fn load_empty_handle_needs_init() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(load(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn load_or_init_writes_seed_once() {
        let mut cursor = Cursor::new(Vec::new());
        let first = load_or_init(&mut cursor, header("one")).unwrap();
        assert_eq!(first.title, "one");
        assert_eq!(cursor.get_ref().len(), HEADER_SIZE);

        let second = load_or_init(&mut cursor, header("two")).unwrap();
        assert_eq!(second.title, "one");
        assert_eq!(cursor.get_ref().len(), HEADER_SIZE);
    }

    #[test]
    fn truncated_header_is_corrupt() {
        let mut cursor = Cursor::new(vec![0u8; HEADER_SIZE / 2]);
        assert!(matches!(load(&mut cursor), Err(KeepError::CorruptHeader(_))));
    }

    #[test]
    fn save_overwrites_in_place() {
        let mut cursor = Cursor::new(Vec::new());
        let mut h = load_or_init(&mut cursor, header("work")).unwrap();
        // bytes after the header must survive a header rewrite
        cursor.get_mut().extend_from_slice(&[7u8; 10]);

        h.size = 3;
        h.size_all_time = 5;
        save(&mut cursor, &h).unwrap();

        assert_eq!(cursor.get_ref().len(), HEADER_SIZE + 10);
        assert_eq!(&cursor.get_ref()[HEADER_SIZE..], &[7u8; 10]);
        assert_eq!(load(&mut cursor).unwrap(), Some(h));
    }

    #[test]
    fn open_creates_then_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keeps.kps");

        let (created, _file) = open(&path, header("default")).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), HEADER_SIZE as u64);

        let (reopened, _file) = open(&path, header("ignored")).unwrap();
        assert_eq!(reopened, created);
    }

    #[test]
    fn open_existing_requires_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.kps");
        assert!(matches!(
            open_existing(&path, header("missing")),
            Err(KeepError::NotFound(_))
        ));
    }

    #[test]
    fn create_new_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("work.kps");
        create_new(&path, &header("work")).unwrap();

        assert!(matches!(
            create_new(&path, &header("again")),
            Err(KeepError::AlreadyExists(_))
        ));
        assert_eq!(read_only(&path, header("seed")).unwrap().title, "work");
    }

    #[test]
    fn read_only_treats_empty_file_as_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.kps");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(read_only(&path, header("empty")).unwrap().title, "empty");
        // Reading never initializes the file
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn read_only_rejects_truncated_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.kps");
        std::fs::write(&path, vec![0u8; HEADER_SIZE - 1]).unwrap();
        assert!(matches!(
            read_only(&path, header("short")),
            Err(KeepError::CorruptHeader(_))
        ));
    }
}
