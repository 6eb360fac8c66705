//! # Record Codec
//!
//! Fixed-width binary layout for the two record kinds a store file holds.
//! Every multi-byte integer is big-endian.
//!
//! ```text
//! FileHeader (HEADER_SIZE = 904)
//!   title          20 x u32 code points, zero padded     80
//!   description   200 x u32 code points, zero padded    800
//!   size           u32                                     4
//!   size_all_time  u32                                     4
//!   created_at     i64 (unix ms)                           8
//!   updated_at     i64 (unix ms)                           8
//!
//! Note (NOTE_SIZE = 117)
//!   id             i64                                     8
//!   text           utf-8, zero padded                    100
//!   color          i8                                      1
//!   created_at     i64 (unix ms)                           8
//! ```
//!
//! Text longer than its field is truncated silently on encode. Sizes are
//! fixed at compile time and there is no format version: a reader built
//! with different capacities will misread every offset.

use std::io::{ErrorKind, Read};

use crate::error::{KeepError, Result};
use crate::model::{FileHeader, Note};

pub const TITLE_CAPACITY: usize = 20;
pub const DESCRIPTION_CAPACITY: usize = 200;
pub const NOTE_TEXT_CAPACITY: usize = 100;

const CODE_POINT_WIDTH: usize = 4;

pub const HEADER_SIZE: usize =
    (TITLE_CAPACITY + DESCRIPTION_CAPACITY) * CODE_POINT_WIDTH + 4 + 4 + 8 + 8;
pub const NOTE_SIZE: usize = 8 + NOTE_TEXT_CAPACITY + 1 + 8;

/// Result of pulling one fixed-size record off a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The buffer was filled completely.
    Full,
    /// The stream was already exhausted; nothing was read.
    Eof,
}

pub fn encode_header(header: &FileHeader) -> [u8; HEADER_SIZE] {
    let mut buf = [0u8; HEADER_SIZE];
    let mut w = Writer::new(&mut buf);
    w.put_code_points(&header.title, TITLE_CAPACITY);
    w.put_code_points(&header.description, DESCRIPTION_CAPACITY);
    w.put(&header.size.to_be_bytes());
    w.put(&header.size_all_time.to_be_bytes());
    w.put(&header.created_at.to_be_bytes());
    w.put(&header.updated_at.to_be_bytes());
    buf
}

pub fn decode_header(bytes: &[u8]) -> Result<FileHeader> {
    check_len(bytes, HEADER_SIZE)?;
    let mut r = Reader::new(bytes);
    Ok(FileHeader {
        title: r.code_points(TITLE_CAPACITY),
        description: r.code_points(DESCRIPTION_CAPACITY),
        size: u32::from_be_bytes(r.array()),
        size_all_time: u32::from_be_bytes(r.array()),
        created_at: i64::from_be_bytes(r.array()),
        updated_at: i64::from_be_bytes(r.array()),
    })
}

pub fn encode_note(note: &Note) -> [u8; NOTE_SIZE] {
    let mut buf = [0u8; NOTE_SIZE];
    let mut w = Writer::new(&mut buf);
    w.put(&note.id.to_be_bytes());
    w.put_padded(clip_bytes(&note.text, NOTE_TEXT_CAPACITY).as_bytes(), NOTE_TEXT_CAPACITY);
    w.put(&note.color.to_be_bytes());
    w.put(&note.created_at.to_be_bytes());
    buf
}

pub fn decode_note(bytes: &[u8]) -> Result<Note> {
    check_len(bytes, NOTE_SIZE)?;
    let mut r = Reader::new(bytes);
    Ok(Note {
        id: i64::from_be_bytes(r.array()),
        text: r.padded_utf8(NOTE_TEXT_CAPACITY),
        color: i8::from_be_bytes(r.array()),
        created_at: i64::from_be_bytes(r.array()),
    })
}

/// Fills `buf` from `reader`.
///
/// Zero bytes available is a clean end of stream (`Eof`); running dry part
/// way through the buffer is a `ShortRead`.
pub fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(KeepError::Io(e)),
        }
    }

    match filled {
        0 => Ok(ReadOutcome::Eof),
        n if n == buf.len() => Ok(ReadOutcome::Full),
        n => Err(KeepError::ShortRead {
            expected: buf.len(),
            read: n,
        }),
    }
}

/// Longest prefix of `s` that fits in `capacity` bytes without splitting a character.
pub fn clip_bytes(s: &str, capacity: usize) -> &str {
    if s.len() <= capacity {
        return s;
    }
    let mut end = capacity;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// The first `capacity` characters of `s`.
pub fn clip_chars(s: &str, capacity: usize) -> &str {
    match s.char_indices().nth(capacity) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

fn check_len(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() < expected {
        return Err(KeepError::ShortRead {
            expected,
            read: bytes.len(),
        });
    }
    Ok(())
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Writes `bytes` then zero-fills up to `width`. The buffer starts zeroed.
    fn put_padded(&mut self, bytes: &[u8], width: usize) {
        let n = bytes.len().min(width);
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += width;
    }

    fn put_code_points(&mut self, s: &str, capacity: usize) {
        let start = self.pos;
        for c in s.chars().take(capacity) {
            self.put(&u32::from(c).to_be_bytes());
        }
        self.pos = start + capacity * CODE_POINT_WIDTH;
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N));
        out
    }

    fn padded_utf8(&mut self, width: usize) -> String {
        let field = self.take(width);
        let end = field.iter().position(|&b| b == 0).unwrap_or(width);
        String::from_utf8_lossy(&field[..end]).into_owned()
    }

    fn code_points(&mut self, capacity: usize) -> String {
        self.take(capacity * CODE_POINT_WIDTH)
            .chunks_exact(CODE_POINT_WIDTH)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .take_while(|&cp| cp != 0)
            .map(|cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}
