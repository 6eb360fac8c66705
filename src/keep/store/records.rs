//! # Offset-Addressed Records
//!
//! Note slots follow the header back to back, so a note id maps straight to
//! a byte offset:
//!
//! ```text
//! offset(id) = HEADER_SIZE + NOTE_SIZE * (id - 1)
//! ```
//!
//! Ids come from the header's all-time counter and are never reused. A
//! deleted note keeps its slot; the slot is overwritten with a tombstone
//! (`id = -1`) and skipped by listings. Nothing is ever compacted, since that
//! would move every later id.
//!
//! All functions take the header by value or `&mut` and persist it at most
//! once per call. Reads need only `Read + Seek`, so listings can run over a
//! borrowed byte slice.

use log::debug;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::codec::{decode_note, encode_note, read_record, ReadOutcome, HEADER_SIZE, NOTE_SIZE};
use crate::error::{KeepError, Result};
use crate::header;
use crate::model::{FileHeader, Note, Order};

/// Byte offset of the slot holding note `id`.
pub fn note_offset(id: i64) -> Result<u64> {
    if id < 1 {
        return Err(KeepError::InvalidId(format!("{} (ids start at 1)", id)));
    }
    (id as u64 - 1)
        .checked_mul(NOTE_SIZE as u64)
        .and_then(|n| n.checked_add(HEADER_SIZE as u64))
        .ok_or_else(|| KeepError::InvalidId(format!("{} is out of range", id)))
}

/// Appends a note holding `text` and persists the updated header.
///
/// The new id is `size_all_time + 1`, so deleted ids are never handed out
/// again. The write lands at end-of-file, which must be exactly the slot for
/// the new id; anything else means the file and its header disagree.
pub fn append<H: Read + Write + Seek>(
    handle: &mut H,
    header: &mut FileHeader,
    text: &str,
    color: i8,
    now: i64,
) -> Result<Note> {
    let next_all_time = header
        .size_all_time
        .checked_add(1)
        .ok_or_else(|| KeepError::InvalidId("id space exhausted".to_string()))?;
    let note = Note::new(header.next_id(), text, color, now);
    let expected = note_offset(note.id)?;

    let end = handle.seek(SeekFrom::End(0))?;
    if end != expected {
        return Err(KeepError::CorruptRecord { offset: end });
    }
    handle.write_all(&encode_note(&note))?;

    header.size += 1;
    header.size_all_time = next_all_time;
    header.updated_at = now;
    header::save(handle, header)?;

    debug!(
        "event=note_append module=records status=ok id={} offset={}",
        note.id, expected
    );
    Ok(note)
}

/// Reads the live note stored under `id`.
///
/// Fails with `InvalidId` when `id < 1`, when the slot lies past the end of
/// the file, or when the slot holds a different id (a tombstone, or a header
/// that disagrees with its records).
pub fn read_by_id<R: Read + Seek>(handle: &mut R, id: i64) -> Result<Note> {
    let offset = note_offset(id)?;
    handle.seek(SeekFrom::Start(offset))?;

    let mut buf = [0u8; NOTE_SIZE];
    match read_record(handle, &mut buf) {
        Ok(ReadOutcome::Full) => {}
        Ok(ReadOutcome::Eof) => {
            return Err(KeepError::InvalidId(format!("{} not found", id)));
        }
        Err(KeepError::ShortRead { .. }) => return Err(KeepError::CorruptRecord { offset }),
        Err(e) => return Err(e),
    }

    let note = decode_note(&buf)?;
    if note.id != id {
        return Err(KeepError::InvalidId(format!("{} not found", id)));
    }
    Ok(note)
}

/// Tombstones note `id` and persists the updated header.
///
/// `size` drops by one; `size_all_time` is left alone.
pub fn delete_by_id<H: Read + Write + Seek>(
    handle: &mut H,
    header: &mut FileHeader,
    id: i64,
    now: i64,
) -> Result<()> {
    read_by_id(handle, id)?;
    let offset = note_offset(id)?;

    handle.seek(SeekFrom::Start(offset))?;
    handle.write_all(&encode_note(&Note::tombstone()))?;

    header.size = header.size.saturating_sub(1);
    header.updated_at = now;
    header::save(handle, header)?;

    debug!(
        "event=note_delete module=records status=ok id={} offset={}",
        id, offset
    );
    Ok(())
}

/// Streams the live notes in slot order.
///
/// The iterator is one-shot: it walks the handle forward from just past the
/// header and stops at the first clean end-of-file. A slot cut short yields
/// a single `CorruptRecord` and ends the iteration.
pub fn read_all<R: Read + Seek>(handle: &mut R) -> Result<NoteIter<'_, R>> {
    handle.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
    Ok(NoteIter {
        handle,
        offset: HEADER_SIZE as u64,
        done: false,
    })
}

/// Collects the live notes. `Descending` buffers the whole file before
/// reversing it.
pub fn list<R: Read + Seek>(handle: &mut R, order: Order) -> Result<Vec<Note>> {
    let mut notes = read_all(handle)?.collect::<Result<Vec<_>>>()?;
    if order == Order::Descending {
        notes.reverse();
    }
    Ok(notes)
}

pub struct NoteIter<'a, R> {
    handle: &'a mut R,
    offset: u64,
    done: bool,
}

impl<R: Read + Seek> Iterator for NoteIter<'_, R> {
    type Item = Result<Note>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let mut buf = [0u8; NOTE_SIZE];
            match read_record(&mut *self.handle, &mut buf) {
                Ok(ReadOutcome::Eof) => self.done = true,
                Ok(ReadOutcome::Full) => {
                    self.offset += NOTE_SIZE as u64;
                    match decode_note(&buf) {
                        Ok(note) if note.is_live() => return Some(Ok(note)),
                        Ok(_) => continue,
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    }
                }
                Err(KeepError::ShortRead { .. }) => {
                    self.done = true;
                    return Some(Err(KeepError::CorruptRecord {
                        offset: self.offset,
                    }));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// What the slots of a file actually hold, independent of its header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SlotScan {
    pub slots: u64,
    pub live: u32,
    pub highest_id: i64,
    /// Bytes after the last whole slot.
    pub trailing_bytes: u64,
}

/// Walks every slot, counting live notes and tombstones.
pub fn scan<R: Read + Seek>(handle: &mut R) -> Result<SlotScan> {
    let end = handle.seek(SeekFrom::End(0))?;
    let body = end.saturating_sub(HEADER_SIZE as u64);
    let mut scan = SlotScan {
        slots: body / NOTE_SIZE as u64,
        trailing_bytes: body % NOTE_SIZE as u64,
        ..SlotScan::default()
    };

    handle.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
    let mut buf = [0u8; NOTE_SIZE];
    for _ in 0..scan.slots {
        if read_record(handle, &mut buf)? != ReadOutcome::Full {
            break;
        }
        let note = decode_note(&buf)?;
        if note.is_live() {
            scan.live += 1;
            scan.highest_id = scan.highest_id.max(note.id);
        }
    }
    Ok(scan)
}
