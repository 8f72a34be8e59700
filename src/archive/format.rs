//! Binary layout shared by the encoder and decoder
//!
//! ```text
//! Archive := zstd(PACKING_LEVEL) {
//!     file_count: u32
//!     Frame[file_count]
//! }
//! Frame := { payload_len: u64, payload: [u8; payload_len] }
//! ```
//!
//! Each payload is an entry record passed through the per-entry codec:
//!
//! ```text
//! path_len: u16 | path | mode: u32 | modified: u64 | crc32: u32 | content_len: u64 | content
//! ```
//!
//! All integers are little-endian with no padding.

use crate::archive::entry::FileEntry;
use crate::error::{PackError, Result};
use std::io::{Cursor, Read, Write};

/// zstd level of the outer container stream, independent of entry quality
pub const PACKING_LEVEL: i32 = 6;

/// Size of the file count field
pub const COUNT_FIELD_SIZE: usize = 4;

/// Size of each frame's payload length field
pub const LENGTH_FIELD_SIZE: usize = 8;

/// Largest file count the count field can carry
pub const MAX_FILE_COUNT: u32 = u32::MAX;

/// Maximum path length in bytes (UTF-8)
pub const MAX_PATH_LENGTH: usize = u16::MAX as usize;

/// Fixed part of an entry record, excluding path and content bytes
pub const RECORD_FIXED_SIZE: usize = 2 + 4 + 8 + 4 + 8;

/// Convert a file list length into the count field, rejecting overflow
pub fn file_count(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| PackError::TooManyFiles(len))
}

/// Serialize an entry into its uncompressed record
pub fn encode_record(entry: &FileEntry) -> Result<Vec<u8>> {
    let path_bytes = entry.path.as_bytes();
    if path_bytes.len() > MAX_PATH_LENGTH {
        return Err(PackError::PathTooLong(path_bytes.len()));
    }

    let mut record =
        Vec::with_capacity(RECORD_FIXED_SIZE + path_bytes.len() + entry.content.len());
    record.write_all(&(path_bytes.len() as u16).to_le_bytes())?;
    record.write_all(path_bytes)?;
    record.write_all(&entry.mode.to_le_bytes())?;
    record.write_all(&entry.modified.to_le_bytes())?;
    record.write_all(&crc32fast::hash(&entry.content).to_le_bytes())?;
    record.write_all(&entry.size().to_le_bytes())?;
    record.write_all(&entry.content)?;

    Ok(record)
}

/// Rebuild an entry from its uncompressed record
pub fn decode_record(record: &[u8]) -> Result<FileEntry> {
    let mut cursor = Cursor::new(record);

    let path_len = read_u16(&mut cursor).map_err(truncated("path length"))? as usize;
    let mut path_buf = vec![0u8; path_len];
    cursor
        .read_exact(&mut path_buf)
        .map_err(truncated("path"))?;
    let path = String::from_utf8(path_buf)?;

    let mode = read_u32(&mut cursor).map_err(truncated("mode"))?;
    let modified = read_u64(&mut cursor).map_err(truncated("modification time"))?;
    let crc32 = read_u32(&mut cursor).map_err(truncated("checksum"))?;
    let content_len = read_u64(&mut cursor).map_err(truncated("content length"))?;

    let remaining = (record.len() as u64).saturating_sub(cursor.position());
    if content_len != remaining {
        return Err(PackError::InvalidRecord(format!(
            "content of {} declares {} bytes, record holds {}",
            path, content_len, remaining
        )));
    }

    let start = cursor.position() as usize;
    let content = record[start..].to_vec();

    let actual = crc32fast::hash(&content);
    if actual != crc32 {
        return Err(PackError::CrcMismatch {
            path,
            expected: crc32,
            actual,
        });
    }

    Ok(FileEntry {
        path,
        content,
        mode,
        modified,
    })
}

fn truncated(field: &'static str) -> impl Fn(std::io::Error) -> PackError {
    move |_| PackError::InvalidRecord(format!("record truncated in {}", field))
}

// Helper functions for reading primitive types
pub(crate) fn read_u16<R: Read>(mut reader: R) -> std::io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn read_u32<R: Read>(mut reader: R) -> std::io::Result<u32> {
    let mut buf = [0u8; COUNT_FIELD_SIZE];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(mut reader: R) -> std::io::Result<u64> {
    let mut buf = [0u8; LENGTH_FIELD_SIZE];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
