//! Per-entry compression
//!
//! Each frame payload is one entry record run through an [`EntryCodec`]. The
//! container framing never looks inside a payload, so any codec that can
//! recover the record (path included) can be plugged in.

use crate::archive::entry::FileEntry;
use crate::archive::format::{decode_record, encode_record};
use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-entry quality (zstd level)
pub const DEFAULT_QUALITY: i32 = 19;

/// Forward and inverse transform for a single archive entry
pub trait EntryCodec {
    /// Turn an entry into an opaque payload
    fn compress_entry(&self, entry: &FileEntry, quality: i32) -> Result<Vec<u8>>;

    /// Recover the entry, path included, from a payload
    fn decompress_entry(&self, payload: &[u8]) -> Result<FileEntry>;
}

impl<C: EntryCodec + ?Sized> EntryCodec for &C {
    fn compress_entry(&self, entry: &FileEntry, quality: i32) -> Result<Vec<u8>> {
        (**self).compress_entry(entry, quality)
    }

    fn decompress_entry(&self, payload: &[u8]) -> Result<FileEntry> {
        (**self).decompress_entry(payload)
    }
}

impl<C: EntryCodec + ?Sized> EntryCodec for Box<C> {
    fn compress_entry(&self, entry: &FileEntry, quality: i32) -> Result<Vec<u8>> {
        (**self).compress_entry(entry, quality)
    }

    fn decompress_entry(&self, payload: &[u8]) -> Result<FileEntry> {
        (**self).decompress_entry(payload)
    }
}

/// Built-in entry codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// Record stored as-is
    None,
    /// LZ4 block with prepended size, quality ignored
    Lz4,
    /// zstd frame at the requested level
    #[default]
    Zstd,
}

impl CompressionMethod {
    /// Check that `quality` means something for this method
    pub fn validate_quality(&self, quality: i32) -> Result<()> {
        match self {
            CompressionMethod::Zstd if !zstd::compression_level_range().contains(&quality) => {
                Err(PackError::InvalidQuality {
                    method: self.to_string(),
                    level: quality,
                })
            }
            _ => Ok(()),
        }
    }

    /// Compress with LZ4
    fn compress_lz4(data: &[u8]) -> Vec<u8> {
        lz4_flex::compress_prepend_size(data)
    }

    /// Compress with Zstd at the given level
    fn compress_zstd(data: &[u8], level: i32) -> Result<Vec<u8>> {
        zstd::encode_all(data, level)
            .map_err(|e| PackError::CompressionFailed(format!("Zstd compression failed: {}", e)))
    }

    fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>> {
        lz4_flex::decompress_size_prepended(data).map_err(|e| {
            PackError::DecompressionFailed(format!("LZ4 decompression failed: {}", e))
        })
    }

    fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
        zstd::decode_all(data).map_err(|e| {
            PackError::DecompressionFailed(format!("Zstd decompression failed: {}", e))
        })
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionMethod::None => "none",
            CompressionMethod::Lz4 => "lz4",
            CompressionMethod::Zstd => "zstd",
        };
        f.write_str(name)
    }
}

impl EntryCodec for CompressionMethod {
    fn compress_entry(&self, entry: &FileEntry, quality: i32) -> Result<Vec<u8>> {
        self.validate_quality(quality)?;
        let record = encode_record(entry)?;

        match self {
            CompressionMethod::None => Ok(record),
            CompressionMethod::Lz4 => Ok(Self::compress_lz4(&record)),
            CompressionMethod::Zstd => Self::compress_zstd(&record, quality),
        }
    }

    fn decompress_entry(&self, payload: &[u8]) -> Result<FileEntry> {
        match self {
            CompressionMethod::None => decode_record(payload),
            CompressionMethod::Lz4 => decode_record(&Self::decompress_lz4(payload)?),
            CompressionMethod::Zstd => decode_record(&Self::decompress_zstd(payload)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [CompressionMethod; 3] = [
        CompressionMethod::None,
        CompressionMethod::Lz4,
        CompressionMethod::Zstd,
    ];

    fn sample() -> FileEntry {
        FileEntry::new(
            "docs/readme.md",
            b"This is test data that should compress well. ".repeat(100),
        )
        .with_modified(42)
    }

    #[test]
    fn test_methods_recover_entry() {
        let entry = sample();
        for method in METHODS {
            let payload = method.compress_entry(&entry, 3).unwrap();
            let decoded = method.decompress_entry(&payload).unwrap();
            assert_eq!(decoded, entry, "method {}", method);
        }
    }

    #[test]
    fn test_compressing_methods_shrink_repetitive_data() {
        let entry = sample();
        let stored = CompressionMethod::None.compress_entry(&entry, 0).unwrap();
        let lz4 = CompressionMethod::Lz4.compress_entry(&entry, 0).unwrap();
        let zstd = CompressionMethod::Zstd.compress_entry(&entry, 19).unwrap();

        assert!(lz4.len() < stored.len());
        assert!(zstd.len() < stored.len());
    }

    #[test]
    fn test_invalid_zstd_quality() {
        let result = CompressionMethod::Zstd.compress_entry(&sample(), 100);
        assert!(matches!(
            result,
            Err(PackError::InvalidQuality { level: 100, .. })
        ));

        // Quality is ignored by methods that have no levels
        assert!(CompressionMethod::Lz4.compress_entry(&sample(), 100).is_ok());
        assert!(CompressionMethod::None.compress_entry(&sample(), -5).is_ok());
    }

    #[test]
    fn test_garbage_payload() {
        let garbage = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02];
        assert!(matches!(
            CompressionMethod::Zstd.decompress_entry(&garbage),
            Err(PackError::DecompressionFailed(_))
        ));

        // Small prepended size followed by a block that runs off the end
        let bad_block = [0x04, 0x00, 0x00, 0x00, 0xFF, 0xFF];
        assert!(matches!(
            CompressionMethod::Lz4.decompress_entry(&bad_block),
            Err(PackError::DecompressionFailed(_))
        ));

        assert!(matches!(
            CompressionMethod::None.decompress_entry(&garbage),
            Err(PackError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_boxed_codec() {
        let codec: Box<dyn EntryCodec> = Box::new(CompressionMethod::Lz4);
        let payload = codec.compress_entry(&sample(), 0).unwrap();
        assert_eq!(codec.decompress_entry(&payload).unwrap(), sample());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(CompressionMethod::default(), CompressionMethod::Zstd);
        assert_eq!(CompressionMethod::Lz4.to_string(), "lz4");
        let parsed: CompressionMethod = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, CompressionMethod::None);
    }
}
