use crate::archive::codec::{CompressionMethod, EntryCodec};
use crate::archive::format::{read_u32, read_u64};
use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::store::Store;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Upper bound on up-front payload allocation; longer payloads grow as read
const MAX_PREALLOCATED_PAYLOAD: u64 = 1 << 20;

/// Unpack an archive whose entries were packed with zstd
pub fn unpack(archive: &[u8]) -> Result<Store> {
    unpack_with(archive, &CompressionMethod::Zstd)
}

/// Unpack an archive with a caller-supplied entry codec.
///
/// Bytes after the last declared frame are ignored; use
/// [`ArchiveReader::strict`] to reject them.
pub fn unpack_with<C: EntryCodec + ?Sized>(archive: &[u8], codec: &C) -> Result<Store> {
    decode(archive, codec, false)
}

/// Archive decoder with configurable codec and trailing-data policy
pub struct ArchiveReader<C = CompressionMethod> {
    codec: C,
    strict: bool,
}

impl ArchiveReader<CompressionMethod> {
    /// Reader for zstd entries, tolerant of trailing bytes
    pub fn new() -> Self {
        Self::with_codec(CompressionMethod::default())
    }

    /// Reader configured from [`PackConfig`]
    pub fn from_config(config: &PackConfig) -> Self {
        Self::with_codec(config.method).strict(config.strict)
    }
}

impl Default for ArchiveReader<CompressionMethod> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EntryCodec> ArchiveReader<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            strict: false,
        }
    }

    /// Fail with `TrailingData` if anything follows the last frame
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Decode an in-memory archive
    pub fn read(&self, archive: &[u8]) -> Result<Store> {
        decode(archive, &self.codec, self.strict)
    }

    /// Read and decode an archive file
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Store> {
        let archive = std::fs::read(path)?;
        self.read(&archive)
    }
}

fn decode<C: EntryCodec + ?Sized>(archive: &[u8], codec: &C, strict: bool) -> Result<Store> {
    let mut reader =
        zstd::stream::read::Decoder::with_buffer(archive).map_err(PackError::OuterStream)?;

    let count = read_u32(&mut reader).map_err(PackError::CountUnreadable)?;

    tracing::debug!(files = count, bytes = archive.len(), "unpacking archive");

    let mut store = Store::with_capacity(count);

    for index in 0..count {
        let expected =
            read_u64(&mut reader).map_err(|source| PackError::LengthUnreadable { index, source })?;

        let mut payload = Vec::with_capacity(expected.min(MAX_PREALLOCATED_PAYLOAD) as usize);
        // A stream cut mid-payload surfaces as UnexpectedEof; payload keeps
        // whatever was decoded before it.
        let actual = match (&mut reader).take(expected).read_to_end(&mut payload) {
            Ok(n) => n as u64,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => payload.len() as u64,
            Err(source) => return Err(PackError::FrameUnreadable { index, source }),
        };

        if actual != expected {
            return Err(PackError::ShortRead {
                index,
                expected,
                actual,
            });
        }

        let entry = codec
            .decompress_entry(&payload)
            .map_err(|e| PackError::EntryDecompression {
                index,
                source: Box::new(e),
            })?;

        tracing::trace!(index, path = %entry.path, size = entry.size(), "unpacked entry");

        store.insert(entry);
    }

    if strict {
        let mut probe = [0u8; 1];
        if reader.read(&mut probe).map_err(PackError::OuterStream)? != 0 {
            tracing::warn!(files = count, "trailing data after last frame");
            return Err(PackError::TrailingData);
        }
    }

    tracing::debug!(files = store.len(), "archive unpacked");

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::format::{encode_record, PACKING_LEVEL};
    use crate::archive::{pack_with, FileEntry};
    use std::io::Write;

    /// Wrap raw container bytes in the outer stream
    fn outer(plain: &[u8]) -> Vec<u8> {
        let mut encoder = zstd::stream::write::Encoder::new(Vec::new(), PACKING_LEVEL).unwrap();
        encoder.write_all(plain).unwrap();
        encoder.finish().unwrap()
    }

    fn frame(entry: &FileEntry) -> Vec<u8> {
        let record = encode_record(entry).unwrap();
        let mut out = (record.len() as u64).to_le_bytes().to_vec();
        out.extend_from_slice(&record);
        out
    }

    #[test]
    fn test_reads_hand_built_archive() {
        let mut plain = 2u32.to_le_bytes().to_vec();
        plain.extend(frame(&FileEntry::new("one", b"1".to_vec())));
        plain.extend(frame(&FileEntry::new("two", b"2".to_vec())));

        let store = unpack_with(&outer(&plain), &CompressionMethod::None).unwrap();
        assert_eq!(store.paths(), ["one", "two"]);
        assert_eq!(store.read_file("two").unwrap(), b"2");
    }

    #[test]
    fn test_wire_order_is_trusted() {
        let mut plain = 2u32.to_le_bytes().to_vec();
        plain.extend(frame(&FileEntry::new("zeta", Vec::<u8>::new())));
        plain.extend(frame(&FileEntry::new("alpha", Vec::<u8>::new())));

        let store = unpack_with(&outer(&plain), &CompressionMethod::None).unwrap();
        assert_eq!(store.paths(), ["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_count() {
        let result = unpack(&outer(&[1, 0]));
        assert!(matches!(result, Err(PackError::CountUnreadable(_))));

        let result = unpack(&[]);
        assert!(matches!(result, Err(PackError::CountUnreadable(_))));
    }

    #[test]
    fn test_missing_length() {
        let mut plain = 1u32.to_le_bytes().to_vec();
        plain.extend_from_slice(&[5, 0, 0]);

        let result = unpack(&outer(&plain));
        assert!(matches!(
            result,
            Err(PackError::LengthUnreadable { index: 0, .. })
        ));
    }

    #[test]
    fn test_short_frame() {
        let mut plain = 1u32.to_le_bytes().to_vec();
        plain.extend_from_slice(&100u64.to_le_bytes());
        plain.extend_from_slice(&[7u8; 10]);

        match unpack(&outer(&plain)) {
            Err(PackError::ShortRead {
                index,
                expected,
                actual,
            }) => {
                assert_eq!(index, 0);
                assert_eq!(expected, 100);
                assert_eq!(actual, 10);
            }
            other => panic!("Expected ShortRead, got: {:?}", other),
        }
    }

    #[test]
    fn test_huge_declared_count_does_not_preallocate() {
        let plain = u32::MAX.to_le_bytes();
        let result = unpack(&outer(&plain));
        assert!(matches!(
            result,
            Err(PackError::LengthUnreadable { index: 0, .. })
        ));
    }

    #[test]
    fn test_bad_payload_names_index() {
        let mut plain = 2u32.to_le_bytes().to_vec();
        plain.extend(frame(&FileEntry::new("good", b"ok".to_vec())));
        plain.extend_from_slice(&3u64.to_le_bytes());
        plain.extend_from_slice(&[1, 2, 3]);

        match unpack_with(&outer(&plain), &CompressionMethod::None) {
            Err(PackError::EntryDecompression { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected EntryDecompression, got: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_data_policy() {
        let mut plain = 1u32.to_le_bytes().to_vec();
        plain.extend(frame(&FileEntry::new("a", b"a".to_vec())));
        plain.extend_from_slice(b"future header fields");
        let archive = outer(&plain);

        let store = unpack_with(&archive, &CompressionMethod::None).unwrap();
        assert_eq!(store.len(), 1);

        let strict = ArchiveReader::with_codec(CompressionMethod::None).strict(true);
        assert!(matches!(strict.read(&archive), Err(PackError::TrailingData)));
    }

    #[test]
    fn test_strict_accepts_clean_archive() {
        let mut files = vec![FileEntry::new("a", b"a".to_vec())];
        let archive = pack_with(&mut files, &CompressionMethod::Lz4, 0).unwrap();

        let reader = ArchiveReader::with_codec(CompressionMethod::Lz4).strict(true);
        assert_eq!(reader.read(&archive).unwrap().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = PackConfig {
            method: CompressionMethod::None,
            quality: 0,
            strict: true,
        };
        let mut files = vec![FileEntry::new("cfg", b"c".to_vec())];
        let archive = pack_with(&mut files, &config.method, config.quality).unwrap();

        let store = ArchiveReader::from_config(&config).read(&archive).unwrap();
        assert_eq!(store.read_file("cfg").unwrap(), b"c");
    }
}
