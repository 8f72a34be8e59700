use crate::archive::codec::{CompressionMethod, EntryCodec, DEFAULT_QUALITY};
use crate::archive::entry::FileEntry;
use crate::archive::format::{file_count, PACKING_LEVEL};
use crate::config::PackConfig;
use crate::error::{PackError, Result};
use std::io::Write;
use std::path::Path;

/// Pack `files` with zstd entries at `quality`.
///
/// `files` is sorted by path in place.
pub fn pack(files: &mut [FileEntry], quality: i32) -> Result<Vec<u8>> {
    pack_with(files, &CompressionMethod::Zstd, quality)
}

/// Pack `files` with a caller-supplied entry codec.
///
/// Entries are written in byte-wise path order so the same set of files always
/// produces the same archive. The sort is stable: entries sharing a path keep
/// their relative input order, and the last one wins on unpack.
pub fn pack_with<C: EntryCodec + ?Sized>(
    files: &mut [FileEntry],
    codec: &C,
    quality: i32,
) -> Result<Vec<u8>> {
    let archive = pack_into(files, codec, quality, Vec::new())?;

    tracing::debug!(files = files.len(), bytes = archive.len(), "archive packed");

    Ok(archive)
}

/// Pack `files` into `sink`, returning the sink once the outer stream is
/// finished. Any write or flush failure on the sink is an `OuterStream` error.
pub fn pack_into<C: EntryCodec + ?Sized, W: Write>(
    files: &mut [FileEntry],
    codec: &C,
    quality: i32,
    sink: W,
) -> Result<W> {
    let count = file_count(files.len())?;

    files.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));

    tracing::debug!(files = count, quality, "packing archive");

    let mut encoder =
        zstd::stream::write::Encoder::new(sink, PACKING_LEVEL).map_err(PackError::OuterStream)?;

    encoder
        .write_all(&count.to_le_bytes())
        .map_err(PackError::OuterStream)?;

    for file in files.iter() {
        let compressed = codec
            .compress_entry(file, quality)
            .map_err(|e| PackError::EntryCompression {
                path: file.path.clone(),
                source: Box::new(e),
            })?;

        tracing::trace!(
            path = %file.path,
            size = file.size(),
            compressed = compressed.len(),
            "packed entry"
        );

        encoder
            .write_all(&(compressed.len() as u64).to_le_bytes())
            .map_err(PackError::OuterStream)?;
        encoder
            .write_all(&compressed)
            .map_err(PackError::OuterStream)?;
    }

    encoder.finish().map_err(PackError::OuterStream)
}

/// In-memory archive builder
pub struct ArchiveWriter<C = CompressionMethod> {
    entries: Vec<FileEntry>,
    codec: C,
    quality: i32,
}

impl ArchiveWriter<CompressionMethod> {
    /// Writer using zstd entries at the default quality
    pub fn new() -> Self {
        Self::with_codec(CompressionMethod::default())
    }

    /// Writer configured from [`PackConfig`]
    pub fn from_config(config: &PackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_codec(config.method).with_quality(config.quality))
    }
}

impl Default for ArchiveWriter<CompressionMethod> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EntryCodec> ArchiveWriter<C> {
    /// Writer using a custom entry codec
    pub fn with_codec(codec: C) -> Self {
        Self {
            entries: Vec::new(),
            codec,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    /// Add a file from memory
    pub fn add_file(&mut self, path: &str, data: &[u8]) {
        self.entries.push(FileEntry::new(path, data));
    }

    pub fn add_entry(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    /// Add a file from disk
    pub fn add_file_from_disk(&mut self, archive_path: &str, disk_path: &Path) -> Result<()> {
        let entry = FileEntry::from_disk(archive_path, disk_path)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produce the archive bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        pack_with(&mut self.entries, &self.codec, self.quality)
    }

    /// Produce the archive and write it to `path`
    pub fn write_to_path<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let archive = self.finish()?;
        std::fs::write(path, archive)?;
        Ok(())
    }
}
