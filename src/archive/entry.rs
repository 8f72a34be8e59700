use crate::error::Result;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Permission bits given to entries that don't come from disk
pub const DEFAULT_MODE: u32 = 0o644;

/// Normalize path to forward slashes (cross-platform compatibility)
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// One packed asset: its lookup path, raw content and file metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub content: Vec<u8>,
    pub mode: u32,
    pub modified: u64,
}

impl FileEntry {
    /// Create an entry from in-memory bytes.
    ///
    /// The path is stored exactly as given. The modification time is left
    /// at zero rather than read from the clock, so packing the same inputs
    /// twice gives the same archive.
    pub fn new(path: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.as_ref().to_string(),
            content: content.into(),
            mode: DEFAULT_MODE,
            modified: 0,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_modified(mut self, modified: u64) -> Self {
        self.modified = modified;
        self
    }

    /// Read a file from disk, keeping its mtime and permission bits.
    ///
    /// `archive_path` is normalized to forward slashes.
    pub fn from_disk<P: AsRef<Path>>(archive_path: &str, disk_path: P) -> Result<Self> {
        let disk_path = disk_path.as_ref();
        let content = std::fs::read(disk_path)?;
        let metadata = std::fs::metadata(disk_path)?;

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Ok(Self::new(normalize_path(archive_path), content)
            .with_mode(permission_bits(&metadata))
            .with_modified(modified))
    }

    /// Uncompressed content size in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Final component of the path
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        DEFAULT_MODE
    }
}
