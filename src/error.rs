use std::io;
use thiserror::Error;

/// Result type for embedpack operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Unified error type for packing and unpacking archives
#[derive(Debug, Error)]
pub enum PackError {
    // Encoder errors
    #[error("Too many files for one archive: {0} (max {max})", max = u32::MAX)]
    TooManyFiles(usize),

    #[error("Could not compress {path}: {source}")]
    EntryCompression {
        path: String,
        #[source]
        source: Box<PackError>,
    },

    #[error("Path too long: {0} bytes (max 65535)")]
    PathTooLong(usize),

    #[error("Invalid quality {level} for {method} compression")]
    InvalidQuality { method: String, level: i32 },

    // Framing errors
    #[error("Outer stream error: {0}")]
    OuterStream(#[source] io::Error),

    #[error("Failed to read number of files: {0}")]
    CountUnreadable(#[source] io::Error),

    #[error("Failed to read length of file {index}: {source}")]
    LengthUnreadable {
        index: u32,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file {index}: {source}")]
    FrameUnreadable {
        index: u32,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file {index}; expected {expected} bytes, got {actual}")]
    ShortRead {
        index: u32,
        expected: u64,
        actual: u64,
    },

    #[error("Trailing data after last frame")]
    TrailingData,

    // Entry errors
    #[error("Failed to decompress file #{index}: {source}")]
    EntryDecompression {
        index: u32,
        #[source]
        source: Box<PackError>,
    },

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Invalid entry record: {0}")]
    InvalidRecord(String),

    #[error("CRC mismatch for {path}: expected {expected:08x}, got {actual:08x}")]
    CrcMismatch {
        path: String,
        expected: u32,
        actual: u32,
    },

    // Store errors
    #[error("File not found in archive: {0}")]
    FileNotFound(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PackError {
    /// True for errors raised while walking the archive framing: unreadable
    /// count/length fields, short frames, and trailing data.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            PackError::OuterStream(_)
                | PackError::CountUnreadable(_)
                | PackError::LengthUnreadable { .. }
                | PackError::FrameUnreadable { .. }
                | PackError::ShortRead { .. }
                | PackError::TrailingData
        )
    }
}

impl From<toml::de::Error> for PackError {
    fn from(err: toml::de::Error) -> Self {
        PackError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::Config(err.to_string())
    }
}
