//! Embedpack: pack static assets into one compressed archive and recover them
//! as an in-memory, path-addressable store.
//!
//! The archive is a single zstd stream holding a file count followed by one
//! length-prefixed frame per file. Every frame payload is compressed on its own
//! by an [`EntryCodec`], and frames are always written in path order, so the
//! same files produce the same bytes on every build.
//!
//! # Example
//!
//! ```
//! use embedpack::{pack, unpack, FileEntry};
//!
//! let mut files = vec![
//!     FileEntry::new("index.html", b"<h1>Hello</h1>".to_vec()),
//!     FileEntry::new("css/site.css", b"h1 { color: red }".to_vec()),
//! ];
//! let archive = pack(&mut files, 19)?;
//!
//! let store = unpack(&archive)?;
//! assert_eq!(store.read_file("index.html")?, b"<h1>Hello</h1>");
//! assert_eq!(store.paths(), ["css/site.css", "index.html"]);
//! # Ok::<(), embedpack::PackError>(())
//! ```

// Core modules
pub mod archive;
pub mod config;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use archive::{
    pack, pack_into, pack_with, unpack, unpack_with, ArchiveReader, ArchiveWriter,
    CompressionMethod, EntryCodec, FileEntry, DEFAULT_QUALITY, MAX_FILE_COUNT, PACKING_LEVEL,
};
pub use config::PackConfig;
pub use error::{PackError, Result};
pub use store::Store;
