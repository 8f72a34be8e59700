//! Path-indexed store produced by unpacking an archive

use crate::archive::FileEntry;
use crate::error::{PackError, Result};
use std::collections::HashMap;

/// Upper bound on up-front path allocation, whatever the declared count says
const MAX_PREALLOCATED_PATHS: usize = 4096;

/// Decoded archive contents with O(1) lookup by path.
///
/// `paths` keeps the order frames were read in. A path that appears twice in
/// the archive is listed twice there, while the lookup map keeps only the
/// entry read last.
#[derive(Debug, Clone)]
pub struct Store {
    files: HashMap<String, FileEntry>,
    paths: Vec<String>,
}

impl Store {
    pub(crate) fn with_capacity(declared: u32) -> Self {
        let capacity = (declared as usize).min(MAX_PREALLOCATED_PATHS);
        Self {
            files: HashMap::with_capacity(capacity),
            paths: Vec::with_capacity(capacity),
        }
    }

    /// Insert a fully decoded entry, replacing any earlier one with the same path
    pub(crate) fn insert(&mut self, entry: FileEntry) {
        self.paths.push(entry.path.clone());
        self.files.insert(entry.path.clone(), entry);
    }

    /// Look up an entry by path
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.files.get(path)
    }

    /// Check if a file exists in the store
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Content of a file, or `FileNotFound`
    pub fn read_file(&self, path: &str) -> Result<&[u8]> {
        self.files
            .get(path)
            .map(|entry| entry.content.as_slice())
            .ok_or_else(|| PackError::FileNotFound(path.to_string()))
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in archive order
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Entries in archive order, one item per entry in [`paths`](Self::paths).
    ///
    /// A duplicated path yields its surviving entry once per occurrence.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        self.paths.iter().filter_map(|path| self.files.get(path))
    }

    /// Consume the store, returning the lookup map
    pub fn into_files(self) -> HashMap<String, FileEntry> {
        self.files
    }
}
