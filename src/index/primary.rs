//! Primary Key Index
//!
//! Key → record start offset mapping built from a record store.

use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::{Record, RecordReader};
use crate::StoreError;

/// In-memory primary key index, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKeyIndex {
    /// key → start offset of the record's length prefix
    entries: BTreeMap<String, u64>,
}

impl PrimaryKeyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by scanning the store file at `path`
    ///
    /// The key of each record is its first field, split on `delimiter`.
    /// Records with an empty payload add no entry. When a key repeats, the
    /// record later in the file wins.
    pub fn build(path: &Path, delimiter: u8) -> Result<Self> {
        let mut reader = RecordReader::open(path)?;
        let index = Self::build_from(&mut reader, delimiter)?;

        info!(
            path = %path.display(),
            entries = index.len(),
            "built primary key index"
        );
        Ok(index)
    }

    /// Build an index from the remaining records of `reader`
    ///
    /// Any truncated record aborts the build.
    pub fn build_from<R: Read + Seek>(
        reader: &mut RecordReader<R>,
        delimiter: u8,
    ) -> Result<Self> {
        let mut index = Self::new();
        let mut scanned = 0u64;

        for record in reader.records() {
            let record = record?;
            scanned += 1;

            if let Some(key) = record.key(delimiter) {
                if let Some(previous) = index.insert(key, record.offset) {
                    debug!(previous, offset = record.offset, "duplicate key replaced");
                }
            }
        }

        debug!(scanned, entries = index.len(), "scanned record store");
        Ok(index)
    }

    /// Insert or replace an entry; returns the replaced offset
    pub fn insert(&mut self, key: impl Into<String>, offset: u64) -> Option<u64> {
        self.entries.insert(key.into(), offset)
    }

    /// Start offset of the record for `key`
    pub fn offset_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(key, offset)| (key.as_str(), *offset))
    }

    /// Look up `key` and read its record from the store file at `path`
    ///
    /// Returns:
    /// - `Ok(Some(record))`: key indexed and record read
    /// - `Ok(None)`: key not in the index
    /// - `Err(StaleIndexEntry)`: the offset no longer holds that key's record
    pub fn search(&self, key: &str, path: &Path, delimiter: u8) -> Result<Option<Record>> {
        if !self.contains_key(key) {
            return Ok(None);
        }
        let mut reader = RecordReader::open(path)?;
        self.search_in(key, &mut reader, delimiter)
    }

    /// Look up `key` and read its record through an already open reader
    pub fn search_in<R: Read + Seek>(
        &self,
        key: &str,
        reader: &mut RecordReader<R>,
        delimiter: u8,
    ) -> Result<Option<Record>> {
        let offset = match self.offset_of(key) {
            Some(offset) => offset,
            None => return Ok(None),
        };

        let stale = || StoreError::StaleIndexEntry {
            key: key.to_string(),
            offset,
        };

        let record = reader.read_at(offset)?.ok_or_else(stale)?;
        if record.key(delimiter).as_deref() != Some(key) {
            return Err(stale());
        }

        Ok(Some(record))
    }
}

impl FromIterator<(String, u64)> for PrimaryKeyIndex {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
