//! Store Module
//!
//! The data set coordinator: one record store file, its header block and its
//! primary key index sidecar.
//!
//! ## Responsibilities
//! - Load delimited text lines into the record store
//! - Write the header block describing the store
//! - Build, persist and reload the primary key index
//! - Answer key lookups
//!
//! ## Lifecycle
//! ```text
//! Untouched ──load/append──▶ Built ──build_index──▶ Indexed
//!                              ▲                       │
//!                              │                   load_index
//!                            append                    ▼
//!                              └──────────────── Queryable
//! ```
//! Any append drops the in-memory index and returns the store to `Built`;
//! there is no partial re-indexing.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::header::{HeaderBuffer, HeaderDescriptor};
use crate::index::PrimaryKeyIndex;
use crate::record::RecordWriter;
use crate::StoreError;

/// Where a data set is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No records have been written
    Untouched,
    /// Records exist; no current index
    Built,
    /// Index built by a full scan
    Indexed,
    /// Index loaded from its sidecar
    Queryable,
}

/// A flat-file data set
///
/// Assumes exclusive access to its files for the duration of each call.
pub struct DataStore {
    /// Data set configuration
    config: Config,

    /// Current lifecycle state
    state: StoreState,

    /// Header of the data file, if one has been written or read
    header: Option<HeaderDescriptor>,

    /// Current primary key index (None until built or loaded)
    index: Option<PrimaryKeyIndex>,
}

impl DataStore {
    /// Open or create a data set with the given config
    ///
    /// On startup:
    /// 1. Validate the config and create the data directory
    /// 2. Detect whether the record store already holds records
    /// 3. Read the existing header block, if any
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Validate and create directory
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Existing records put the store straight into Built
        let state = state_on_disk(&config.data_path());

        // Step 3: A broken header does not prevent opening the records
        let header_path = config.header_path();
        let header = if header_path.exists() {
            match HeaderBuffer::read(&header_path) {
                Ok(header) => Some(header),
                Err(e) => {
                    warn!(path = %header_path.display(), error = %e, "ignoring unreadable header block");
                    None
                }
            }
        } else {
            None
        };

        debug!(dir = %config.data_dir.display(), ?state, "opened data store");

        Ok(Self {
            config,
            state,
            header,
            index: None,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the store's contents with delimited text lines
    ///
    /// The first line holds the comma-separated field names; every following
    /// non-empty line becomes one record, unvalidated. The header block is
    /// written afterwards and the new descriptor returned.
    ///
    /// Field names are validated before the record store is touched. Once it
    /// is, the index is dropped whether or not the load completes.
    pub fn load_lines<R: BufRead>(&mut self, source: R) -> Result<HeaderDescriptor> {
        let mut lines = source.lines();

        let fields = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(StoreError::MalformedHeader(
                    "source has no field-name line".to_string(),
                ))
            }
        };
        let fields = fields.trim_end_matches('\r');

        // Step 1: Describe the new contents and reject an unwritable header
        let mut descriptor = HeaderDescriptor::new(
            self.config.data_file_name.clone(),
            self.config.version,
            self.config.size_format,
            self.config.index_file_name.clone(),
            self.config.primary_key_ordinality,
        );
        descriptor.set_fields(fields);
        HeaderBuffer::render(&descriptor)?;

        // Step 2: The old index and header no longer describe the store
        if self.index.take().is_some() {
            debug!("load invalidated primary key index");
        }
        self.header = None;

        // Step 3: Write every record through the codec
        let data_path = self.config.data_path();
        let record_count = match Self::write_records(&data_path, lines) {
            Ok(count) => count,
            Err(e) => {
                self.state = state_on_disk(&data_path);
                return Err(e);
            }
        };
        self.state = if record_count > 0 {
            StoreState::Built
        } else {
            StoreState::Untouched
        };

        // Step 4: Write the header block
        descriptor.set_record_count(record_count);
        HeaderBuffer::write(&self.config.header_path(), &mut descriptor, fields)?;
        self.header = Some(descriptor.clone());

        info!(
            path = %data_path.display(),
            records = record_count,
            fields = descriptor.fields_per_record(),
            "loaded record store"
        );
        Ok(descriptor)
    }

    fn write_records<I>(data_path: &Path, lines: I) -> Result<u64>
    where
        I: Iterator<Item = std::io::Result<String>>,
    {
        let mut writer = RecordWriter::create(data_path)?;
        for line in lines {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            writer.append(line.as_bytes())?;
        }
        writer.sync()?;
        Ok(writer.records_written())
    }

    /// Replace the store's contents with the lines of a text file
    pub fn load_file(&mut self, path: &Path) -> Result<HeaderDescriptor> {
        let source = BufReader::new(File::open(path)?);
        self.load_lines(source)
    }

    /// Append one record and return its start offset
    ///
    /// Invalidates any index; the header block is not rewritten.
    pub fn append(&mut self, payload: &[u8]) -> Result<u64> {
        let mut writer = RecordWriter::append_to(&self.config.data_path())?;
        let offset = writer.append(payload)?;
        writer.sync()?;

        if self.index.take().is_some() {
            debug!("append invalidated primary key index");
        }
        self.state = StoreState::Built;
        Ok(offset)
    }

    // =========================================================================
    // Indexing
    // =========================================================================

    /// Build the primary key index by scanning the whole store
    pub fn build_index(&mut self) -> Result<&PrimaryKeyIndex> {
        let index = PrimaryKeyIndex::build(&self.config.data_path(), self.config.field_delimiter)?;
        self.state = StoreState::Indexed;
        Ok(self.index.insert(index))
    }

    /// Write the current index to its sidecar file
    pub fn persist_index(&self) -> Result<()> {
        let index = self.index.as_ref().ok_or(StoreError::IndexNotReady)?;
        index.write(&self.config.index_path())
    }

    /// Load the index from its sidecar instead of rescanning
    pub fn load_index(&mut self) -> Result<&PrimaryKeyIndex> {
        let index = PrimaryKeyIndex::read(&self.config.index_path())?;
        self.state = StoreState::Queryable;
        Ok(self.index.insert(index))
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Start offset of the record for `key`, or `None` if not indexed
    pub fn lookup(&self, key: &str) -> Result<Option<u64>> {
        let index = self.index.as_ref().ok_or(StoreError::IndexNotReady)?;
        Ok(index.offset_of(key))
    }

    /// Payload of the record for `key`, or `None` if not indexed
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let index = self.index.as_ref().ok_or(StoreError::IndexNotReady)?;
        let record = index.search(key, &self.config.data_path(), self.config.field_delimiter)?;
        Ok(record.map(|record| record.payload))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Re-read the header block from disk
    pub fn read_header(&mut self) -> Result<&HeaderDescriptor> {
        let header = HeaderBuffer::read(&self.config.header_path())?;
        Ok(self.header.insert(header))
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn header(&self) -> Option<&HeaderDescriptor> {
        self.header.as_ref()
    }

    pub fn index(&self) -> Option<&PrimaryKeyIndex> {
        self.index.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Lifecycle state implied by the record store file alone
fn state_on_disk(data_path: &Path) -> StoreState {
    match fs::metadata(data_path) {
        Ok(meta) if meta.len() > 0 => StoreState::Built,
        _ => StoreState::Untouched,
    }
}
