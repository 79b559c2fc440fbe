//! Record Writer
//!
//! Appends length-indicated records to a store file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

use super::{encode_record, LENGTH_PREFIX_SIZE};

/// Writes records to a store, tracking the write cursor
pub struct RecordWriter<W: Write> {
    /// Underlying sink
    writer: W,
    /// Offset the next record will start at
    position: u64,
    /// Records written through this writer
    records_written: u64,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) a store file
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        debug!(path = %path.display(), "created record store");
        Ok(Self::new(BufWriter::new(file), 0))
    }

    /// Open a store file for appending, creating it if missing
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let position = file.metadata()?.len();

        debug!(path = %path.display(), position, "opened record store for append");
        Ok(Self::new(BufWriter::new(file), position))
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wrap a sink whose cursor currently sits at `position`
    pub fn new(writer: W, position: u64) -> Self {
        Self {
            writer,
            position,
            records_written: 0,
        }
    }

    /// Append one record and return its start offset
    ///
    /// The cursor advances by exactly `LENGTH_PREFIX_SIZE + payload.len()`.
    pub fn append(&mut self, payload: &[u8]) -> Result<u64> {
        let start = self.position;
        let encoded = encode_record(payload);
        self.writer.write_all(&encoded)?;

        self.position += LENGTH_PREFIX_SIZE + payload.len() as u64;
        self.records_written += 1;
        Ok(start)
    }

    /// Flush buffered records to the sink
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Offset the next record will start at
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of records appended through this writer
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and hand back the sink
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl RecordWriter<BufWriter<File>> {
    /// Flush and fsync the store file
    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}
