//! Record Reader
//!
//! Decodes length-indicated records from a store file.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;
use crate::StoreError;

use super::{Record, LENGTH_PREFIX_SIZE};

/// Reads records from a store, tracking the read cursor
pub struct RecordReader<R: Read + Seek> {
    reader: R,
    /// Offset of the next byte to be read
    position: u64,
}

impl RecordReader<BufReader<File>> {
    /// Open a store file for reading from the start
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }
}

impl<R: Read + Seek> RecordReader<R> {
    /// Wrap a seekable source at its current position
    pub fn new(mut reader: R) -> Result<Self> {
        let position = reader.stream_position()?;
        Ok(Self { reader, position })
    }

    /// Decode the next record
    ///
    /// Returns:
    /// - `Ok(Some(record))`: a complete record
    /// - `Ok(None)`: the stream ended cleanly before a length prefix
    /// - `Err(TruncatedRecord)`: the prefix or payload is cut short
    ///
    /// After `Ok(None)` the reader stays at end of stream until repositioned.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let start = self.position;

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE as usize];
        let got = read_full(&mut self.reader, &mut prefix)? as u64;
        self.position += got;

        if got == 0 {
            return Ok(None);
        }
        if got < LENGTH_PREFIX_SIZE {
            return Err(StoreError::TruncatedRecord {
                offset: start,
                expected: LENGTH_PREFIX_SIZE,
                available: got,
            });
        }

        let len = u64::from_ne_bytes(prefix);

        // Bounded by what is actually in the stream, never by the prefix alone
        let mut payload = Vec::new();
        let read = Read::take(&mut self.reader, len).read_to_end(&mut payload)? as u64;
        self.position += read;

        if read < len {
            return Err(StoreError::TruncatedRecord {
                offset: start,
                expected: len,
                available: read,
            });
        }

        Ok(Some(Record {
            offset: start,
            payload,
        }))
    }

    /// Seek to `offset` and decode the record starting there
    pub fn read_at(&mut self, offset: u64) -> Result<Option<Record>> {
        self.seek(offset)?;
        self.next_record()
    }

    /// Reposition the cursor
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.position = self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Reposition the cursor at the start of the store
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0)
    }

    /// Offset of the next byte to be read
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Iterate over the remaining records
    pub fn records(&mut self) -> RecordIter<'_, R> {
        RecordIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over records; stops after end of store or the first error
pub struct RecordIter<'a, R: Read + Seek> {
    reader: &'a mut RecordReader<R>,
    done: bool,
}

impl<'a, R: Read + Seek> Iterator for RecordIter<'a, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` as far as the stream allows; returns bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
