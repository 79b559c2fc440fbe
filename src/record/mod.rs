//! Record Module
//!
//! Length-indicated variable-length records in a flat binary file.
//!
//! ## Responsibilities
//! - Append records as `[length][payload]`
//! - Read records back sequentially or at a known start offset
//! - Detect truncated records instead of returning short payloads
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Record 1                             │
//! │ ┌──────────────┬───────────────────┐ │
//! │ │ Len (8, ne)  │ Payload (Len)     │ │
//! │ └──────────────┴───────────────────┘ │
//! ├──────────────────────────────────────┤
//! │ Record 2                             │
//! │ ┌──────────────┬───────────────────┐ │
//! │ │ Len (8, ne)  │ Payload (Len)     │ │
//! │ └──────────────┴───────────────────┘ │
//! └──────────────────────────────────────┘
//! ```
//!
//! There is no separator between records other than the prefix itself, so
//! anything that appends to the file without writing an 8-byte native-endian
//! prefix desynchronizes every read after it.

mod reader;
mod writer;

use bytes::{BufMut, Bytes, BytesMut};

pub use reader::{RecordIter, RecordReader};
pub use writer::RecordWriter;

/// Width of the length prefix in bytes
pub const LENGTH_PREFIX_SIZE: u64 = std::mem::size_of::<u64>() as u64;

/// A single decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Byte offset of the record's length prefix in the store
    pub offset: u64,

    /// Raw payload bytes (delimiter-separated field text)
    pub payload: Vec<u8>,
}

impl Record {
    /// Payload length as stored in the prefix
    pub fn len(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Total bytes the record occupies on disk (prefix + payload)
    pub fn encoded_len(&self) -> u64 {
        LENGTH_PREFIX_SIZE + self.len()
    }

    /// Offset of the first byte after this record
    pub fn end_offset(&self) -> u64 {
        self.offset + self.encoded_len()
    }

    /// First field of the payload, split on `delimiter`
    ///
    /// Returns `None` for an empty payload.
    pub fn key(&self, delimiter: u8) -> Option<String> {
        if self.payload.is_empty() {
            return None;
        }
        let field = self
            .payload
            .split(|b| *b == delimiter)
            .next()
            .unwrap_or_default();
        Some(String::from_utf8_lossy(field).into_owned())
    }
}

/// Encode one record as `[u64 native-endian length][payload]`
pub fn encode_record(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE as usize + payload.len());
    buf.put_slice(&(payload.len() as u64).to_ne_bytes());
    buf.put_slice(payload);
    buf.freeze()
}
