//! Index Module
//!
//! Primary key index over a record store.
//!
//! ## Responsibilities
//! - Build the index by a full scan of the store, in file order
//! - Persist it to a text sidecar and reload it without rescanning
//! - Resolve a key to its record with a single seek
//!
//! ## Offsets
//! Each entry holds the **start** offset of its record (the position of the
//! length prefix). A lookup seeks there, reads the prefix and then exactly
//! that many payload bytes, so no length needs to be kept in the index.
//!
//! ## Sidecar Format
//! ```text
//! <key> <offset>\n
//! <key> <offset>\n
//! ...
//! ```
//! Lines are in key order; offsets are decimal.

mod primary;
mod sidecar;

pub use primary::PrimaryKeyIndex;
pub use sidecar::parse_index_line;

/// Default name of the index sidecar file
pub const DEFAULT_INDEX_FILE_NAME: &str = "KeyIndex.txt";
