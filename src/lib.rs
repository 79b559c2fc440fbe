//! # zipstore
//!
//! A minimal flat-file record store with:
//! - Length-indicated variable-length records
//! - A text header block describing schema and record count
//! - A primary key index persisted to a text sidecar
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Delimited text source                      │
//! │                (one line per record)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      DataStore                              │
//! │        (Untouched → Built → Indexed → Queryable)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//!   │   Record    │ │   Header    │ │ PrimaryKey  │
//!   │   Codec     │ │   Buffer    │ │   Index     │
//!   └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!          ▼               ▼               ▼
//!     records.dat     records.hdr     KeyIndex.txt
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod header;
pub mod index;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use header::{HeaderBuffer, HeaderDescriptor, SizeFormat};
pub use index::PrimaryKeyIndex;
pub use record::{Record, RecordReader, RecordWriter};
pub use store::{DataStore, StoreState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zipstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
