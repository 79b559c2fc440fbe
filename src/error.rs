//! Error types for zipstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for zipstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Truncated record at offset {offset}: expected {expected} bytes, {available} available")]
    TruncatedRecord {
        offset: u64,
        expected: u64,
        available: u64,
    },

    // -------------------------------------------------------------------------
    // Header Errors
    // -------------------------------------------------------------------------
    #[error("Malformed header block: {0}")]
    MalformedHeader(String),

    #[error("Invalid size format tag: {0}")]
    InvalidSizeFormat(String),

    #[error("Invalid length indicator: {0}")]
    InvalidLength(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Primary key index has not been built or loaded")]
    IndexNotReady,

    #[error("Stale index entry for key {key:?} at offset {offset}")]
    StaleIndexEntry { key: String, offset: u64 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
