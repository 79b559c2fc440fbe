//! Configuration for zipstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::header::SizeFormat;
use crate::index::DEFAULT_INDEX_FILE_NAME;

/// Main configuration for a zipstore data set
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Layout
    // -------------------------------------------------------------------------
    /// Root directory for all files of one data set
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── records.dat      (length-indicated records)
    ///     ├── records.hdr      (header block)
    ///     └── KeyIndex.txt     (primary key index sidecar)
    pub data_dir: PathBuf,

    /// Name of the record store file inside `data_dir`
    pub data_file_name: String,

    /// Name of the header block file inside `data_dir`
    pub header_file_name: String,

    /// Name of the index sidecar file inside `data_dir`
    pub index_file_name: String,

    // -------------------------------------------------------------------------
    // Header Configuration
    // -------------------------------------------------------------------------
    /// How length prefixes are rendered in the header block
    pub size_format: SizeFormat,

    /// Format version tag written into the header block
    pub version: u32,

    /// Which field forms the primary key (1-based)
    ///
    /// Written into the header block. Keys are always taken from the first
    /// field, so only `1` is accepted.
    pub primary_key_ordinality: u32,

    // -------------------------------------------------------------------------
    // Record Configuration
    // -------------------------------------------------------------------------
    /// Field separator inside record payloads
    pub field_delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./zipstore_data"),
            data_file_name: "records.dat".to_string(),
            header_file_name: "records.hdr".to_string(),
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            size_format: SizeFormat::Ascii,
            version: 1,
            primary_key_ordinality: 1,
            field_delimiter: b',',
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the record store file
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file_name)
    }

    /// Full path of the header block file
    pub fn header_path(&self) -> PathBuf {
        self.data_dir.join(&self.header_file_name)
    }

    /// Full path of the index sidecar file
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file_name)
    }

    /// Check that the three file names are usable and distinct, and that the
    /// key and delimiter settings are supported
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("data file", &self.data_file_name),
            ("header file", &self.header_file_name),
            ("index file", &self.index_file_name),
        ];

        for (what, name) in names {
            if name.is_empty() {
                return Err(StoreError::Config(format!("{} name is empty", what)));
            }
            if name.chars().any(char::is_whitespace) {
                // The header block is scanned as whitespace-delimited tokens
                return Err(StoreError::Config(format!(
                    "{} name contains whitespace: {:?}",
                    what, name
                )));
            }
        }

        if self.data_file_name == self.header_file_name
            || self.data_file_name == self.index_file_name
            || self.header_file_name == self.index_file_name
        {
            return Err(StoreError::Config(
                "data, header and index file names must differ".to_string(),
            ));
        }

        if self.primary_key_ordinality != 1 {
            return Err(StoreError::Config(format!(
                "unsupported primary key ordinality {}: keys are taken from field 1",
                self.primary_key_ordinality
            )));
        }

        if self.field_delimiter == b' ' || self.field_delimiter == b'\n' {
            return Err(StoreError::Config(format!(
                "unsupported field delimiter: {:?}",
                self.field_delimiter as char
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the record store file name
    pub fn data_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.data_file_name = name.into();
        self
    }

    /// Set the header block file name
    pub fn header_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.header_file_name = name.into();
        self
    }

    /// Set the index sidecar file name
    pub fn index_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_file_name = name.into();
        self
    }

    /// Set how header length prefixes are rendered
    pub fn size_format(mut self, format: SizeFormat) -> Self {
        self.config.size_format = format;
        self
    }

    /// Set the format version tag
    pub fn version(mut self, version: u32) -> Self {
        self.config.version = version;
        self
    }

    /// Set the primary key ordinality
    pub fn primary_key_ordinality(mut self, ordinality: u32) -> Self {
        self.config.primary_key_ordinality = ordinality;
        self
    }

    /// Set the field delimiter used inside payloads
    pub fn field_delimiter(mut self, delimiter: u8) -> Self {
        self.config.field_delimiter = delimiter;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
