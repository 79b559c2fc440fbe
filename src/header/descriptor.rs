//! Header Descriptor
//!
//! In-memory description of a record store file.

use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// How numeric length prefixes are rendered in a header block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeFormat {
    /// Decimal text, e.g. `39`
    #[default]
    Ascii,

    /// Binary-digit text, e.g. `00100111`
    Binary,
}

impl SizeFormat {
    /// Tag written into the header block
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeFormat::Ascii => "ASCII",
            SizeFormat::Binary => "binary",
        }
    }

    /// Radix used when parsing prefixes in this format
    pub fn radix(&self) -> u32 {
        match self {
            SizeFormat::Ascii => 10,
            SizeFormat::Binary => 2,
        }
    }
}

impl fmt::Display for SizeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ascii") {
            Ok(SizeFormat::Ascii)
        } else if s.eq_ignore_ascii_case("binary") {
            Ok(SizeFormat::Binary)
        } else {
            Err(StoreError::InvalidSizeFormat(s.to_string()))
        }
    }
}

/// Describes a data file: schema, counts and rendering options
///
/// Field names are set once. `fields_per_record` is always derived from
/// them, and `header_size` is recomputed together with them, so the two can
/// never drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescriptor {
    pub(crate) file_name: String,
    pub(crate) version: u32,
    pub(crate) size_format: SizeFormat,
    /// Byte length of the field-name text; zero means unset
    pub(crate) header_size: u64,
    pub(crate) field_names: Vec<String>,
    pub(crate) record_count: u64,
    /// Record count written on the count line, when read from a block
    pub(crate) declared_record_count: Option<u64>,
    pub(crate) primary_key_index_file_name: String,
    pub(crate) primary_key_ordinality: u32,
}

impl HeaderDescriptor {
    /// Create a descriptor with no fields and no records
    pub fn new(
        file_name: impl Into<String>,
        version: u32,
        size_format: SizeFormat,
        primary_key_index_file_name: impl Into<String>,
        primary_key_ordinality: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            version,
            size_format,
            header_size: 0,
            field_names: Vec::new(),
            record_count: 0,
            declared_record_count: None,
            primary_key_index_file_name: primary_key_index_file_name.into(),
            primary_key_ordinality,
        }
    }

    /// Populate field names from comma/newline separated text
    ///
    /// Only takes effect while `header_size` is unset; returns whether the
    /// descriptor changed. Calling it again on a populated descriptor is a
    /// no-op, so field names never accumulate.
    pub fn set_fields(&mut self, fields: &str) -> bool {
        if self.header_size != 0 {
            return false;
        }

        self.field_names = split_field_names(fields);
        self.header_size = self.field_names.iter().map(|name| name.len() as u64).sum();
        true
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn size_format(&self) -> SizeFormat {
        self.size_format
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn fields_per_record(&self) -> usize {
        self.field_names.len()
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Record count from the block's count line
    ///
    /// Only set on descriptors rebuilt by [`HeaderBuffer::read`](super::HeaderBuffer::read).
    pub fn declared_record_count(&self) -> Option<u64> {
        self.declared_record_count
    }

    pub fn primary_key_index_file_name(&self) -> &str {
        &self.primary_key_index_file_name
    }

    pub fn primary_key_ordinality(&self) -> u32 {
        self.primary_key_ordinality
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    pub fn set_size_format(&mut self, size_format: SizeFormat) {
        self.size_format = size_format;
    }

    pub fn set_record_count(&mut self, record_count: u64) {
        self.record_count = record_count;
    }
}

/// Split field-name text on commas and newlines
///
/// A trailing line break is not treated as an extra empty field.
pub(crate) fn split_field_names(fields: &str) -> Vec<String> {
    let fields = fields.trim_end_matches(['\r', '\n']);
    if fields.is_empty() {
        return Vec::new();
    }

    fields
        .split([',', '\n'])
        .map(|name| name.trim_end_matches('\r').to_string())
        .collect()
}
