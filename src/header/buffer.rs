//! Header Buffer
//!
//! Writes a [`HeaderDescriptor`] as a text header block and rebuilds one by
//! scanning an existing block.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::index::DEFAULT_INDEX_FILE_NAME;
use crate::StoreError;

use super::descriptor::split_field_names;
use super::length::{decode_length, detect_length, render_header_size, render_length};
use super::{HeaderDescriptor, SizeFormat};

/// Labels of the first descriptor line
pub const FILE_LABELS: &str = "filename,version,headersize,sizeFormatType";

/// Labels of the count line
pub const COUNT_LABELS: &str = "recordCount,fieldsPerRecord";

/// Minimum number of whitespace-delimited tokens in a block
const MIN_TOKENS: usize = 5;

/// Reads and writes header blocks
pub struct HeaderBuffer;

impl HeaderBuffer {
    /// Write the header block for `descriptor` to `path`
    ///
    /// Field names and header size are taken from `fields` only if the
    /// descriptor's header size is still unset; an already populated
    /// descriptor is written as is. Writing the same descriptor twice
    /// produces the same block.
    ///
    /// An existing file at `path` is replaced. If this returns an error the
    /// file may hold a partial block and must not be trusted.
    pub fn write(path: &Path, descriptor: &mut HeaderDescriptor, fields: &str) -> Result<()> {
        if descriptor.set_fields(fields) {
            debug!(
                fields = descriptor.fields_per_record(),
                header_size = descriptor.header_size,
                "populated header fields"
            );
        }

        let block = Self::render(descriptor)?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(block.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        debug!(
            path = %path.display(),
            format = %descriptor.size_format,
            bytes = block.len(),
            "wrote header block"
        );
        Ok(())
    }

    /// Render the header block text without touching the file system
    pub fn render(descriptor: &HeaderDescriptor) -> Result<String> {
        Self::validate(descriptor)?;

        let format = descriptor.size_format;
        let file_line = format!(
            "{},{},{},{}",
            descriptor.file_name, descriptor.version, descriptor.header_size, format
        );
        let count_line = format!(
            "{},{}",
            descriptor.record_count,
            descriptor.fields_per_record()
        );

        let mut block = String::new();
        for content in [FILE_LABELS, file_line.as_str(), COUNT_LABELS, count_line.as_str()] {
            block.push_str(&render_length(content.len() as u64, format));
            block.push_str(content);
            block.push('\n');
        }

        block.push_str(&render_header_size(descriptor.header_size, format)?);
        block.push_str(&descriptor.field_names.join(","));
        block.push('\n');

        Ok(block)
    }

    /// Rebuild a descriptor from the header block at `path`
    ///
    /// The block is scanned as whitespace-delimited tokens:
    /// - token 2 holds `file name, version, header size, format tag`
    /// - token 5 holds the header size followed by the field names
    ///
    /// The explicit format tag decides how the header size is decoded; if the
    /// tag is unreadable the format is guessed from the digits.
    ///
    /// `record_count` is set to the number of tokens scanned. It is an
    /// approximation carried over from the line-oriented block layout; the
    /// count written on token 4 is kept separately as
    /// `declared_record_count`.
    pub fn read(path: &Path) -> Result<HeaderDescriptor> {
        let text = fs::read_to_string(path)?;
        let tokens: Vec<&str> = text.split_whitespace().collect();

        if tokens.len() < MIN_TOKENS {
            return Err(StoreError::MalformedHeader(format!(
                "expected at least {} tokens, found {}",
                MIN_TOKENS,
                tokens.len()
            )));
        }

        let file_line = tokens[1];
        let parts: Vec<&str> = file_line.split([',', '\n']).collect();
        if parts.len() < 4 {
            return Err(StoreError::MalformedHeader(format!(
                "descriptor line has {} fields, expected 4: {:?}",
                parts.len(),
                file_line
            )));
        }

        let version: u32 = parts[1].parse().map_err(|_| {
            StoreError::MalformedHeader(format!("invalid version {:?}", parts[1]))
        })?;
        let tagged = parts[3].parse::<SizeFormat>().ok();

        let names_line = tokens[4];
        let digits_end = names_line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(names_line.len());
        let (size_text, names_text) = names_line.split_at(digits_end);
        if size_text.is_empty() {
            return Err(StoreError::MalformedHeader(format!(
                "field-name line has no header size: {:?}",
                names_line
            )));
        }

        let (header_size, size_format) = match tagged {
            Some(format) => (decode_length(size_text, format)?, format),
            None => detect_length(size_text)?,
        };

        let file_name = recover_file_name(file_line, parts[0], size_format)
            .or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default();

        let declared_record_count = recover_record_count(tokens[3], size_format);

        let descriptor = HeaderDescriptor {
            file_name,
            version,
            size_format,
            header_size,
            field_names: split_field_names(names_text),
            record_count: tokens.len() as u64,
            declared_record_count,
            primary_key_index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            primary_key_ordinality: 1,
        };

        debug!(
            path = %path.display(),
            format = %size_format,
            fields = descriptor.fields_per_record(),
            "read header block"
        );
        Ok(descriptor)
    }

    fn validate(descriptor: &HeaderDescriptor) -> Result<()> {
        if descriptor.file_name.is_empty() {
            return Err(StoreError::MalformedHeader("file name is empty".to_string()));
        }
        if descriptor.file_name.contains([',', ' ', '\t', '\r', '\n']) {
            return Err(StoreError::MalformedHeader(format!(
                "file name cannot contain separators or whitespace: {:?}",
                descriptor.file_name
            )));
        }

        for name in &descriptor.field_names {
            if name.contains(char::is_whitespace) {
                return Err(StoreError::MalformedHeader(format!(
                    "field name cannot contain whitespace: {:?}",
                    name
                )));
            }
        }

        // The last line starts with the header size; a leading digit would merge into it
        if let Some(first) = descriptor.field_names.first() {
            if first.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(StoreError::MalformedHeader(format!(
                    "first field name cannot start with a digit: {:?}",
                    first
                )));
            }
        }

        Ok(())
    }
}

/// Recover the file name from the descriptor line
///
/// The line is `<len><file name>,...` where `<len>` is the length of
/// everything after it. Try each split of the leading digits until the
/// declared length matches, so file names that start with digits survive.
fn recover_file_name(line: &str, first_field: &str, format: SizeFormat) -> Option<String> {
    let digit_run = first_field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first_field.len());

    (1..=digit_run).find_map(|split| {
        let declared = decode_length(&line[..split], format).ok()?;
        if declared == (line.len() - split) as u64 && split < first_field.len() {
            Some(first_field[split..].to_string())
        } else {
            None
        }
    })
}

/// Recover the declared record count from the count line
///
/// The line is `<len><record count>,<fields per record>`; the split of the
/// leading digits is found the same way as for the file name.
fn recover_record_count(line: &str, format: SizeFormat) -> Option<u64> {
    let first_field = line.split(',').next()?;
    let digit_run = first_field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first_field.len());
    if digit_run != first_field.len() {
        return None;
    }

    (1..digit_run).find_map(|split| {
        let declared = decode_length(&line[..split], format).ok()?;
        if declared == (line.len() - split) as u64 {
            first_field[split..].parse().ok()
        } else {
            None
        }
    })
}
