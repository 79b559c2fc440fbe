//! Header Module
//!
//! Describes a record store file and persists that description as a small
//! text block in a companion file.
//!
//! ## Responsibilities
//! - Hold the schema (field names) and counts of a data file
//! - Render the header block in ASCII or binary-digit form
//! - Rebuild a descriptor by scanning an existing header block
//!
//! ## Block Layout
//! ```text
//! <len>filename,version,headersize,sizeFormatType
//! <len><file name>,<version>,<header size>,<ASCII|binary>
//! <len>recordCount,fieldsPerRecord
//! <len><record count>,<fields per record>
//! <header size><field name>,<field name>,...
//! ```
//!
//! `<len>` is the byte length of the rest of its line: decimal in `ASCII`
//! blocks, an 8-digit binary string in `binary` blocks. The header size on the
//! last line is decimal or a 32-digit binary string.

mod buffer;
mod descriptor;
mod length;

pub use buffer::{HeaderBuffer, COUNT_LABELS, FILE_LABELS};
pub use descriptor::{HeaderDescriptor, SizeFormat};
pub use length::{decode_length, detect_length, render_header_size, render_length};
