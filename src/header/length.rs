//! Length indicators for header blocks
//!
//! Renders and decodes the numeric prefixes of header lines, in either
//! decimal or binary-digit text.

use crate::error::Result;
use crate::StoreError;

use super::SizeFormat;

/// Guess the format of a length indicator from the shape of its digits
///
/// Collects the digit characters of `text`. If every digit is `0` or `1`
/// the run is parsed as base 2 and reported as `Binary`; otherwise it is
/// parsed as base 10 and reported as `Ascii`.
///
/// This is a heuristic: a decimal value made only of 0s and 1s (`101`) is
/// read as binary. Prefer [`decode_length`] when the format is known.
pub fn detect_length(text: &str) -> Result<(u64, SizeFormat)> {
    let digits = collect_digits(text)?;
    let format = if digits.bytes().all(|b| b == b'0' || b == b'1') {
        SizeFormat::Binary
    } else {
        SizeFormat::Ascii
    };

    let value = parse_digits(&digits, format)?;
    Ok((value, format))
}

/// Decode a length indicator whose format is already known
pub fn decode_length(text: &str, format: SizeFormat) -> Result<u64> {
    let digits = collect_digits(text)?;
    parse_digits(&digits, format)
}

/// Render a line prefix
///
/// `Binary` values are 8 binary digits, widened when the value needs more.
pub fn render_length(value: u64, format: SizeFormat) -> String {
    match format {
        SizeFormat::Ascii => value.to_string(),
        SizeFormat::Binary => format!("{:08b}", value),
    }
}

/// Render the header-size value that opens the field-name line
///
/// `Binary` values are 32 bits written as four 8-digit groups with nothing
/// between them.
pub fn render_header_size(value: u64, format: SizeFormat) -> Result<String> {
    match format {
        SizeFormat::Ascii => Ok(value.to_string()),
        SizeFormat::Binary => {
            let value = u32::try_from(value).map_err(|_| {
                StoreError::InvalidLength(format!("header size {} exceeds 32 bits", value))
            })?;
            Ok(value
                .to_be_bytes()
                .iter()
                .map(|octet| format!("{:08b}", octet))
                .collect())
        }
    }
}

fn collect_digits(text: &str) -> Result<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(StoreError::InvalidLength(format!("no digits in {:?}", text)));
    }
    Ok(digits)
}

fn parse_digits(digits: &str, format: SizeFormat) -> Result<u64> {
    u64::from_str_radix(digits, format.radix()).map_err(|e| {
        StoreError::InvalidLength(format!("{:?} is not a {} length: {}", digits, format, e))
    })
}
