//! # Unit Conversion and OS Version Extraction
//!
//! Storage and memory values written back to the sheet are GiB figures.
//! The rounding rules here are part of the write-back contract: storage and
//! free space are truncated to whole GiB, memory keeps two decimals.

use crate::error::ParseError;

/// Bytes in one GiB (1024³).
pub const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Decimal places kept for usable memory.
pub const MEMORY_DECIMAL_PLACES: i32 = 2;

/// Whole GiB, truncating. `17_179_869_184` bytes is `16`.
pub fn bytes_to_gib_floor(bytes: u64) -> u64 {
    bytes / BYTES_PER_GIB
}

/// GiB rounded to [`MEMORY_DECIMAL_PLACES`], half away from zero.
pub fn bytes_to_gib_rounded(bytes: u64) -> f64 {
    let gib = bytes as f64 / BYTES_PER_GIB as f64;
    let scale = 10f64.powi(MEMORY_DECIMAL_PLACES);
    (gib * scale).round() / scale
}

/// Keep only the characters that can appear in a version number.
pub fn version_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect()
}

/// Extract the integer major version from free text.
///
/// Everything except digits, `-` and `.` is dropped, then the part before
/// the first `.` is parsed. `Microsoft Windows 10.0.19044` gives `10`.
pub fn major_version(text: &str) -> Result<i64, ParseError> {
    let stripped = version_chars(text);
    let major = stripped.split('.').next().unwrap_or_default();
    if major.is_empty() {
        return Err(ParseError::OsVersion {
            value: text.to_string(),
            reason: "no version digits".into(),
        });
    }
    major.parse::<i64>().map_err(|e| ParseError::OsVersion {
        value: text.to_string(),
        reason: format!("\"{major}\" is not an integer ({e})"),
    })
}
