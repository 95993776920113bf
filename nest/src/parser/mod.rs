//! Input decoding for flat records.
//!
//! Input is a JSON array of objects:
//!
//! ```text
//! [{"currency": "GBP", "amount": 100}, {"currency": "EUR", "amount": 90}]
//! ```
//!
//! From a pipe the whole stream is read; from a terminal a single line is
//! read so the user can paste the array and press enter.

use std::io::{BufRead, Read};

use crate::error::DecodeResult;
use crate::models::FlatRecord;

/// Read raw input text.
///
/// `interactive` reads one line, otherwise everything up to EOF.
pub fn read_input<R: BufRead>(mut reader: R, interactive: bool) -> DecodeResult<String> {
    let mut raw = String::new();
    if interactive {
        reader.read_line(&mut raw)?;
    } else {
        reader.read_to_string(&mut raw)?;
    }
    Ok(raw)
}

/// Decode a JSON array of flat records.
pub fn parse_flat_records(raw: &str) -> DecodeResult<Vec<FlatRecord>> {
    let records: Vec<FlatRecord> = serde_json::from_str(raw)?;
    tracing::debug!(records = records.len(), "decoded flat records");
    Ok(records)
}

/// Read and decode in one step.
pub fn read_flat_records<R: BufRead>(reader: R, interactive: bool) -> DecodeResult<Vec<FlatRecord>> {
    let raw = read_input(reader, interactive)?;
    parse_flat_records(&raw)
}
