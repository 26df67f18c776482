//! Delimited-text (CSV) exports.

use crate::error::Result;
use crate::table::{RawCell, RawTable};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Reads a delimited export with a header row.
///
/// Fields are trimmed and rows may have differing lengths. Bytes that are not
/// valid UTF-8 (legacy point-of-sale exports are often Latin-1) are replaced
/// rather than rejected.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| RawCell::from_text(&String::from_utf8_lossy(field)))
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

pub fn read_delimited_file(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    read_delimited(std::io::BufReader::new(file), delimiter)
}
