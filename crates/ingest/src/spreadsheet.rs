//! Spreadsheet exports. Only the first worksheet is read; its first row is the header.

use crate::error::{IngestError, Result};
use crate::table::{RawCell, RawTable};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

pub fn read_spreadsheet_file(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| data_to_cell(cell).display_text())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    tracing::debug!(sheet = %sheet, "Read worksheet.");
    Ok(RawTable::new(headers, rows))
}

fn data_to_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::from_text(s),
        Data::Int(i) => RawCell::Integer(*i),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        // Serial date numbers are resolved by the date parser.
        Data::DateTime(serial) => RawCell::Number(serial.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::from_text(s),
        Data::Error(e) => RawCell::Text(format!("#ERROR:{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_calamine_cells() {
        assert_eq!(data_to_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(data_to_cell(&Data::Int(7)), RawCell::Integer(7));
        assert_eq!(data_to_cell(&Data::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(
            data_to_cell(&Data::String("  Bebidas ".to_string())),
            RawCell::Text("Bebidas".to_string())
        );
        assert_eq!(data_to_cell(&Data::String("   ".to_string())), RawCell::Empty);
    }
}
