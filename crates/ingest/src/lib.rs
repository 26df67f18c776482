//! # Ingest
//!
//! Loads point-of-sale exports (CSV or spreadsheet) into a `RawTable` and
//! normalizes them into canonical `SalesLine` / `PaymentMovement` records.
//!
//! Normalization is all-or-nothing: a schema problem or any malformed cell
//! fails the call, so callers never see a partially converted dataset.

pub mod delimited;
pub mod error;
pub mod normalizer;
pub mod parse;
pub mod spreadsheet;
pub mod table;

pub use error::{CellIssue, DataQualityError, IngestError, SchemaError};
pub use normalizer::{ColumnMap, Normalizer};
pub use table::{RawCell, RawTable};

use configuration::ColumnsConfig;
use core_types::{PaymentMovement, SalesLine};
use std::path::Path;

/// The container format of an input file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(InputFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat(extension)),
        }
    }
}

/// Reads a file into a raw table without interpreting any column.
pub fn load_table(path: &Path, columns: &ColumnsConfig) -> Result<RawTable, IngestError> {
    let format = InputFormat::from_path(path)?;
    let table = match format {
        InputFormat::Delimited => delimited::read_delimited_file(path, columns.delimiter_byte())?,
        InputFormat::Spreadsheet => spreadsheet::read_spreadsheet_file(path)?,
    };
    tracing::info!(
        path = %path.display(),
        ?format,
        rows = table.len(),
        columns = table.headers.len(),
        "Loaded input file."
    );
    Ok(table)
}

/// Loads and normalizes a sales export in one step.
pub fn load_sales(path: &Path, columns: &ColumnsConfig) -> Result<Vec<SalesLine>, IngestError> {
    let table = load_table(path, columns)?;
    Normalizer::new(columns).normalize_sales(&table)
}

/// Loads and normalizes a cash-register movement export in one step.
pub fn load_movements(
    path: &Path,
    columns: &ColumnsConfig,
) -> Result<Vec<PaymentMovement>, IngestError> {
    let table = load_table(path, columns)?;
    Normalizer::new(columns).normalize_movements(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("vendas.CSV")).unwrap(),
            InputFormat::Delimited
        );
        assert_eq!(
            InputFormat::from_path(Path::new("/tmp/vendas.xlsx")).unwrap(),
            InputFormat::Spreadsheet
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("vendas.pdf")),
            Err(IngestError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(InputFormat::from_path(Path::new("vendas")).is_err());
    }
}
