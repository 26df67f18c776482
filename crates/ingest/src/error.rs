use core_types::CanonicalField;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error while reading input: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Unsupported input format '{0}' (expected csv, txt, xlsx, xlsm, xlsb, xls or ods)")]
    UnsupportedFormat(String),

    #[error("The workbook contains no worksheets")]
    EmptyWorkbook,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    DataQuality(#[from] DataQualityError),
}

impl From<calamine::Error> for IngestError {
    fn from(error: calamine::Error) -> Self {
        IngestError::Spreadsheet(error.to_string())
    }
}

/// The input cannot be mapped onto the canonical schema. No rows are produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Required column(s) missing after normalization: {}", join_fields(.0))]
    MissingFields(Vec<CanonicalField>),

    #[error("Columns '{first}' and '{second}' both map to '{field}'")]
    AmbiguousColumn {
        field: CanonicalField,
        first: String,
        second: String,
    },
}

/// One cell that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellIssue {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub field: CanonicalField,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for CellIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} column '{}': {} (value '{}')",
            self.row, self.field, self.reason, self.value
        )
    }
}

/// Every malformed cell found in one normalization pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Data quality check failed: {}", summarize(.issues))]
pub struct DataQualityError {
    pub issues: Vec<CellIssue>,
}

const PREVIEW_LIMIT: usize = 5;

fn summarize(issues: &[CellIssue]) -> String {
    let mut shown: Vec<String> = issues.iter().take(PREVIEW_LIMIT).map(|i| i.to_string()).collect();
    if issues.len() > PREVIEW_LIMIT {
        shown.push(format!("... and {} more", issues.len() - PREVIEW_LIMIT));
    }
    format!("{} invalid cell(s): {}", issues.len(), shown.join("; "))
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, IngestError>;
