/// A single cell as read from the source file, before any typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
}

impl RawCell {
    /// Builds a cell from CSV text; whitespace-only text is `Empty`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// Text form used for labels and for error reports.
    pub fn display_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Integer(i) => i.to_string(),
            RawCell::Number(n) => {
                // Spreadsheets store identifiers as floats; print 3.0 as "3".
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    format!("{n:.0}")
                } else {
                    n.to_string()
                }
            }
        }
    }
}

/// A header row plus data rows, exactly as loaded.
///
/// Rows may be shorter than the header; missing trailing cells read as `Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

static EMPTY: RawCell = RawCell::Empty;

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self { headers, rows }
    }

    /// Convenience constructor from string literals; blank strings become `Empty`.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| RawCell::from_text(cell)).collect())
                .collect(),
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> &RawCell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
