//! Typed conversion of raw cells. Failures carry a short human-readable reason.

use crate::table::RawCell;
use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parses a numeric cell. `Empty` is reported as an error; callers decide
/// whether blanks are acceptable before calling this.
pub fn parse_decimal(cell: &RawCell) -> Result<Decimal, String> {
    match cell {
        RawCell::Empty => Err("value is blank".to_string()),
        RawCell::Integer(i) => Ok(Decimal::from(*i)),
        RawCell::Number(n) => {
            Decimal::from_f64(*n).ok_or_else(|| "number is not finite".to_string())
        }
        RawCell::Text(text) => parse_decimal_text(text),
    }
}

fn parse_decimal_text(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .map_err(|_| "not a number".to_string())
}

/// Parses a date cell. Numbers are read as spreadsheet serial dates.
pub fn parse_date(cell: &RawCell) -> Result<NaiveDate, String> {
    match cell {
        RawCell::Empty => Err("value is blank".to_string()),
        RawCell::Integer(i) => serial_to_date(*i as f64),
        RawCell::Number(n) => serial_to_date(*n),
        RawCell::Text(text) => parse_date_text(text.trim()),
    }
}

fn parse_date_text(text: &str) -> Result<NaiveDate, String> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime.date());
        }
    }
    Err("not a recognised date".to_string())
}

fn serial_to_date(serial: f64) -> Result<NaiveDate, String> {
    if !serial.is_finite() || serial < 1.0 {
        return Err("serial date out of range".to_string());
    }
    // Spreadsheet serial day 0 is 1899-12-30 in the 1900 date system.
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_days(Days::new(serial.floor() as u64)))
        .ok_or_else(|| "serial date out of range".to_string())
}
