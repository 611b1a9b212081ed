//! Field conversions shared by the reader and the writer.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

const INPUT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];
const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a number written with `decimal_separator`.
///
/// Blank cells are `Ok(None)`. Apostrophes and spaces used as thousands
/// separators are dropped, so `1'500.00` reads as `1500.00`.
pub fn parse_decimal(
    raw: &str,
    decimal_separator: char,
) -> Result<Option<Decimal>, rust_decimal::Error> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | ' ' | '\u{2019}'))
        .map(|c| if c == decimal_separator { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    // `2023-01-05 00:00:00` and `2023-01-05T09:30` carry the date up front
    let date = raw.trim().split([' ', 'T']).next()?;
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

pub fn format_decimal(value: Decimal, decimal_separator: char) -> String {
    let text = value.to_string();
    if decimal_separator == '.' {
        text
    } else {
        text.replace('.', &decimal_separator.to_string())
    }
}
