use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    config::Dialect,
    domain::{
        normalize::{format_date, format_decimal, parse_date, parse_decimal},
        transaction::{SourceTransaction, TargetTransaction, TransactionType},
    },
    error::{Error, FormatError},
};

const COL_DATE: &str = "Date";
const COL_CATEGORY: &str = "Category";
const COL_ISIN: &str = "ISIN";
const COL_SHARES: &str = "Number of Shares";
const COL_PRICE: &str = "Asset Price in CHF";
const COL_CASH_FLOW: &str = "Cash Flow";
const COL_FEE: &str = "Fee";
const COL_TAX: &str = "Tax";

const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DATE,
    COL_CATEGORY,
    COL_ISIN,
    COL_SHARES,
    COL_PRICE,
    COL_CASH_FLOW,
];

const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Column order of a Parqet import file.
pub const PARQET_HEADER: [&str; 11] = [
    "date", "type", "holding", "isin", "shares", "price", "amount", "currency", "fee", "tax",
    "note",
];

/// A FinPension row before any field is interpreted.
#[derive(Debug, Deserialize)]
struct FinpensionRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Asset Name")]
    asset_name: Option<String>,
    #[serde(rename = "ISIN")]
    isin: Option<String>,
    #[serde(rename = "Number of Shares")]
    shares: Option<String>,
    #[serde(rename = "Asset Price in CHF")]
    price: Option<String>,
    #[serde(rename = "Cash Flow")]
    cash_flow: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "Fee")]
    fee: Option<String>,
    #[serde(rename = "Tax")]
    tax: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParqetRow<'a> {
    date: String,
    #[serde(rename = "type")]
    kind: TransactionType,
    holding: &'a str,
    isin: &'a str,
    shares: String,
    price: String,
    amount: String,
    currency: &'a str,
    fee: String,
    tax: String,
    note: &'a str,
}

/// Parse [`SourceTransaction`]s from a FinPension export.
///
/// Rows come back in file order. Rows without a category are the export's
/// summary lines and are skipped.
pub fn read(reader: impl Read, dialect: &Dialect) -> Result<Vec<SourceTransaction>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FormatError::MissingColumns(missing));
    }
    reader.set_headers(headers.clone());

    let mut txns = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: FinpensionRow = record.deserialize(Some(&headers))?;

        match parse_row(row, line, dialect)? {
            Some(tx) => txns.push(tx),
            None => warn!("skipping line {line}: no category"),
        }
    }

    debug!("read {} FinPension rows", txns.len());
    Ok(txns)
}

pub fn read_path(path: &Path, dialect: &Dialect) -> crate::error::Result<Vec<SourceTransaction>> {
    let content = fs::read(path).map_err(|err| Error::io(path, err))?;
    Ok(read(content.as_slice(), dialect)?)
}

fn parse_row(
    row: FinpensionRow,
    line: u64,
    dialect: &Dialect,
) -> Result<Option<SourceTransaction>, FormatError> {
    let Some(category) = non_empty(row.category) else {
        return Ok(None);
    };

    let raw_date = row.date.unwrap_or_default();
    let date = parse_date(&raw_date).ok_or_else(|| FormatError::InvalidDate {
        line,
        value: raw_date.clone(),
    })?;

    let number = |column: &'static str, value: Option<String>| {
        let value = value.unwrap_or_default();
        parse_decimal(&value, dialect.decimal_separator)
            .map_err(|_| FormatError::InvalidNumber {
                line,
                column,
                value,
            })
    };

    Ok(Some(SourceTransaction {
        line,
        date,
        category,
        booking_text: non_empty(row.asset_name),
        isin: non_empty(row.isin),
        shares: number(COL_SHARES, row.shares)?,
        price: number(COL_PRICE, row.price)?,
        cash_flow: number(COL_CASH_FLOW, row.cash_flow)?,
        currency: non_empty(row.currency),
        fee: number(COL_FEE, row.fee)?,
        tax: number(COL_TAX, row.tax)?,
        note: non_empty(row.note),
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Write [`TargetTransaction`]s as a Parqet import file.
///
/// The header is written even when there are no rows.
pub fn write(
    txns: &[TargetTransaction],
    dialect: &Dialect,
    mut writer: impl Write,
) -> csv::Result<()> {
    if dialect.byte_order_mark {
        writer.write_all(BYTE_ORDER_MARK)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(dialect.delimiter)
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(PARQET_HEADER)?;

    let decimal = |value: Decimal| format_decimal(value, dialect.decimal_separator);
    for tx in txns {
        writer.serialize(ParqetRow {
            date: format_date(tx.date),
            kind: tx.kind,
            holding: &tx.holding,
            isin: &tx.isin,
            shares: decimal(tx.shares),
            price: decimal(tx.price),
            amount: decimal(tx.amount),
            currency: &tx.currency,
            fee: decimal(tx.fee),
            tax: decimal(tx.tax),
            note: &tx.note,
        })?;
    }

    writer.flush()?;
    Ok(())
}
