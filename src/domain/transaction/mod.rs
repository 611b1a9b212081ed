use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One row of a FinPension transaction report.
///
/// Numeric fields are `None` when the export left the cell empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTransaction {
    /// Line in the input file, header being line 1.
    pub line: u64,
    pub date: NaiveDate,
    pub category: String,
    pub booking_text: Option<String>,
    pub isin: Option<String>,
    pub shares: Option<Decimal>,
    pub price: Option<Decimal>,
    pub cash_flow: Option<Decimal>,
    pub currency: Option<String>,
    pub fee: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Interest,
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
    Fee,
    Tax,
}

/// Which output stream a mapped row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Security,
    Cash,
}

/// One row of a Parqet import file, plus the routing [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTransaction {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub holding: String,
    pub isin: String,
    pub shares: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub currency: String,
    pub fee: Decimal,
    pub tax: Decimal,
    pub note: String,
    pub category: Category,
}
