use std::collections::HashMap;

use log::warn;
use rust_decimal::Decimal;

use super::{
    error::{Error, Result},
    transaction::{Category, SourceTransaction, TargetTransaction, TransactionType},
};
use crate::config::BASE_CURRENCY;

/// How the target type of a row is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    Fixed(TransactionType),
    /// Picked by the sign of the cash flow, zero counting as an inflow.
    ByDirection {
        inflow: TransactionType,
        outflow: TransactionType,
    },
}

/// Sign applied to a magnitude taken from the source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Inflow,
    Outflow,
    /// Follows the direction of the row's cash flow.
    Directional,
    Zero,
}

/// Where the fee or tax column of a target row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charge {
    /// The matching `Fee`/`Tax` column of the source row.
    Reported,
    /// The row's cash flow is itself the charge.
    CashFlow,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub resolve: Resolve,
    pub category: Category,
    pub shares: Sign,
    pub amount: Sign,
    pub fee: Charge,
    pub tax: Charge,
}

impl Rule {
    const fn security(kind: TransactionType, shares: Sign, amount: Sign) -> Self {
        Self {
            resolve: Resolve::Fixed(kind),
            category: Category::Security,
            shares,
            amount,
            fee: Charge::Reported,
            tax: Charge::Reported,
        }
    }

    const fn cash(kind: TransactionType, amount: Sign, fee: Charge, tax: Charge) -> Self {
        Self {
            resolve: Resolve::Fixed(kind),
            category: Category::Cash,
            shares: Sign::Zero,
            amount,
            fee,
            tax,
        }
    }
}

const TRANSFER: Rule = Rule {
    resolve: Resolve::ByDirection {
        inflow: TransactionType::TransferIn,
        outflow: TransactionType::TransferOut,
    },
    category: Category::Security,
    shares: Sign::Directional,
    amount: Sign::Directional,
    fee: Charge::Reported,
    tax: Charge::Reported,
};

const FINPENSION_RULES: &[(&[&str], Rule)] = &[
    (
        &["Buy"],
        Rule::security(TransactionType::Buy, Sign::Inflow, Sign::Outflow),
    ),
    (
        &["Sell"],
        Rule::security(TransactionType::Sell, Sign::Outflow, Sign::Inflow),
    ),
    (
        &["Dividend"],
        Rule::security(TransactionType::Dividend, Sign::Inflow, Sign::Inflow),
    ),
    (&["Transfer"], TRANSFER),
    (
        &["Deposit"],
        Rule::cash(
            TransactionType::Deposit,
            Sign::Inflow,
            Charge::Reported,
            Charge::None,
        ),
    ),
    (
        &["Withdrawal", "Payout"],
        Rule::cash(
            TransactionType::Withdrawal,
            Sign::Outflow,
            Charge::Reported,
            Charge::None,
        ),
    ),
    (
        &["Interest", "Interests"],
        Rule::cash(
            TransactionType::Interest,
            Sign::Inflow,
            Charge::None,
            Charge::Reported,
        ),
    ),
    (
        &[
            "Fee",
            "Fees",
            "Flat-rate administrative fee",
            "Management fee",
        ],
        Rule::cash(
            TransactionType::Fee,
            Sign::Outflow,
            Charge::CashFlow,
            Charge::None,
        ),
    ),
    (
        &["Withholding tax", "Tax"],
        Rule::cash(
            TransactionType::Tax,
            Sign::Outflow,
            Charge::None,
            Charge::CashFlow,
        ),
    ),
    (
        &["Withholding tax refund", "Tax refund"],
        Rule::cash(
            TransactionType::Tax,
            Sign::Inflow,
            Charge::None,
            Charge::Reported,
        ),
    ),
];

/// Category label to [`Rule`] lookup. Labels match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    rules: HashMap<String, Rule>,
}

impl MappingTable {
    pub fn finpension() -> Self {
        Self::from_rules(
            FINPENSION_RULES
                .iter()
                .flat_map(|(labels, rule)| labels.iter().map(move |label| (*label, *rule))),
        )
    }

    pub fn from_rules<'a>(rules: impl IntoIterator<Item = (&'a str, Rule)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(label, rule)| (normalize_label(label), rule))
            .collect();
        Self { rules }
    }

    pub fn get(&self, label: &str) -> Option<&Rule> {
        self.rules.get(&normalize_label(label))
    }

}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Turns FinPension rows into Parqet rows according to a [`MappingTable`].
#[derive(Debug, Clone)]
pub struct Mapper<'a> {
    table: &'a MappingTable,
    holding: String,
}

impl<'a> Mapper<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self {
            table,
            holding: String::new(),
        }
    }

    pub fn with_holding(mut self, holding: impl Into<String>) -> Self {
        self.holding = holding.into();
        self
    }

    /// Stops at the first row whose category has no rule.
    pub fn map_all(&self, txns: &[SourceTransaction]) -> Result<Vec<TargetTransaction>> {
        txns.iter().map(|tx| self.map(tx)).collect()
    }

    pub fn map(&self, tx: &SourceTransaction) -> Result<TargetTransaction> {
        let rule = self
            .table
            .get(&tx.category)
            .ok_or_else(|| Error::UnknownTransactionType {
                label: tx.category.trim().to_string(),
                line: tx.line,
            })?;

        let cash_flow = tx.cash_flow.unwrap_or_default();
        let incoming = cash_flow >= Decimal::ZERO;
        let amount = apply_sign(rule.amount, cash_flow, incoming);
        if contradicts(rule.amount, cash_flow) {
            warn!(
                "line {}: {} reports cash flow {cash_flow}, writing {amount}",
                tx.line,
                tx.category.trim()
            );
        }

        let kind = match rule.resolve {
            Resolve::Fixed(kind) => kind,
            Resolve::ByDirection { inflow: kind, .. } if incoming => kind,
            Resolve::ByDirection { outflow: kind, .. } => kind,
        };

        let charge = |charge: Charge, reported: Option<Decimal>| match charge {
            Charge::Reported => reported.unwrap_or_default().abs(),
            Charge::CashFlow => cash_flow.abs(),
            Charge::None => Decimal::ZERO,
        };

        let currency = tx
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|currency| !currency.is_empty())
            .unwrap_or(BASE_CURRENCY)
            .to_uppercase();

        Ok(TargetTransaction {
            date: tx.date,
            kind,
            holding: self.holding.clone(),
            isin: tx.isin.as_deref().map(str::trim).unwrap_or_default().to_string(),
            shares: apply_sign(rule.shares, tx.shares.unwrap_or_default(), incoming),
            price: tx.price.unwrap_or_default().abs(),
            amount,
            currency,
            fee: charge(rule.fee, tx.fee),
            tax: charge(rule.tax, tx.tax),
            note: tx
                .note
                .clone()
                .or_else(|| tx.booking_text.clone())
                .unwrap_or_default(),
            category: rule.category,
        })
    }
}

/// The source reports a sign opposite to the one the rule forces.
fn contradicts(sign: Sign, value: Decimal) -> bool {
    match sign {
        Sign::Inflow => value.is_sign_negative() && !value.is_zero(),
        Sign::Outflow => value.is_sign_positive() && !value.is_zero(),
        Sign::Directional | Sign::Zero => false,
    }
}

fn apply_sign(sign: Sign, value: Decimal, incoming: bool) -> Decimal {
    let magnitude = value.abs();
    let negative = match sign {
        Sign::Inflow => false,
        Sign::Outflow => true,
        Sign::Directional => !incoming,
        Sign::Zero => return Decimal::ZERO,
    };

    // never emit a negative zero
    if negative && !magnitude.is_zero() {
        -magnitude
    } else {
        magnitude
    }
}
