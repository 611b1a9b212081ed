use itertools::{Either, Itertools};

use super::transaction::{Category, TargetTransaction};

/// Mapped rows routed to their output stream, each side in input order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub security: Vec<TargetTransaction>,
    pub cash: Vec<TargetTransaction>,
}

impl Partition {
    pub fn split(txns: impl IntoIterator<Item = TargetTransaction>) -> Self {
        let (security, cash) = txns.into_iter().partition_map(|tx| match tx.category {
            Category::Security => Either::Left(tx),
            Category::Cash => Either::Right(tx),
        });

        Self { security, cash }
    }

    /// Attributes every cash row to `account`.
    pub fn assign_cash_account(&mut self, account: &str) {
        for tx in &mut self.cash {
            tx.holding = account.to_string();
        }
    }
}
