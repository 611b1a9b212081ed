use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unknown transaction type {label:?} on line {line}")]
    UnknownTransactionType { label: String, line: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
