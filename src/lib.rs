//! Converts FinPension transaction reports into Parqet import files.

pub mod config;
pub mod convert;
pub mod csv;
pub mod domain;
pub mod error;

pub use config::Config;
pub use convert::{run, Summary};
pub use error::{Error, FormatError, Result};
