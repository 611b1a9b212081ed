use std::path::{Path, PathBuf};

/// Currency FinPension reports cash flows and asset prices in.
pub const BASE_CURRENCY: &str = "CHF";

const CASH_SUFFIX: &str = "_cash_transactions";

/// CSV conventions of one side of the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub decimal_separator: char,
    /// Start the file with a UTF-8 byte-order mark.
    pub byte_order_mark: bool,
}

impl Dialect {
    pub fn finpension() -> Self {
        Self {
            delimiter: b';',
            decimal_separator: '.',
            byte_order_mark: false,
        }
    }

    pub fn parqet() -> Self {
        Self {
            delimiter: b';',
            decimal_separator: '.',
            byte_order_mark: false,
        }
    }

    pub fn with_decimal_comma(self) -> Self {
        Self {
            decimal_separator: ',',
            ..self
        }
    }

    pub fn with_byte_order_mark(self) -> Self {
        Self {
            byte_order_mark: true,
            ..self
        }
    }
}

/// Everything a conversion run needs, resolved once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cash_output: PathBuf,
    /// Cash rows are only written when this is set.
    pub cash_account: Option<String>,
    pub holding: Option<String>,
    pub input_dialect: Dialect,
    pub output_dialect: Dialect,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        Self {
            input: input.into(),
            cash_output: cash_output_path(&output),
            output,
            cash_account: None,
            holding: None,
            input_dialect: Dialect::finpension(),
            output_dialect: Dialect::parqet(),
        }
    }

    pub fn with_cash_account(mut self, account: impl Into<String>) -> Self {
        self.cash_account = Some(account.into());
        self
    }

    pub fn with_cash_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.cash_output = path.into();
        self
    }

    pub fn with_holding(mut self, holding: impl Into<String>) -> Self {
        self.holding = Some(holding.into());
        self
    }

    pub fn with_decimal_comma(mut self) -> Self {
        self.output_dialect = self.output_dialect.with_decimal_comma();
        self
    }

    pub fn with_byte_order_mark(mut self) -> Self {
        self.output_dialect = self.output_dialect.with_byte_order_mark();
        self
    }
}

/// `out/parqet.csv` becomes `out/parqet_cash_transactions.csv`.
pub fn cash_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{stem}{CASH_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{CASH_SUFFIX}"),
    };
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_path_keeps_directory_and_extension() {
        assert_eq!(
            cash_output_path(Path::new("out/parqet.csv")),
            PathBuf::from("out/parqet_cash_transactions.csv")
        );
    }

    #[test]
    fn cash_path_without_extension() {
        assert_eq!(
            cash_output_path(Path::new("parqet")),
            PathBuf::from("parqet_cash_transactions")
        );
    }

    #[test]
    fn explicit_cash_output_wins() {
        let config = Config::new("in.csv", "out.csv").with_cash_output("cash.csv");
        assert_eq!(config.cash_output, PathBuf::from("cash.csv"));
        assert!(config.cash_account.is_none());
    }
}
