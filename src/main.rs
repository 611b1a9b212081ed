use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, LevelFilter};

use finpension2parqet::{run, Config};

/// Convert a FinPension transaction report into a Parqet CSV import.
#[derive(Debug, Parser)]
#[command(name = "convert", version, long_about = None)]
struct Args {
    /// FinPension transaction report
    input: PathBuf,
    /// Parqet CSV receiving the security transactions
    output: PathBuf,
    /// Write cash transactions too, attributed to this Parqet holding
    #[arg(long, value_name = "ID")]
    cash_account: Option<String>,
    /// Where cash transactions go [default: <OUTPUT>_cash_transactions.csv]
    #[arg(long, value_name = "PATH", requires = "cash_account")]
    cash_output: Option<PathBuf>,
    /// Parqet holding for the security transactions
    #[arg(long, value_name = "ID")]
    holding: Option<String>,
    /// Write decimals with a comma instead of a point
    #[arg(long, default_value_t = false)]
    decimal_comma: bool,
    /// Start output files with a UTF-8 byte-order mark
    #[arg(long, default_value_t = false)]
    bom: bool,
    /// More output, repeat for trace logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(self) -> Config {
        let mut config = Config::new(self.input, self.output);
        if let Some(account) = self.cash_account {
            config = config.with_cash_account(account);
        }
        if let Some(path) = self.cash_output {
            config = config.with_cash_output(path);
        }
        if let Some(holding) = self.holding {
            config = config.with_holding(holding);
        }
        if self.decimal_comma {
            config = config.with_decimal_comma();
        }
        if self.bom {
            config = config.with_byte_order_mark();
        }
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match run(&args.config()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let mut message = err.to_string();
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                message.push_str(&format!(": {cause}"));
                source = std::error::Error::source(cause);
            }
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}
