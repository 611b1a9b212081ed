use std::{fs, path::Path};

use finpension2parqet::{domain::error::Error as BusinessError, run, Config, Error, FormatError};
use tempfile::TempDir;

const HEADER: &str = "Date;Category;Asset Name;ISIN;Number of Shares;Currency;Asset Price in CHF;Cash Flow;Balance\n";
const PARQET_HEADER: &str = "date;type;holding;isin;shares;price;amount;currency;fee;tax;note\n";

const REPORT: &str = "\
2023-01-03;Deposit;;;;CHF;;2000.00;2000.00
2023-01-05;Buy;Apple;US0378331005;10;USD;150.00;-1500.00;500.00
2023-02-01;Interest;;;;CHF;;10.00;510.00
2023-03-10;Sell;Apple;US0378331005;4;USD;160.00;640.00;1150.00
2023-03-31;Flat-rate administrative fee;;;;CHF;;-4.35;1145.65
";

fn setup(report: &str) -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("transactions.csv");
    fs::write(&input, format!("{HEADER}{report}")).unwrap();
    let config = Config::new(input, dir.path().join("parqet.csv"));
    (dir, config)
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn converts_buy_row() {
    let (_dir, config) = setup("2023-01-05;Buy;;US0378331005;10;USD;150.00;-1500.00;0\n");
    let summary = run(&config).unwrap();

    assert_eq!(summary.security, 1);
    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        format!("{PARQET_HEADER}2023-01-05;buy;;US0378331005;10;150.00;-1500.00;USD;0;0;\n")
    );
}

#[test]
fn drops_cash_rows_without_cash_account() {
    let (_dir, config) = setup(REPORT);
    let summary = run(&config).unwrap();

    assert_eq!(summary.read, 5);
    assert_eq!(summary.security + summary.cash, summary.read);
    assert!(!summary.cash_written);
    assert!(!config.cash_output.exists());
    assert_eq!(
        lines(&config.output),
        [
            PARQET_HEADER.trim_end(),
            "2023-01-05;buy;;US0378331005;10;150.00;-1500.00;USD;0;0;Apple",
            "2023-03-10;sell;;US0378331005;-4;160.00;640.00;USD;0;0;Apple",
        ]
    );
}

#[test]
fn writes_cash_rows_with_cash_account() {
    let (_dir, config) = setup(REPORT);
    let config = config.with_cash_account("ACC123").with_holding("PF-1");
    let summary = run(&config).unwrap();

    assert!(summary.cash_written);
    assert_eq!(summary.cash, 3);
    assert!(config
        .cash_output
        .ends_with("parqet_cash_transactions.csv"));
    assert_eq!(
        lines(&config.cash_output),
        [
            PARQET_HEADER.trim_end(),
            "2023-01-03;deposit;ACC123;;0;0;2000.00;CHF;0;0;",
            "2023-02-01;interest;ACC123;;0;0;10.00;CHF;0;0;",
            "2023-03-31;fee;ACC123;;0;0;-4.35;CHF;4.35;0;",
        ]
    );
    assert!(lines(&config.output)
        .iter()
        .skip(1)
        .all(|line| line.contains(";PF-1;")));
}

#[test]
fn single_interest_row_goes_to_cash_file() {
    let (_dir, config) = setup("2023-02-01;Interest;;;;CHF;;10.00;10.00\n");
    let config = config.with_cash_account("ACC123");
    run(&config).unwrap();

    let cash = lines(&config.cash_output);
    assert_eq!(cash.len(), 2);
    let fields: Vec<&str> = cash[1].split(';').collect();
    assert_eq!(fields[1], "interest");
    assert_eq!(fields[2], "ACC123");
    assert_eq!(fields[6], "10.00");
    assert_eq!(lines(&config.output), [PARQET_HEADER.trim_end()]);
}

#[test]
fn output_is_reproducible() {
    let (_dir, config) = setup(REPORT);
    let config = config.with_cash_account("ACC123");

    run(&config).unwrap();
    let first = (
        fs::read(&config.output).unwrap(),
        fs::read(&config.cash_output).unwrap(),
    );
    run(&config).unwrap();
    let second = (
        fs::read(&config.output).unwrap(),
        fs::read(&config.cash_output).unwrap(),
    );

    assert_eq!(first, second);
}

#[test]
fn unknown_category_writes_nothing() {
    let (_dir, config) = setup(&format!("{REPORT}2023-04-01;Stock split;;;;CHF;;0;0\n"));
    let config = config.with_cash_account("ACC123");

    let err = run(&config).unwrap_err();
    match err {
        Error::BusinessError(BusinessError::UnknownTransactionType { label, line }) => {
            assert_eq!(label, "Stock split");
            assert_eq!(line, 7);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.output.exists());
    assert!(!config.cash_output.exists());
}

#[test]
fn missing_columns_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("transactions.csv");
    fs::write(&input, "Date;Category\n2023-01-05;Buy\n").unwrap();
    let config = Config::new(input, dir.path().join("parqet.csv"));

    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        Error::Format(FormatError::MissingColumns(_))
    ));
    assert!(!config.output.exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.csv");
    let config = Config::new(&input, dir.path().join("parqet.csv"));

    match run(&config).unwrap_err() {
        Error::Io { path, .. } => assert_eq!(path, input),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unwritable_cash_file_removes_main_output() {
    let (dir, config) = setup(REPORT);
    let config = config
        .with_cash_account("ACC123")
        .with_cash_output(dir.path().join("missing-dir").join("cash.csv"));

    assert!(matches!(run(&config).unwrap_err(), Error::Io { .. }));
    assert!(!config.output.exists());
}

#[test]
fn decimal_comma_output() {
    let (_dir, config) = setup("2023-01-05;Buy;;US0378331005;2.5;CHF;99.90;-249.75;0\n");
    let config = config.with_decimal_comma();
    run(&config).unwrap();

    assert_eq!(
        lines(&config.output)[1],
        "2023-01-05;buy;;US0378331005;2,5;99,90;-249,75;CHF;0;0;"
    );
}

#[test]
fn cash_output_on_main_output_is_rejected() {
    let (dir, config) = setup(REPORT);
    let output = config.output.clone();
    let config = config
        .with_cash_account("ACC123")
        .with_cash_output(dir.path().join(".").join("parqet.csv"));

    match run(&config).unwrap_err() {
        Error::SameOutput { path } => assert_eq!(path, output),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn byte_order_mark_on_every_file() {
    let (_dir, config) = setup(REPORT);
    let config = config.with_cash_account("ACC123").with_byte_order_mark();
    run(&config).unwrap();

    for path in [&config.output, &config.cash_output] {
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with(&format!("\u{feff}{PARQET_HEADER}")));
    }
}
