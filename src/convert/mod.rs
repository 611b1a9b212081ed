use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    config::{Config, Dialect},
    csv::{read_path, write},
    domain::{
        mapping::{Mapper, MappingTable},
        split::Partition,
        transaction::TargetTransaction,
    },
    error::{Error, FormatError, Result},
};

/// Row counts of a finished conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub read: usize,
    pub security: usize,
    pub cash: usize,
    /// `false` when the cash rows were discarded for lack of a cash account.
    pub cash_written: bool,
}

/// Runs one conversion with the FinPension mapping table.
pub fn run(config: &Config) -> Result<Summary> {
    run_with_table(config, &MappingTable::finpension())
}

/// Runs one conversion.
///
/// Nothing is written unless every row was read and mapped. Both files are
/// rendered in memory first; if the cash file cannot be written the main file
/// is removed again.
pub fn run_with_table(config: &Config, table: &MappingTable) -> Result<Summary> {
    if config.cash_account.is_some() && resolved(&config.output) == resolved(&config.cash_output) {
        return Err(Error::SameOutput {
            path: config.output.clone(),
        });
    }

    let source = read_path(&config.input, &config.input_dialect)?;
    info!(
        "read {} transactions from {}",
        source.len(),
        config.input.display()
    );

    let mut mapper = Mapper::new(table);
    if let Some(holding) = &config.holding {
        mapper = mapper.with_holding(holding.as_str());
    }
    let mut partition = Partition::split(mapper.map_all(&source)?);
    debug!(
        "{} security and {} cash transactions",
        partition.security.len(),
        partition.cash.len()
    );

    let main = render(&partition.security, &config.output_dialect)?;
    let cash = match &config.cash_account {
        Some(account) => {
            partition.assign_cash_account(account);
            Some(render(&partition.cash, &config.output_dialect)?)
        }
        None => {
            if !partition.cash.is_empty() {
                info!(
                    "no cash account given, dropping {} cash transactions",
                    partition.cash.len()
                );
            }
            None
        }
    };

    write_file(&config.output, &main)?;
    info!(
        "{} activities written to {}",
        partition.security.len(),
        config.output.display()
    );

    let cash_written = cash.is_some();
    if let Some(cash) = cash {
        if let Err(err) = write_file(&config.cash_output, &cash) {
            if let Err(cleanup) = fs::remove_file(&config.output) {
                warn!(
                    "could not remove {} after failure: {cleanup}",
                    config.output.display()
                );
            }
            return Err(err);
        }
        info!(
            "{} cash activities written to {}",
            partition.cash.len(),
            config.cash_output.display()
        );
    }

    Ok(Summary {
        read: source.len(),
        security: partition.security.len(),
        cash: partition.cash.len(),
        cash_written,
    })
}

fn render(txns: &[TargetTransaction], dialect: &Dialect) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write(txns, dialect, &mut buffer).map_err(FormatError::from)?;
    Ok(buffer)
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(|err| Error::io(path, err))
}

/// Absolute form of `path` for comparing output targets that may not exist yet.
fn resolved(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    }
}
